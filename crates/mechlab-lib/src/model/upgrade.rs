//! Chassis-wide upgrades (armor, structure, heat sink and guidance types).

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::item::{Faction, Item, ItemId};
use crate::error::{Error, Result};

/// Armor points per ton of standard armor; used if an armor slot ever holds
/// a non-armor upgrade.
const STANDARD_POINTS_PER_TON: f64 = 32.0;

/// Internal structure mass fraction of standard structure.
const STANDARD_STRUCTURE_FRACTION: f64 = 0.1;

/// Stable identifier of an upgrade in the catalog.
pub type UpgradeId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpgradeKind {
    Armor,
    Structure,
    HeatSink,
    Guidance,
}

impl fmt::Display for UpgradeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpgradeKind::Armor => f.write_str("armor"),
            UpgradeKind::Structure => f.write_str("structure"),
            UpgradeKind::HeatSink => f.write_str("heat sink"),
            UpgradeKind::Guidance => f.write_str("guidance"),
        }
    }
}

/// Kind-specific economics of an upgrade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UpgradeEffect {
    Armor {
        points_per_ton: f64,
        /// Scales every component's maximum armor.
        #[serde(default = "unit_multiplier")]
        max_armor_multiplier: f64,
    },
    Structure {
        /// Internal structure mass as a fraction of chassis mass.
        internal_mass_fraction: f64,
    },
    HeatSink {
        /// The heat sink item this upgrade allows.
        heat_sink: ItemId,
    },
    Guidance {
        /// Extra slots per guided launcher.
        slots_per_launcher: u32,
        /// Extra tons per guided launcher.
        tons_per_launcher: f64,
    },
}

fn unit_multiplier() -> f64 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Upgrade {
    pub id: UpgradeId,
    pub name: String,
    #[serde(default = "any_faction")]
    pub faction: Faction,
    /// Dynamic slots this upgrade consumes across the chassis.
    #[serde(default)]
    pub extra_slots: u32,
    #[serde(flatten)]
    pub effect: UpgradeEffect,
}

fn any_faction() -> Faction {
    Faction::Any
}

impl Upgrade {
    pub fn kind(&self) -> UpgradeKind {
        match self.effect {
            UpgradeEffect::Armor { .. } => UpgradeKind::Armor,
            UpgradeEffect::Structure { .. } => UpgradeKind::Structure,
            UpgradeEffect::HeatSink { .. } => UpgradeKind::HeatSink,
            UpgradeEffect::Guidance { .. } => UpgradeKind::Guidance,
        }
    }
}

impl fmt::Display for Upgrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// The four upgrade selections of a loadout.
#[derive(Debug, Clone, PartialEq)]
pub struct Upgrades {
    armor: Arc<Upgrade>,
    structure: Arc<Upgrade>,
    heat_sink: Arc<Upgrade>,
    guidance: Arc<Upgrade>,
}

impl Upgrades {
    /// Group four upgrades, checking each sits in the matching slot.
    pub fn new(
        armor: Arc<Upgrade>,
        structure: Arc<Upgrade>,
        heat_sink: Arc<Upgrade>,
        guidance: Arc<Upgrade>,
    ) -> Result<Self> {
        let expected = [
            (&armor, UpgradeKind::Armor),
            (&structure, UpgradeKind::Structure),
            (&heat_sink, UpgradeKind::HeatSink),
            (&guidance, UpgradeKind::Guidance),
        ];
        for (upgrade, kind) in expected {
            if upgrade.kind() != kind {
                return Err(Error::CatalogValidation {
                    message: format!(
                        "upgrade {} ({}) is not a {} upgrade",
                        upgrade.id, upgrade.name, kind
                    ),
                });
            }
        }
        Ok(Self {
            armor,
            structure,
            heat_sink,
            guidance,
        })
    }

    pub fn get(&self, kind: UpgradeKind) -> &Arc<Upgrade> {
        match kind {
            UpgradeKind::Armor => &self.armor,
            UpgradeKind::Structure => &self.structure,
            UpgradeKind::HeatSink => &self.heat_sink,
            UpgradeKind::Guidance => &self.guidance,
        }
    }

    /// Replace the upgrade of the same kind, returning the previous one.
    pub fn replace(&mut self, upgrade: Arc<Upgrade>) -> Arc<Upgrade> {
        let slot = match upgrade.kind() {
            UpgradeKind::Armor => &mut self.armor,
            UpgradeKind::Structure => &mut self.structure,
            UpgradeKind::HeatSink => &mut self.heat_sink,
            UpgradeKind::Guidance => &mut self.guidance,
        };
        std::mem::replace(slot, upgrade)
    }

    /// Upgrades in wire order: armor, structure, heat sink, guidance.
    pub fn in_wire_order(&self) -> [&Arc<Upgrade>; 4] {
        [&self.armor, &self.structure, &self.heat_sink, &self.guidance]
    }

    pub fn armor(&self) -> &Arc<Upgrade> {
        &self.armor
    }

    pub fn structure(&self) -> &Arc<Upgrade> {
        &self.structure
    }

    pub fn heat_sink(&self) -> &Arc<Upgrade> {
        &self.heat_sink
    }

    pub fn guidance(&self) -> &Arc<Upgrade> {
        &self.guidance
    }

    pub fn armor_points_per_ton(&self) -> f64 {
        match self.armor.effect {
            UpgradeEffect::Armor { points_per_ton, .. } => points_per_ton,
            _ => STANDARD_POINTS_PER_TON,
        }
    }

    pub fn max_armor_multiplier(&self) -> f64 {
        match self.armor.effect {
            UpgradeEffect::Armor {
                max_armor_multiplier,
                ..
            } => max_armor_multiplier,
            _ => 1.0,
        }
    }

    pub fn internal_mass_fraction(&self) -> f64 {
        match self.structure.effect {
            UpgradeEffect::Structure {
                internal_mass_fraction,
            } => internal_mass_fraction,
            _ => STANDARD_STRUCTURE_FRACTION,
        }
    }

    /// The heat sink item allowed by the heat sink upgrade.
    pub fn heat_sink_item(&self) -> Option<ItemId> {
        match self.heat_sink.effect {
            UpgradeEffect::HeatSink { heat_sink } => Some(heat_sink),
            _ => None,
        }
    }

    /// Dynamic slots consumed by the armor and structure upgrades.
    pub fn dynamic_slots(&self) -> u32 {
        self.armor.extra_slots + self.structure.extra_slots
    }

    /// Slots an item occupies under the current guidance upgrade.
    pub fn item_slots(&self, item: &Item) -> u32 {
        match self.guidance.effect {
            UpgradeEffect::Guidance {
                slots_per_launcher,
                ..
            } if item.is_guided() => item.slots + slots_per_launcher,
            _ => item.slots,
        }
    }

    /// Tons an item weighs under the current guidance upgrade.
    pub fn item_mass(&self, item: &Item) -> f64 {
        match self.guidance.effect {
            UpgradeEffect::Guidance {
                tons_per_launcher, ..
            } if item.is_guided() => item.mass + tons_per_launcher,
            _ => item.mass,
        }
    }
}
