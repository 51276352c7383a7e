//! Equipment items, hardpoints and factions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identifier of an item in the catalog.
pub type ItemId = u32;

/// Center torso slots every engine occupies.
pub const ENGINE_CENTER_SLOTS: u32 = 6;

/// Weapon names (or categories) that mark a weapon as large-bore. Large-bore
/// weapons cannot share an omni arm with lower-arm or hand actuators.
const LARGE_BORE_MARKERS: &[&str] = &["PPC", "GAUSS", "AC/10", "AC/20", "LB 10-X", "LB10-X"];

/// Mounting point category. Every item names the hardpoint type it
/// requires; [`HardPointType::None`] means no hardpoint is needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HardPointType {
    Energy,
    Ballistic,
    Missile,
    AntiMissile,
    Ecm,
    Probe,
    Melee,
    Artillery,
    None,
}

impl HardPointType {
    /// All hardpoint types, including [`HardPointType::None`].
    pub const ALL: [HardPointType; 9] = [
        HardPointType::Energy,
        HardPointType::Ballistic,
        HardPointType::Missile,
        HardPointType::AntiMissile,
        HardPointType::Ecm,
        HardPointType::Probe,
        HardPointType::Melee,
        HardPointType::Artillery,
        HardPointType::None,
    ];
}

/// A single typed mounting point on a component or pod.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HardPoint {
    pub kind: HardPointType,
    /// Launcher tubes; only meaningful for missile hardpoints.
    #[serde(default)]
    pub tubes: u32,
    /// Whether a missile bay closes with doors.
    #[serde(default)]
    pub has_doors: bool,
}

impl HardPoint {
    pub fn new(kind: HardPointType) -> Self {
        Self {
            kind,
            tubes: 0,
            has_doors: false,
        }
    }

    pub fn missile(tubes: u32, has_doors: bool) -> Self {
        Self {
            kind: HardPointType::Missile,
            tubes,
            has_doors,
        }
    }
}

/// Technology base of chassis, items and upgrades.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Faction {
    InnerSphere,
    Clan,
    /// Usable by either technology base.
    Any,
}

impl Faction {
    /// Whether something of this faction can be fitted to `other`.
    pub fn is_compatible(self, other: Faction) -> bool {
        self == Faction::Any || other == Faction::Any || self == other
    }
}

impl fmt::Display for Faction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Faction::InnerSphere => f.write_str("Inner Sphere"),
            Faction::Clan => f.write_str("Clan"),
            Faction::Any => f.write_str("Any"),
        }
    }
}

/// Engine construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineType {
    Standard,
    Light,
    ExtraLight,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineSpec {
    pub engine_type: EngineType,
    pub rating: u32,
    /// Slots occupied in each side torso by the engine shielding.
    #[serde(default)]
    pub side_slots: u32,
}

impl EngineSpec {
    /// Side torso slots reserved while this engine is equipped.
    pub fn reserved_side_slots(&self) -> u32 {
        match self.engine_type {
            EngineType::Standard => 0,
            EngineType::Light | EngineType::ExtraLight => self.side_slots,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponSpec {
    pub heat: f64,
    pub cooldown: f64,
    /// Ammunition item fed to this weapon, if any.
    #[serde(default)]
    pub ammo: Option<ItemId>,
    /// Missile launchers that take a guidance system.
    #[serde(default)]
    pub guided: bool,
    #[serde(default)]
    pub category: Option<String>,
}

/// Arm actuators that omni pods may toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Actuator {
    LowerArm,
    Hand,
}

impl fmt::Display for Actuator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Actuator::LowerArm => f.write_str("lower arm actuator"),
            Actuator::Hand => f.write_str("hand actuator"),
        }
    }
}

/// Item category with kind-specific data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ItemKind {
    Engine(EngineSpec),
    Weapon(WeaponSpec),
    HeatSink,
    Ammunition,
    JumpJet {
        /// Lightest chassis mass (inclusive) this jump jet fits.
        min_tons: f64,
        /// Chassis mass bound (exclusive) above which it no longer fits.
        max_tons: f64,
    },
    /// Pilot module; equipped on the loadout, never in a component.
    Module,
    /// Fixed structure such as actuators, gyro or cockpit.
    Internal {
        #[serde(default)]
        actuator: Option<Actuator>,
    },
    /// Any other slotted equipment (ECM, probes, AMS, ...).
    Equipment,
}

/// An item from the reference catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub slots: u32,
    /// Mass in tons.
    pub mass: f64,
    #[serde(default = "default_hardpoint")]
    pub hardpoint: HardPointType,
    #[serde(default)]
    pub health: f64,
    #[serde(default = "default_faction")]
    pub faction: Faction,
    #[serde(flatten)]
    pub kind: ItemKind,
}

fn default_hardpoint() -> HardPointType {
    HardPointType::None
}

fn default_faction() -> Faction {
    Faction::Any
}

impl Item {
    pub fn engine(&self) -> Option<&EngineSpec> {
        match &self.kind {
            ItemKind::Engine(spec) => Some(spec),
            _ => None,
        }
    }

    pub fn weapon(&self) -> Option<&WeaponSpec> {
        match &self.kind {
            ItemKind::Weapon(spec) => Some(spec),
            _ => None,
        }
    }

    pub fn is_engine(&self) -> bool {
        matches!(self.kind, ItemKind::Engine(_))
    }

    pub fn is_heat_sink(&self) -> bool {
        matches!(self.kind, ItemKind::HeatSink)
    }

    pub fn is_jump_jet(&self) -> bool {
        matches!(self.kind, ItemKind::JumpJet { .. })
    }

    pub fn is_module(&self) -> bool {
        matches!(self.kind, ItemKind::Module)
    }

    pub fn is_internal(&self) -> bool {
        matches!(self.kind, ItemKind::Internal { .. })
    }

    /// The arm actuator this internal item represents, if any.
    pub fn actuator(&self) -> Option<Actuator> {
        match self.kind {
            ItemKind::Internal { actuator } => actuator,
            _ => None,
        }
    }

    /// Missile launcher that gains slots and mass from a guidance upgrade.
    pub fn is_guided(&self) -> bool {
        self.weapon().map(|w| w.guided).unwrap_or(false)
    }

    /// Large-bore weapons are recognised by name or category.
    pub fn is_large_bore(&self) -> bool {
        let Some(weapon) = self.weapon() else {
            return false;
        };
        let name = self.name.to_ascii_uppercase();
        let category = weapon
            .category
            .as_deref()
            .map(str::to_ascii_uppercase)
            .unwrap_or_default();
        LARGE_BORE_MARKERS
            .iter()
            .any(|marker| name.contains(marker) || category.contains(marker))
    }

    /// Whether a jump jet's tonnage bracket covers a chassis mass.
    pub fn jump_jet_fits(&self, chassis_mass: f64) -> bool {
        match self.kind {
            ItemKind::JumpJet { min_tons, max_tons } => {
                min_tons <= chassis_mass && chassis_mass < max_tons
            }
            _ => false,
        }
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
