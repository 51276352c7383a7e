//! Serialized catalog records and their validation into runtime types.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{
    cap_center_torso_missile_tubes, ActuatorAvailability, Chassis, ChassisId, ChassisVariant,
    Component, Faction, HardPoint, Item, ItemId, ItemKind, Location, Pod, PodId, PodSlot, Upgrade,
    UpgradeEffect, UpgradeSet, ENGINE_CENTER_SLOTS,
};

/// The on-disk catalog document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogDocument {
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default)]
    pub upgrades: Vec<Upgrade>,
    #[serde(default)]
    pub pods: Vec<PodRecord>,
    #[serde(default)]
    pub chassis: Vec<ChassisRecord>,
    #[serde(default)]
    pub stock: Vec<StockLoadout>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PodRecord {
    pub id: PodId,
    pub name: String,
    pub series: String,
    pub location: Location,
    #[serde(default)]
    pub hardpoints: Vec<HardPoint>,
    #[serde(default)]
    pub actuators: ActuatorAvailability,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChassisRecord {
    pub id: ChassisId,
    pub name: String,
    /// Maximum mass in tons.
    pub mass: f64,
    pub engine_min: u32,
    pub engine_max: u32,
    #[serde(default)]
    pub jump_jets: u32,
    #[serde(default)]
    pub module_slots: u32,
    #[serde(default = "any_faction")]
    pub faction: Faction,
    /// Present on omni chassis only.
    #[serde(default)]
    pub series: Option<String>,
    pub upgrades: UpgradeSet,
    pub components: Vec<ComponentRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentRecord {
    pub location: Location,
    pub slots: u32,
    pub health: f64,
    #[serde(default)]
    pub fixed_items: Vec<ItemId>,
    #[serde(default)]
    pub hardpoints: Vec<HardPoint>,
    /// Omni chassis: the pod a new loadout starts with. Absent for fixed
    /// locations.
    #[serde(default)]
    pub default_pod: Option<PodId>,
    #[serde(default)]
    pub dynamic_armor_slots: u32,
    #[serde(default)]
    pub dynamic_structure_slots: u32,
}

/// Factory configuration of a chassis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockLoadout {
    pub chassis: ChassisId,
    /// Upgrades differing from the chassis defaults.
    #[serde(default)]
    pub upgrades: Option<UpgradeSet>,
    #[serde(default)]
    pub components: Vec<StockComponent>,
    #[serde(default)]
    pub modules: Vec<ItemId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockComponent {
    pub location: Location,
    /// Front armor, or the only armor value of one-sided locations.
    #[serde(default)]
    pub armor: u32,
    #[serde(default)]
    pub armor_back: u32,
    #[serde(default)]
    pub pod: Option<PodId>,
    /// Actuator toggles of omni arms; the pod's availability if absent.
    #[serde(default)]
    pub actuators: Option<ActuatorAvailability>,
    #[serde(default)]
    pub items: Vec<ItemId>,
}

fn any_faction() -> Faction {
    Faction::Any
}

fn invalid(message: String) -> Error {
    Error::CatalogValidation { message }
}

/// Index records by id, rejecting duplicates.
pub(super) fn index_unique<T>(
    kind: &'static str,
    records: impl IntoIterator<Item = T>,
    id: impl Fn(&T) -> u32,
) -> Result<BTreeMap<u32, Arc<T>>> {
    let mut map = BTreeMap::new();
    for record in records {
        let key = id(&record);
        if map.insert(key, Arc::new(record)).is_some() {
            return Err(Error::DuplicateCatalogId { kind, id: key });
        }
    }
    Ok(map)
}

pub(super) fn validate_item(item: &Item) -> Result<()> {
    if !item.mass.is_finite() || item.mass < 0.0 {
        return Err(invalid(format!(
            "item {} ({}) has invalid mass {}",
            item.id, item.name, item.mass
        )));
    }
    match &item.kind {
        ItemKind::Engine(_) if item.slots != ENGINE_CENTER_SLOTS => Err(invalid(format!(
            "engine {} ({}) must occupy {} slots, found {}",
            item.id, item.name, ENGINE_CENTER_SLOTS, item.slots
        ))),
        ItemKind::JumpJet { min_tons, max_tons } if min_tons >= max_tons => {
            Err(invalid(format!(
                "jump jet {} ({}) has an empty tonnage bracket [{min_tons}, {max_tons})",
                item.id, item.name
            )))
        }
        _ => Ok(()),
    }
}

pub(super) fn validate_upgrade(
    upgrade: &Upgrade,
    items: &BTreeMap<ItemId, Arc<Item>>,
) -> Result<()> {
    if let UpgradeEffect::HeatSink { heat_sink } = upgrade.effect {
        let valid = items
            .get(&heat_sink)
            .map(|item| item.is_heat_sink())
            .unwrap_or(false);
        if !valid {
            return Err(invalid(format!(
                "heat sink upgrade {} ({}) refers to {heat_sink}, which is not a heat sink item",
                upgrade.id, upgrade.name
            )));
        }
    }
    if let UpgradeEffect::Armor { points_per_ton, .. } = upgrade.effect {
        if !(points_per_ton.is_finite() && points_per_ton > 0.0) {
            return Err(invalid(format!(
                "armor upgrade {} ({}) has invalid points per ton {points_per_ton}",
                upgrade.id, upgrade.name
            )));
        }
    }
    Ok(())
}

impl PodRecord {
    pub(super) fn into_pod(self) -> Pod {
        let mut hardpoints = self.hardpoints;
        if self.location == Location::CenterTorso {
            cap_center_torso_missile_tubes(&mut hardpoints);
        }
        Pod {
            id: self.id,
            name: self.name,
            series: self.series,
            location: self.location,
            hardpoints,
            actuators: self.actuators,
        }
    }
}

impl ChassisRecord {
    /// Resolve item references, order components by location and check
    /// the omni pod wiring.
    pub(super) fn into_chassis(
        self,
        items: &BTreeMap<ItemId, Arc<Item>>,
        pods: &BTreeMap<PodId, Arc<Pod>>,
    ) -> Result<Chassis> {
        let label = format!("chassis {} ({})", self.id, self.name);
        if !(self.mass.is_finite() && self.mass > 0.0) {
            return Err(invalid(format!("{label} has invalid mass {}", self.mass)));
        }
        if self.engine_min > self.engine_max {
            return Err(invalid(format!(
                "{label} has engine bounds {} > {}",
                self.engine_min, self.engine_max
            )));
        }

        let mut slots: Vec<Option<Component>> = vec![None; Location::ALL.len()];
        for record in self.components {
            let location = record.location;
            let component = record.into_component(&label, self.series.as_deref(), items, pods)?;
            if slots[location.index()].replace(component).is_some() {
                return Err(invalid(format!("{label} defines {location} twice")));
            }
        }
        let components = Location::ALL
            .iter()
            .map(|&location| {
                slots[location.index()]
                    .take()
                    .ok_or_else(|| invalid(format!("{label} is missing the {location}")))
            })
            .collect::<Result<Vec<_>>>()?;

        let variant = match self.series {
            Some(series) => ChassisVariant::Omni { series },
            None => ChassisVariant::Standard,
        };
        Ok(Chassis {
            id: self.id,
            name: self.name,
            mass_max: self.mass,
            engine_min: self.engine_min,
            engine_max: self.engine_max,
            jump_jets_max: self.jump_jets,
            module_slots: self.module_slots,
            faction: self.faction,
            variant,
            components,
            upgrades: self.upgrades,
        })
    }
}

impl ComponentRecord {
    fn into_component(
        self,
        label: &str,
        series: Option<&str>,
        items: &BTreeMap<ItemId, Arc<Item>>,
        pods: &BTreeMap<PodId, Arc<Pod>>,
    ) -> Result<Component> {
        let location = self.location;
        let fixed_items = self
            .fixed_items
            .iter()
            .map(|id| {
                items.get(id).cloned().ok_or_else(|| {
                    invalid(format!("{label}: fixed item {id} in {location} is unknown"))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let pod = match (series, self.default_pod) {
            (None, None) => PodSlot::Fixed,
            (None, Some(_)) => {
                return Err(invalid(format!(
                    "{label}: only omni chassis may select pods ({location})"
                )))
            }
            (Some(_), None) if location == Location::CenterTorso => PodSlot::Fixed,
            (Some(_), None) => {
                return Err(invalid(format!("{label}: {location} needs a default pod")))
            }
            (Some(series), Some(pod_id)) => {
                let fits = pods
                    .get(&pod_id)
                    .map(|pod| pod.series == series && pod.location == location)
                    .unwrap_or(false);
                if !fits || location == Location::CenterTorso {
                    return Err(invalid(format!(
                        "{label}: pod {pod_id} does not fit the {location}"
                    )));
                }
                PodSlot::Selectable {
                    default_pod: pod_id,
                }
            }
        };

        let mut hardpoints = self.hardpoints;
        if location == Location::CenterTorso {
            cap_center_torso_missile_tubes(&mut hardpoints);
        }

        Ok(Component {
            location,
            slots: self.slots,
            health: self.health,
            fixed_items,
            hardpoints,
            pod,
            dynamic_armor_slots: self.dynamic_armor_slots,
            dynamic_structure_slots: self.dynamic_structure_slots,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HardPointType, WeaponSpec};

    fn item(kind: ItemKind, slots: u32) -> Item {
        Item {
            id: 1,
            name: "Thing".to_string(),
            slots,
            mass: 1.0,
            hardpoint: HardPointType::None,
            health: 0.0,
            faction: Faction::Any,
            kind,
        }
    }

    #[test]
    fn items_deserialize_with_flattened_kind() {
        let json = r#"{
            "id": 1500, "name": "Medium Laser", "slots": 1, "mass": 1.0,
            "hardpoint": "energy", "faction": "inner_sphere",
            "kind": "weapon", "heat": 4.0, "cooldown": 3.0
        }"#;
        let item: Item = serde_json::from_str(json).expect("valid item");
        assert_eq!(item.hardpoint, HardPointType::Energy);
        assert_eq!(
            item.weapon(),
            Some(&WeaponSpec {
                heat: 4.0,
                cooldown: 3.0,
                ammo: None,
                guided: false,
                category: None,
            })
        );
    }

    #[test]
    fn engines_must_take_six_slots() {
        let engine = item(
            ItemKind::Engine(crate::model::EngineSpec {
                engine_type: crate::model::EngineType::Standard,
                rating: 200,
                side_slots: 0,
            }),
            4,
        );
        let err = validate_item(&engine).expect_err("wrong slot count");
        assert!(matches!(err, Error::CatalogValidation { .. }));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let items = vec![item(ItemKind::Ammunition, 1), item(ItemKind::Ammunition, 1)];
        let err = index_unique("item", items, |i| i.id).expect_err("duplicate");
        match err {
            Error::DuplicateCatalogId { kind, id } => {
                assert_eq!(kind, "item");
                assert_eq!(id, 1);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn center_torso_pods_get_their_missile_tubes_capped() {
        let record = PodRecord {
            id: 1,
            name: "CT".to_string(),
            series: "S".to_string(),
            location: Location::CenterTorso,
            hardpoints: vec![HardPoint::missile(10, false), HardPoint::missile(20, false)],
            actuators: ActuatorAvailability::default(),
        };
        let pod = record.into_pod();
        assert_eq!(pod.hardpoints[0].tubes, 5);
        assert_eq!(pod.hardpoints[1].tubes, 20);
    }
}
