//! Reference data: chassis, items, upgrades, omni pods and stock loadouts.
//!
//! The [`Database`] is loaded once from a JSON document, validated, and then
//! shared read-only. Lookups hand out `Arc` handles and fail with a typed
//! "unknown id" error rather than panicking.

mod records;

use std::collections::BTreeMap;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::command::{Command, CommandBatch};
use crate::error::{Error, Result};
use crate::model::{
    Actuator, ArmorSide, Chassis, ChassisId, Item, ItemId, Loadout, Location, Pod, PodId,
    PodSlot, Upgrade, UpgradeEffect, UpgradeId, UpgradeKind, UpgradeSet, Upgrades,
};

pub use records::{
    CatalogDocument, ChassisRecord, ComponentRecord, PodRecord, StockComponent, StockLoadout,
};

/// Minimum Jaro-Winkler similarity for a name to be offered as a suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// Maximum number of suggestions reported for an unknown chassis name.
const MAX_SUGGESTIONS: usize = 5;

/// Validated, immutable reference data.
#[derive(Debug, Clone, Default)]
pub struct Database {
    chassis: BTreeMap<ChassisId, Arc<Chassis>>,
    items: BTreeMap<ItemId, Arc<Item>>,
    upgrades: BTreeMap<UpgradeId, Arc<Upgrade>>,
    pods: BTreeMap<PodId, Arc<Pod>>,
    stock: BTreeMap<ChassisId, StockLoadout>,
    source: Option<PathBuf>,
}

impl Database {
    /// Load and validate a catalog document from a file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = fs::File::open(path)?;
        let mut database = Self::from_reader(file)?;
        database.source = Some(path.to_path_buf());
        Ok(database)
    }

    /// Load and validate a catalog document from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let document: CatalogDocument = serde_json::from_reader(reader)?;
        Self::from_document(document)
    }

    /// Validate an already parsed catalog document.
    pub fn from_document(document: CatalogDocument) -> Result<Self> {
        for item in &document.items {
            records::validate_item(item)?;
        }
        let items = records::index_unique("item", document.items, |i| i.id)?;

        for upgrade in &document.upgrades {
            records::validate_upgrade(upgrade, &items)?;
        }
        let upgrades = records::index_unique("upgrade", document.upgrades, |u| u.id)?;

        let pods = records::index_unique(
            "pod",
            document.pods.into_iter().map(PodRecord::into_pod),
            |p| p.id,
        )?;

        let chassis = records::index_unique(
            "chassis",
            document
                .chassis
                .into_iter()
                .map(|record| record.into_chassis(&items, &pods))
                .collect::<Result<Vec<_>>>()?,
            |c| c.id,
        )?;

        let mut database = Self {
            chassis,
            items,
            upgrades,
            pods,
            stock: BTreeMap::new(),
            source: None,
        };

        for chassis in database.chassis.values() {
            database.upgrades_for(&chassis.upgrades).map_err(|err| {
                Error::CatalogValidation {
                    message: format!("chassis {} ({}): {err}", chassis.id, chassis.name),
                }
            })?;
        }

        for stock in document.stock {
            let id = stock.chassis;
            database.chassis(id)?;
            if database.stock.insert(id, stock).is_some() {
                return Err(Error::DuplicateCatalogId {
                    kind: "stock loadout",
                    id,
                });
            }
        }
        for &id in database.stock.keys() {
            database.stock_loadout(id)?;
        }

        debug!(
            chassis = database.chassis.len(),
            items = database.items.len(),
            upgrades = database.upgrades.len(),
            pods = database.pods.len(),
            stock = database.stock.len(),
            "loaded catalog"
        );
        Ok(database)
    }

    /// Path the catalog was loaded from, if any.
    pub fn source_path(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    // ---------------------------------------------------------------------
    // Lookups
    // ---------------------------------------------------------------------

    pub fn chassis(&self, id: ChassisId) -> Result<&Arc<Chassis>> {
        self.chassis.get(&id).ok_or(Error::UnknownChassis { id })
    }

    pub fn item(&self, id: ItemId) -> Result<&Arc<Item>> {
        self.items.get(&id).ok_or(Error::UnknownItem { id })
    }

    pub fn upgrade(&self, id: UpgradeId) -> Result<&Arc<Upgrade>> {
        self.upgrades.get(&id).ok_or(Error::UnknownUpgrade { id })
    }

    /// A pod by id, which must belong to `location`.
    pub fn pod(&self, id: PodId, location: Location) -> Result<&Arc<Pod>> {
        self.pods
            .get(&id)
            .filter(|pod| pod.location == location)
            .ok_or(Error::UnknownPod { id, location })
    }

    /// Case-insensitive chassis lookup by name, with fuzzy suggestions on a
    /// miss.
    pub fn chassis_by_name(&self, name: &str) -> Result<&Arc<Chassis>> {
        let wanted = normalize_name(name);
        self.chassis
            .values()
            .find(|chassis| normalize_name(&chassis.name) == wanted)
            .ok_or_else(|| Error::UnknownChassisName {
                name: name.to_string(),
                suggestions: self.fuzzy_chassis_matches(name, MAX_SUGGESTIONS),
            })
    }

    /// Chassis names most similar to `name`, best first.
    pub fn fuzzy_chassis_matches(&self, name: &str, limit: usize) -> Vec<String> {
        let wanted = normalize_name(name);
        let mut scored: Vec<(f64, &str)> = self
            .chassis
            .values()
            .map(|c| (strsim::jaro_winkler(&wanted, &normalize_name(&c.name)), c.name.as_str()))
            .filter(|(score, _)| *score >= SUGGESTION_THRESHOLD)
            .collect();
        scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(b.1)));
        scored
            .into_iter()
            .take(limit)
            .map(|(_, name)| name.to_string())
            .collect()
    }

    /// All chassis sorted by name.
    pub fn chassis_sorted(&self) -> Vec<&Arc<Chassis>> {
        let mut chassis: Vec<&Arc<Chassis>> = self.chassis.values().collect();
        chassis.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        chassis
    }

    pub fn items(&self) -> impl Iterator<Item = &Arc<Item>> {
        self.items.values()
    }

    pub fn upgrades(&self) -> impl Iterator<Item = &Arc<Upgrade>> {
        self.upgrades.values()
    }

    pub fn pods(&self) -> impl Iterator<Item = &Arc<Pod>> {
        self.pods.values()
    }

    pub fn has_stock(&self, chassis: ChassisId) -> bool {
        self.stock.contains_key(&chassis)
    }

    // ---------------------------------------------------------------------
    // Loadouts
    // ---------------------------------------------------------------------

    /// Resolve an upgrade selection.
    pub fn upgrades_for(&self, set: &UpgradeSet) -> Result<Upgrades> {
        Upgrades::new(
            Arc::clone(self.upgrade(set.armor)?),
            Arc::clone(self.upgrade(set.structure)?),
            Arc::clone(self.upgrade(set.heat_sink)?),
            Arc::clone(self.upgrade(set.guidance)?),
        )
    }

    /// An empty loadout: default upgrades, default pods, no armor or items.
    pub fn empty_loadout(&self, chassis: ChassisId) -> Result<Loadout> {
        let chassis = Arc::clone(self.chassis(chassis)?);
        let upgrades = self.upgrades_for(&chassis.upgrades)?;
        let defaults = chassis.clone();
        Ok(Loadout::new(chassis, upgrades, |location| {
            match defaults.component(location).pod {
                PodSlot::Selectable { default_pod } => self.pods.get(&default_pod).cloned(),
                PodSlot::Fixed => None,
            }
        }))
    }

    /// The factory configuration of a chassis, or its empty loadout when the
    /// catalog has no stock record for it.
    pub fn stock_loadout(&self, chassis: ChassisId) -> Result<Loadout> {
        let mut loadout = self.empty_loadout(chassis)?;
        let Some(stock) = self.stock.get(&chassis) else {
            return Ok(loadout);
        };

        let report = self.stock_batch(&loadout, stock).apply(&mut loadout);
        if let Some(error) = report.errors.into_iter().next() {
            return Err(Error::CatalogValidation {
                message: format!(
                    "stock loadout of {} ({}) is invalid: {error}",
                    loadout.chassis().id,
                    loadout.chassis().name
                ),
            });
        }
        Ok(loadout)
    }

    fn stock_batch(&self, loadout: &Loadout, stock: &StockLoadout) -> CommandBatch {
        let mut batch = CommandBatch::new();
        if let Some(set) = &stock.upgrades {
            let current = loadout.upgrades();
            let wanted = [
                (UpgradeKind::Armor, set.armor),
                (UpgradeKind::Structure, set.structure),
                (UpgradeKind::HeatSink, set.heat_sink),
                (UpgradeKind::Guidance, set.guidance),
            ];
            for (kind, id) in wanted {
                if current.get(kind).id != id {
                    batch.push_result(self.set_upgrade_command(id));
                }
            }
        }

        for component in &stock.components {
            let location = component.location;
            for (side, amount) in armor_values(location, component.armor, component.armor_back) {
                batch.push(Command::set_armor(location, side, amount));
            }
        }

        for location in Location::RIGHT_TO_LEFT {
            let Some(component) = stock.components.iter().find(|c| c.location == location)
            else {
                continue;
            };
            if let Some(pod) = component.pod {
                batch.push_result(self.set_pod_command(pod, location));
            }
            if let Some(actuators) = component.actuators {
                batch.push(Command::toggle_actuator(
                    location,
                    Actuator::LowerArm,
                    actuators.lower_arm,
                ));
                batch.push(Command::toggle_actuator(location, Actuator::Hand, actuators.hand));
            }
            for &item in &component.items {
                batch.push_result(self.add_item_command(location, item));
            }
        }

        for &module in &stock.modules {
            batch.push_result(self.add_module_command(module));
        }
        batch
    }

    // ---------------------------------------------------------------------
    // Command construction from ids
    // ---------------------------------------------------------------------

    pub fn add_item_command(&self, location: Location, item: ItemId) -> Result<Command> {
        Ok(Command::add_item(location, Arc::clone(self.item(item)?)))
    }

    /// A set-upgrade command; heat sink upgrades carry the item their
    /// equipped heat sinks are swapped to.
    pub fn set_upgrade_command(&self, upgrade: UpgradeId) -> Result<Command> {
        let upgrade = Arc::clone(self.upgrade(upgrade)?);
        let heat_sink = match upgrade.effect {
            UpgradeEffect::HeatSink { heat_sink } => Some(Arc::clone(self.item(heat_sink)?)),
            _ => None,
        };
        Ok(Command::set_upgrade(upgrade, heat_sink))
    }

    pub fn set_pod_command(&self, pod: PodId, location: Location) -> Result<Command> {
        Ok(Command::set_pod(Arc::clone(self.pod(pod, location)?)))
    }

    pub fn add_module_command(&self, module: ItemId) -> Result<Command> {
        Ok(Command::add_module(Arc::clone(self.item(module)?)))
    }
}

/// Armor commands for one location: front/back on torsos, the single value
/// elsewhere.
fn armor_values(location: Location, front: u32, back: u32) -> Vec<(ArmorSide, u32)> {
    if location.is_two_sided() {
        vec![(ArmorSide::Front, front), (ArmorSide::Back, back)]
    } else {
        vec![(ArmorSide::Only, front)]
    }
}

/// Normalize a chassis name for case-insensitive lookup.
fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const MINIMAL: &str = r#"{
        "items": [
            { "id": 1000, "name": "Heat Sink", "slots": 1, "mass": 1.0, "kind": "heat_sink" }
        ],
        "upgrades": [
            { "id": 2810, "name": "Standard Armor", "kind": "armor", "points_per_ton": 32.0 },
            {
                "id": 3100, "name": "Standard Structure", "kind": "structure",
                "internal_mass_fraction": 0.1
            },
            { "id": 3000, "name": "Single Heat Sinks", "kind": "heat_sink", "heat_sink": 1000 },
            {
                "id": 3050, "name": "No Guidance", "kind": "guidance",
                "slots_per_launcher": 0, "tons_per_launcher": 0.0
            }
        ],
        "chassis": [
            {
                "id": 2000, "name": "Hunchback HBK-4G", "mass": 50.0,
                "engine_min": 100, "engine_max": 300,
                "upgrades": {
                    "armor": 2810, "structure": 3100, "heat_sink": 3000, "guidance": 3050
                },
                "components": [
                    { "location": "head", "slots": 6, "health": 9 },
                    { "location": "right_arm", "slots": 12, "health": 16 },
                    { "location": "right_torso", "slots": 12, "health": 20 },
                    { "location": "right_leg", "slots": 6, "health": 24 },
                    { "location": "center_torso", "slots": 12, "health": 31 },
                    { "location": "left_torso", "slots": 12, "health": 20 },
                    { "location": "left_leg", "slots": 6, "health": 24 },
                    { "location": "left_arm", "slots": 12, "health": 16 }
                ]
            }
        ],
        "stock": [
            {
                "chassis": 2000,
                "components": [
                    { "location": "center_torso", "armor": 40, "armor_back": 12, "items": [1000] }
                ]
            }
        ]
    }"#;

    #[test]
    fn loads_minimal_catalog_and_stock() {
        let db = Database::from_reader(Cursor::new(MINIMAL)).expect("valid catalog");
        assert_eq!(db.chassis(2000).expect("chassis").mass_max, 50.0);
        let stock = db.stock_loadout(2000).expect("stock loadout");
        assert_eq!(stock.armor(Location::CenterTorso, ArmorSide::Front), 40);
        assert_eq!(stock.heat_sink_count(), 1);
    }

    #[test]
    fn unknown_ids_are_typed_errors() {
        let db = Database::from_reader(Cursor::new(MINIMAL)).expect("valid catalog");
        assert!(matches!(db.item(1), Err(Error::UnknownItem { id: 1 })));
        assert!(matches!(db.upgrade(2), Err(Error::UnknownUpgrade { id: 2 })));
        assert!(matches!(db.chassis(3), Err(Error::UnknownChassis { id: 3 })));
        assert!(matches!(
            db.pod(4, Location::LeftArm),
            Err(Error::UnknownPod { id: 4, .. })
        ));
    }

    #[test]
    fn chassis_names_are_matched_case_insensitively_with_suggestions() {
        let db = Database::from_reader(Cursor::new(MINIMAL)).expect("valid catalog");
        assert_eq!(
            db.chassis_by_name("hunchback hbk-4g").expect("found").id,
            2000
        );
        let err = db.chassis_by_name("Hunchbak HBK-4G").expect_err("typo");
        match err {
            Error::UnknownChassisName { suggestions, .. } => {
                assert_eq!(suggestions, vec!["Hunchback HBK-4G".to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_component_is_rejected() {
        let broken = MINIMAL.replace(
            r#"{ "location": "left_arm", "slots": 12, "health": 16 }"#,
            r#"{ "location": "left_leg", "slots": 12, "health": 16 }"#,
        );
        let err = Database::from_reader(Cursor::new(broken)).expect_err("left leg twice");
        assert!(matches!(err, Error::CatalogValidation { .. }));
    }

    #[test]
    fn invalid_stock_loadout_is_rejected() {
        let broken = MINIMAL.replace(r#""armor": 40"#, r#""armor": 400"#);
        let err = Database::from_reader(Cursor::new(broken)).expect_err("too much armor");
        match err {
            Error::CatalogValidation { message } => assert!(message.contains("stock loadout")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
