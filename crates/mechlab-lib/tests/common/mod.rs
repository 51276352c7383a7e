//! Common test utilities and fixture helpers.
//!
//! Integration tests load the synthetic catalog under `docs/fixtures` and
//! code loadouts with the embedded frequency table.

use std::path::PathBuf;
use std::sync::Arc;

use mechlab_lib::{ChassisId, Database, Item, ItemId, Loadout};

/// Fixture chassis ids.
#[allow(dead_code)]
pub mod chassis {
    pub const HUNCHBACK: u32 = 2000;
    pub const JENNER: u32 = 2100;
    pub const ATLAS: u32 = 2200;
    pub const TIMBER_WOLF: u32 = 2300;
}

/// Path to fixtures directory used by tests.
#[allow(dead_code)]
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures")
}

/// Path to the fixture catalog.
pub fn catalog_path() -> PathBuf {
    fixtures_dir().join("catalog.json")
}

pub fn catalog() -> Database {
    Database::from_path(&catalog_path()).expect("fixture catalog loads")
}

#[allow(dead_code)]
pub fn stock(db: &Database, chassis: ChassisId) -> Loadout {
    db.stock_loadout(chassis).expect("stock loadout builds")
}

#[allow(dead_code)]
pub fn empty(db: &Database, chassis: ChassisId) -> Loadout {
    db.empty_loadout(chassis).expect("empty loadout builds")
}

#[allow(dead_code)]
pub fn item(db: &Database, id: ItemId) -> Arc<Item> {
    Arc::clone(db.item(id).expect("fixture item present"))
}
