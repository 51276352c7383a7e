//! Mechlab library entry points.
//!
//! This crate loads the mech reference catalog, models loadouts, enforces the
//! equip constraints, applies undoable mutation commands, and encodes
//! loadouts to and from the compact version 3 wire format and its textual
//! links. Higher-level consumers (the CLI) should only depend on the items
//! exported here instead of reimplementing behavior.
//!

#![deny(warnings)]

pub mod catalog;
pub mod codec;
pub mod command;
pub mod error;
pub mod link;
pub mod model;
pub mod rules;

#[cfg(test)]
mod test_helpers;

pub use catalog::Database;
pub use codec::{
    symbol_sequence, ErrorReporter, FrequencyTable, HuffmanCode, LoadoutCoderV3, TracingReporter,
    HEADER_MAGIC, SENTINEL,
};
pub use command::{BatchReport, Command, CommandBatch, CommandKind};
pub use error::{Error, Result};
pub use link::{decode_link, encode_http_link, encode_link, LinkStyle};
pub use model::{
    Actuator, ArmorSide, Chassis, ChassisId, Faction, HardPointType, Item, ItemId, Loadout,
    LoadoutStats, Location, Pod, PodId, Upgrade, UpgradeId,
};
pub use rules::{Denial, DenialKind, EquipOutcome};
