//! Loadout data model.
//!
//! - [`location`] - Body locations and armor sides
//! - [`item`] - Items, hardpoints and factions
//! - [`upgrade`] - Armor, structure, heat sink and guidance upgrades
//! - [`chassis`] - Chassis, components and omni pods
//! - [`loadout`] - The mutable loadout and its derived quantities
//! - [`stats`] - Derived summary metrics

pub mod chassis;
pub mod item;
pub mod loadout;
pub mod location;
pub mod stats;
pub mod upgrade;

pub use chassis::{
    cap_center_torso_missile_tubes, ActuatorAvailability, Chassis, ChassisClass, ChassisId,
    ChassisVariant, Component, Pod, PodId, PodSlot, UpgradeSet,
    SECONDARY_CENTER_MISSILE_TUBES,
};
pub use item::{
    Actuator, EngineSpec, EngineType, Faction, HardPoint, HardPointType, Item, ItemId, ItemKind,
    WeaponSpec, ENGINE_CENTER_SLOTS,
};
pub use loadout::{ActuatorToggles, ConfiguredComponent, Loadout};
pub use location::{ArmorSide, Location, LOCATION_COUNT};
pub use stats::LoadoutStats;
pub use upgrade::{Upgrade, UpgradeEffect, UpgradeId, UpgradeKind, Upgrades};
