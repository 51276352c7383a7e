//! Chassis, component and omni pod definitions.
//!
//! Everything here is immutable reference data. Loadouts hold `Arc` handles
//! to these values and never mutate them.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::item::{Actuator, Faction, HardPoint, HardPointType, Item};
use super::location::Location;
use super::upgrade::UpgradeId;

/// Stable identifier of a chassis in the catalog.
pub type ChassisId = u32;

/// Stable identifier of an omni pod in the catalog.
pub type PodId = u32;

/// Tube cap applied to secondary center torso missile hardpoints.
pub const SECONDARY_CENTER_MISSILE_TUBES: u32 = 5;

/// Weight class derived from chassis mass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChassisClass {
    Light,
    Medium,
    Heavy,
    Assault,
}

impl ChassisClass {
    pub fn from_mass(mass: f64) -> Self {
        if mass < 40.0 {
            ChassisClass::Light
        } else if mass < 60.0 {
            ChassisClass::Medium
        } else if mass < 80.0 {
            ChassisClass::Heavy
        } else {
            ChassisClass::Assault
        }
    }
}

impl fmt::Display for ChassisClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChassisClass::Light => f.write_str("Light"),
            ChassisClass::Medium => f.write_str("Medium"),
            ChassisClass::Heavy => f.write_str("Heavy"),
            ChassisClass::Assault => f.write_str("Assault"),
        }
    }
}

/// Standard chassis have fixed hardpoints and free upgrade choice; omni
/// chassis take swappable pods from one series and have fixed armor,
/// structure and heat sink types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "variant", rename_all = "snake_case")]
pub enum ChassisVariant {
    Standard,
    Omni { series: String },
}

/// How a component gets its hardpoints on an omni chassis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "pod", rename_all = "snake_case")]
pub enum PodSlot {
    /// Hardpoints are part of the chassis definition.
    Fixed,
    /// Hardpoints come from the selected pod.
    Selectable { default_pod: PodId },
}

/// Default upgrade selection of a chassis. On omni chassis the armor,
/// structure and heat sink entries are fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeSet {
    pub armor: UpgradeId,
    pub structure: UpgradeId,
    pub heat_sink: UpgradeId,
    pub guidance: UpgradeId,
}

/// Which toggleable actuators a pod physically carries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActuatorAvailability {
    #[serde(default)]
    pub lower_arm: bool,
    #[serde(default)]
    pub hand: bool,
}

impl ActuatorAvailability {
    pub fn has(&self, actuator: Actuator) -> bool {
        match actuator {
            Actuator::LowerArm => self.lower_arm,
            Actuator::Hand => self.hand,
        }
    }
}

/// A swappable component shell for one location of an omni series.
#[derive(Debug, Clone, PartialEq)]
pub struct Pod {
    pub id: PodId,
    pub name: String,
    pub series: String,
    pub location: Location,
    pub hardpoints: Vec<HardPoint>,
    pub actuators: ActuatorAvailability,
}

impl Pod {
    pub fn hardpoint_count(&self, kind: HardPointType) -> usize {
        self.hardpoints.iter().filter(|hp| hp.kind == kind).count()
    }
}

/// One body location of a chassis.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    pub location: Location,
    pub slots: u32,
    /// Structure hit points; the armor maximum derives from this.
    pub health: f64,
    /// Items that are always present and never serialized.
    pub fixed_items: Vec<Arc<Item>>,
    pub hardpoints: Vec<HardPoint>,
    pub pod: PodSlot,
    /// Omni only: slots permanently taken by the fixed armor type.
    pub dynamic_armor_slots: u32,
    /// Omni only: slots permanently taken by the fixed structure type.
    pub dynamic_structure_slots: u32,
}

impl Component {
    /// Maximum armor for the whole location (both sides on torsos).
    pub fn max_armor(&self, multiplier: f64) -> u32 {
        let max = (self.health * 2.0 * multiplier).round();
        if max.is_finite() && max > 0.0 {
            max as u32
        } else {
            0
        }
    }

    pub fn hardpoint_count(&self, kind: HardPointType) -> usize {
        self.hardpoints.iter().filter(|hp| hp.kind == kind).count()
    }

    /// The fixed item representing a toggleable actuator, if present.
    pub fn fixed_actuator(&self, actuator: Actuator) -> Option<&Arc<Item>> {
        self.fixed_items
            .iter()
            .find(|item| item.actuator() == Some(actuator))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Chassis {
    pub id: ChassisId,
    pub name: String,
    /// Maximum mass in tons.
    pub mass_max: f64,
    pub engine_min: u32,
    pub engine_max: u32,
    pub jump_jets_max: u32,
    pub module_slots: u32,
    pub faction: Faction,
    pub variant: ChassisVariant,
    /// Indexed by [`Location::index`].
    pub components: Vec<Component>,
    pub upgrades: UpgradeSet,
}

impl Chassis {
    pub fn component(&self, location: Location) -> &Component {
        &self.components[location.index()]
    }

    pub fn class(&self) -> ChassisClass {
        ChassisClass::from_mass(self.mass_max)
    }

    pub fn is_omni(&self) -> bool {
        matches!(self.variant, ChassisVariant::Omni { .. })
    }

    /// Omni series name grouping interchangeable pods.
    pub fn series(&self) -> Option<&str> {
        match &self.variant {
            ChassisVariant::Omni { series } => Some(series),
            ChassisVariant::Standard => None,
        }
    }

    pub fn total_slots(&self) -> u32 {
        self.components.iter().map(|c| c.slots).sum()
    }
}

impl fmt::Display for Chassis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Cap every center torso missile hardpoint except the one with the most
/// tubes at [`SECONDARY_CENTER_MISSILE_TUBES`].
pub fn cap_center_torso_missile_tubes(hardpoints: &mut [HardPoint]) {
    let missiles = hardpoints
        .iter()
        .filter(|hp| hp.kind == HardPointType::Missile)
        .count();
    if missiles < 2 {
        return;
    }

    let primary = hardpoints
        .iter()
        .enumerate()
        .filter(|(_, hp)| hp.kind == HardPointType::Missile)
        .fold(None::<(usize, u32)>, |best, (i, hp)| match best {
            Some((_, tubes)) if tubes >= hp.tubes => best,
            _ => Some((i, hp.tubes)),
        })
        .map(|(i, _)| i);

    for (i, hp) in hardpoints.iter_mut().enumerate() {
        if hp.kind == HardPointType::Missile && Some(i) != primary {
            hp.tubes = hp.tubes.min(SECONDARY_CENTER_MISSILE_TUBES);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_follows_mass_brackets() {
        assert_eq!(ChassisClass::from_mass(35.0), ChassisClass::Light);
        assert_eq!(ChassisClass::from_mass(40.0), ChassisClass::Medium);
        assert_eq!(ChassisClass::from_mass(75.0), ChassisClass::Heavy);
        assert_eq!(ChassisClass::from_mass(100.0), ChassisClass::Assault);
    }

    #[test]
    fn secondary_center_missile_hardpoints_are_capped() {
        let mut hardpoints = vec![
            HardPoint::missile(6, true),
            HardPoint::new(HardPointType::Energy),
            HardPoint::missile(15, false),
            HardPoint::missile(10, false),
        ];
        cap_center_torso_missile_tubes(&mut hardpoints);
        assert_eq!(hardpoints[0].tubes, 5);
        assert_eq!(hardpoints[2].tubes, 15);
        assert_eq!(hardpoints[3].tubes, 5);
        assert!(hardpoints[0].has_doors);
    }

    #[test]
    fn single_center_missile_hardpoint_is_untouched() {
        let mut hardpoints = vec![HardPoint::missile(20, false)];
        cap_center_torso_missile_tubes(&mut hardpoints);
        assert_eq!(hardpoints[0].tubes, 20);
    }

    #[test]
    fn equal_tube_counts_keep_the_first_uncapped() {
        let mut hardpoints = vec![HardPoint::missile(10, false), HardPoint::missile(10, false)];
        cap_center_torso_missile_tubes(&mut hardpoints);
        assert_eq!(hardpoints[0].tubes, 10);
        assert_eq!(hardpoints[1].tubes, 5);
    }
}
