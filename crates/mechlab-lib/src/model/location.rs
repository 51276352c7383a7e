//! Body locations and armor sides.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of body locations on every chassis.
pub const LOCATION_COUNT: usize = 8;

/// A body location of a chassis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Location {
    Head,
    RightArm,
    RightTorso,
    RightLeg,
    CenterTorso,
    LeftTorso,
    LeftLeg,
    LeftArm,
}

impl Location {
    /// Every location in declaration order.
    pub const ALL: [Location; LOCATION_COUNT] = [
        Location::Head,
        Location::RightArm,
        Location::RightTorso,
        Location::RightLeg,
        Location::CenterTorso,
        Location::LeftTorso,
        Location::LeftLeg,
        Location::LeftArm,
    ];

    /// The fixed order used by the wire format and the dynamic slot
    /// distribution.
    pub const RIGHT_TO_LEFT: [Location; LOCATION_COUNT] = [
        Location::RightArm,
        Location::RightTorso,
        Location::RightLeg,
        Location::Head,
        Location::CenterTorso,
        Location::LeftTorso,
        Location::LeftLeg,
        Location::LeftArm,
    ];

    /// Dense index into per-location arrays.
    pub fn index(self) -> usize {
        match self {
            Location::Head => 0,
            Location::RightArm => 1,
            Location::RightTorso => 2,
            Location::RightLeg => 3,
            Location::CenterTorso => 4,
            Location::LeftTorso => 5,
            Location::LeftLeg => 6,
            Location::LeftArm => 7,
        }
    }

    /// Torso locations carry separate front and back armor.
    pub fn is_two_sided(self) -> bool {
        matches!(
            self,
            Location::LeftTorso | Location::CenterTorso | Location::RightTorso
        )
    }

    pub fn is_arm(self) -> bool {
        matches!(self, Location::LeftArm | Location::RightArm)
    }

    pub fn is_side_torso(self) -> bool {
        matches!(self, Location::LeftTorso | Location::RightTorso)
    }

    /// Jump jets mount in torsos and legs only.
    pub fn allows_jump_jets(self) -> bool {
        matches!(
            self,
            Location::LeftTorso
                | Location::CenterTorso
                | Location::RightTorso
                | Location::LeftLeg
                | Location::RightLeg
        )
    }

    /// Armor sides present at this location, in wire order.
    pub fn armor_sides(self) -> &'static [ArmorSide] {
        if self.is_two_sided() {
            &[ArmorSide::Front, ArmorSide::Back]
        } else {
            &[ArmorSide::Only]
        }
    }

    /// Short code used in tables and logs (e.g. `CT`).
    pub fn short_name(self) -> &'static str {
        match self {
            Location::Head => "HD",
            Location::RightArm => "RA",
            Location::RightTorso => "RT",
            Location::RightLeg => "RL",
            Location::CenterTorso => "CT",
            Location::LeftTorso => "LT",
            Location::LeftLeg => "LL",
            Location::LeftArm => "LA",
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Location::Head => "head",
            Location::RightArm => "right arm",
            Location::RightTorso => "right torso",
            Location::RightLeg => "right leg",
            Location::CenterTorso => "center torso",
            Location::LeftTorso => "left torso",
            Location::LeftLeg => "left leg",
            Location::LeftArm => "left arm",
        };
        f.write_str(name)
    }
}

/// Which armor value of a location is addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArmorSide {
    /// The single armor value of a one-sided location.
    Only,
    Front,
    Back,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_are_dense_and_unique() {
        let mut seen = [false; LOCATION_COUNT];
        for location in Location::ALL {
            assert!(!seen[location.index()]);
            seen[location.index()] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn wire_order_has_eleven_armor_sides() {
        let sides: usize = Location::RIGHT_TO_LEFT
            .iter()
            .map(|l| l.armor_sides().len())
            .sum();
        assert_eq!(sides, 11);
    }
}
