//! Derived metrics shown next to a loadout.

use serde::Serialize;

use super::loadout::Loadout;

/// Summary figures for a loadout. Ratios with a zero denominator are zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadoutStats {
    pub mass: f64,
    pub mass_max: f64,
    pub free_mass: f64,
    pub armor: u32,
    pub armor_max: u32,
    pub armor_ratio: f64,
    pub slots_used: u32,
    pub slots_total: u32,
    pub heat_sinks: usize,
    pub jump_jets: usize,
    pub engine_rating: Option<u32>,
    /// Top speed scale: engine rating per ton of chassis.
    pub rating_per_ton: f64,
}

impl LoadoutStats {
    pub fn from_loadout(loadout: &Loadout) -> Self {
        let chassis = loadout.chassis();
        let armor = loadout.armor_total();
        let armor_max = loadout.armor_max_total();
        let engine_rating = loadout
            .engine()
            .and_then(|(_, item)| item.engine())
            .map(|spec| spec.rating);

        Self {
            mass: loadout.mass(),
            mass_max: chassis.mass_max,
            free_mass: loadout.free_mass(),
            armor,
            armor_max,
            armor_ratio: ratio(f64::from(armor), f64::from(armor_max)),
            slots_used: loadout.slots_used_total(),
            slots_total: chassis.total_slots(),
            heat_sinks: loadout.heat_sink_count(),
            jump_jets: loadout.jump_jet_count(),
            engine_rating,
            rating_per_ton: ratio(
                f64::from(engine_rating.unwrap_or(0)),
                chassis.mass_max,
            ),
        }
    }
}

/// `numerator / denominator`, or zero when the denominator is zero.
pub fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}
