//! Loadout rendering for the decode command.
//!
//! [`LoadoutView`] is a flat, serializable snapshot of a loadout. The text
//! renderer and the JSON output both read from it.

use std::io::{self, Write};

use serde::Serialize;

use mechlab_lib::model::UpgradeKind;
use mechlab_lib::{Actuator, ArmorSide, Loadout, LoadoutStats, Location};

const UPGRADE_KINDS: [UpgradeKind; 4] = [
    UpgradeKind::Armor,
    UpgradeKind::Structure,
    UpgradeKind::HeatSink,
    UpgradeKind::Guidance,
];

#[derive(Debug, Clone, Serialize)]
pub struct UpgradeView {
    pub kind: String,
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComponentView {
    pub location: Location,
    pub armor_front: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub armor_back: Option<u32>,
    pub armor_max: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pod: Option<String>,
    /// Toggleable actuators that are switched on. Omni arms only.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub actuators: Vec<String>,
    pub items: Vec<String>,
    pub slots_used: u32,
    pub slots_free: u32,
    /// Floating upgrade slots placed here. Standard chassis fill them right
    /// to left.
    pub dynamic_slots: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoadoutView {
    pub chassis: String,
    pub chassis_id: u32,
    pub upgrades: Vec<UpgradeView>,
    pub components: Vec<ComponentView>,
    pub modules: Vec<String>,
    pub stats: LoadoutStats,
    pub warnings: Vec<String>,
}

impl LoadoutView {
    pub fn new(loadout: &Loadout, warnings: Vec<String>) -> Self {
        let chassis = loadout.chassis();
        let upgrades = UPGRADE_KINDS
            .iter()
            .map(|&kind| {
                let upgrade = loadout.upgrades().get(kind);
                UpgradeView {
                    kind: kind.to_string(),
                    id: upgrade.id,
                    name: upgrade.name.clone(),
                }
            })
            .collect();

        let components = Location::ALL
            .iter()
            .map(|&location| component_view(loadout, location))
            .collect();

        Self {
            chassis: chassis.name.clone(),
            chassis_id: chassis.id,
            upgrades,
            components,
            modules: loadout.modules().iter().map(|m| m.name.clone()).collect(),
            stats: LoadoutStats::from_loadout(loadout),
            warnings,
        }
    }
}

fn component_view(loadout: &Loadout, location: Location) -> ComponentView {
    let component = loadout.component(location);
    let (armor_front, armor_back) = if location.is_two_sided() {
        (
            component.armor(ArmorSide::Front),
            Some(component.armor(ArmorSide::Back)),
        )
    } else {
        (component.armor(ArmorSide::Only), None)
    };

    let actuators = match component.pod() {
        Some(_) if location.is_arm() => [Actuator::LowerArm, Actuator::Hand]
            .into_iter()
            .filter(|&actuator| component.toggles().get(actuator))
            .map(|actuator| actuator.to_string())
            .collect(),
        _ => Vec::new(),
    };

    ComponentView {
        location,
        armor_front,
        armor_back,
        armor_max: loadout.armor_max(location),
        pod: component.pod().map(|pod| pod.name.clone()),
        actuators,
        items: component.items().iter().map(|i| i.name.clone()).collect(),
        slots_used: loadout.slots_used(location),
        slots_free: loadout.slots_free(location),
        dynamic_slots: loadout.dynamic_slots(location),
    }
}

/// Write a human-readable rendering of `view`.
pub fn render_loadout<W: Write>(out: &mut W, view: &LoadoutView) -> io::Result<()> {
    writeln!(out, "{} ({})", view.chassis, view.chassis_id)?;
    for upgrade in &view.upgrades {
        writeln!(out, "  {:<11} {}", upgrade.kind, upgrade.name)?;
    }
    writeln!(out)?;
    writeln!(
        out,
        "{:<4} {:>9} {:>5} {:>3} {:<20} {}",
        "Loc", "Armor", "Slots", "Dyn", "Pod", "Items"
    )?;
    for component in &view.components {
        let armor = match component.armor_back {
            Some(back) => format!("{}/{}", component.armor_front, back),
            None => component.armor_front.to_string(),
        };
        let slots = format!(
            "{}/{}",
            component.slots_used,
            component.slots_used + component.slots_free
        );
        let mut items = component.items.join(", ");
        if !component.actuators.is_empty() {
            items = format!("[{}] {}", component.actuators.join(", "), items);
        }
        writeln!(
            out,
            "{:<4} {:>9} {:>5} {:>3} {:<20} {}",
            component.location.short_name(),
            armor,
            slots,
            component.dynamic_slots,
            component.pod.as_deref().unwrap_or("-"),
            items
        )?;
    }
    if !view.modules.is_empty() {
        writeln!(out)?;
        writeln!(out, "Modules: {}", view.modules.join(", "))?;
    }

    let stats = &view.stats;
    writeln!(out)?;
    writeln!(
        out,
        "Mass {:.2} / {:.2} t  Armor {} / {}  Slots {} / {}",
        stats.mass,
        stats.mass_max,
        stats.armor,
        stats.armor_max,
        stats.slots_used,
        stats.slots_total
    )?;
    let engine = stats
        .engine_rating
        .map(|rating| rating.to_string())
        .unwrap_or_else(|| "none".to_string());
    writeln!(
        out,
        "Engine {}  Heat sinks {}  Jump jets {}",
        engine, stats.heat_sinks, stats.jump_jets
    )?;

    if !view.warnings.is_empty() {
        writeln!(out)?;
        writeln!(out, "Warnings ({}):", view.warnings.len())?;
        for warning in &view.warnings {
            writeln!(out, "  - {}", warning)?;
        }
    }
    Ok(())
}
