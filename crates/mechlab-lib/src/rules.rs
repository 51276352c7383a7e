//! Constraint engine: pure legality checks over a loadout.
//!
//! Every check answers with an [`EquipOutcome`]. A denial is an ordinary
//! answer, not an error; commands turn denials into
//! [`crate::Error::Denied`] when they refuse to apply.
//!
//! Checks are layered the same way commands use them:
//!
//! 1. [`can_equip`] - chassis-wide rules (faction, engine, jump jets, heat
//!    sink type, mass, floating slot budget)
//! 2. [`can_equip_at`] - one location (slot budget after fixed items,
//!    engine shielding and dynamic slots, hardpoints, location rules)
//! 3. [`verify_loadout_invariant`] - full re-scan after changes that can
//!    invalidate a loadout retroactively (upgrades, pods)

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::model::{
    Actuator, ArmorSide, HardPointType, Item, Loadout, Location, Pod, PodSlot, Upgrade,
    UpgradeKind,
};

/// Tolerance used when comparing masses in tons.
pub const MASS_EPSILON: f64 = 1e-6;

/// Why a mutation is not allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DenialKind {
    TooHeavy,
    NotEnoughSlots,
    /// An extra-light or light engine needs free side torso slots.
    NotEnoughSlotsForXlSides,
    NoFreeHardPoints,
    IncompatibleUpgrades,
    EngineAlreadyPresent,
    EngineRatingOutOfBounds,
    ChassisDisallows,
    NotCompatibleWithChassis,
    /// The item may not be placed at this location.
    ComponentDisallows,
    JumpJetCapacityReached,
    ArmorExceedsMaximum,
    ActuatorNotToggleable,
    ActuatorNotPresent,
    LowerArmActuatorRequired,
    LargeBoreWeaponPresent,
    ModuleCapacityReached,
    ModuleAlreadyEquipped,
    InternalItem,
    IncompatiblePod,
}

impl fmt::Display for DenialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            DenialKind::TooHeavy => "too heavy",
            DenialKind::NotEnoughSlots => "not enough slots",
            DenialKind::NotEnoughSlotsForXlSides => "not enough side torso slots for engine",
            DenialKind::NoFreeHardPoints => "no free hardpoints",
            DenialKind::IncompatibleUpgrades => "incompatible with current upgrades",
            DenialKind::EngineAlreadyPresent => "an engine is already equipped",
            DenialKind::EngineRatingOutOfBounds => "engine rating outside chassis bounds",
            DenialKind::ChassisDisallows => "not allowed on this chassis",
            DenialKind::NotCompatibleWithChassis => "not compatible with chassis faction",
            DenialKind::ComponentDisallows => "not allowed in this location",
            DenialKind::JumpJetCapacityReached => "jump jet capacity reached",
            DenialKind::ArmorExceedsMaximum => "armor exceeds maximum",
            DenialKind::ActuatorNotToggleable => "actuator cannot be toggled",
            DenialKind::ActuatorNotPresent => "actuator not present on pod",
            DenialKind::LowerArmActuatorRequired => "hand actuator requires lower arm actuator",
            DenialKind::LargeBoreWeaponPresent => "large-bore weapon blocks actuators",
            DenialKind::ModuleCapacityReached => "no free module slots",
            DenialKind::ModuleAlreadyEquipped => "module already equipped",
            DenialKind::InternalItem => "internal items cannot be changed",
            DenialKind::IncompatiblePod => "pod does not fit this chassis location",
        };
        f.write_str(text)
    }
}

/// A denied mutation with the offending location where relevant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Error)]
#[error("{kind}{}", at_location(.location))]
pub struct Denial {
    pub kind: DenialKind,
    pub location: Option<Location>,
}

fn at_location(location: &Option<Location>) -> String {
    location
        .map(|l| format!(" ({l})"))
        .unwrap_or_default()
}

impl Denial {
    pub fn new(kind: DenialKind) -> Self {
        Self {
            kind,
            location: None,
        }
    }

    pub fn at(kind: DenialKind, location: Location) -> Self {
        Self {
            kind,
            location: Some(location),
        }
    }
}

/// Answer of a legality check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EquipOutcome {
    Allowed,
    Denied(Denial),
}

impl EquipOutcome {
    pub fn is_allowed(&self) -> bool {
        matches!(self, EquipOutcome::Allowed)
    }

    pub fn denial(&self) -> Option<Denial> {
        match self {
            EquipOutcome::Allowed => None,
            EquipOutcome::Denied(denial) => Some(*denial),
        }
    }

    pub fn kind(&self) -> Option<DenialKind> {
        self.denial().map(|d| d.kind)
    }

    pub fn into_result(self) -> Result<(), Denial> {
        match self {
            EquipOutcome::Allowed => Ok(()),
            EquipOutcome::Denied(denial) => Err(denial),
        }
    }
}

impl From<Result<(), Denial>> for EquipOutcome {
    fn from(result: Result<(), Denial>) -> Self {
        match result {
            Ok(()) => EquipOutcome::Allowed,
            Err(denial) => EquipOutcome::Denied(denial),
        }
    }
}

type Check = Result<(), Denial>;

fn ensure(condition: bool, denial: Denial) -> Check {
    if condition {
        Ok(())
    } else {
        Err(denial)
    }
}

fn exceeds(mass: f64, limit: f64) -> bool {
    mass > limit + MASS_EPSILON
}

// -------------------------------------------------------------------------
// Items
// -------------------------------------------------------------------------

/// Chassis-wide feasibility of adding `item` anywhere on the loadout.
pub fn can_equip(loadout: &Loadout, item: &Item) -> EquipOutcome {
    check_equip(loadout, item).into()
}

fn check_equip(loadout: &Loadout, item: &Item) -> Check {
    let chassis = loadout.chassis();

    ensure(!item.is_internal(), Denial::new(DenialKind::InternalItem))?;
    ensure(!item.is_module(), Denial::new(DenialKind::ChassisDisallows))?;
    ensure(
        item.faction.is_compatible(chassis.faction),
        Denial::new(DenialKind::NotCompatibleWithChassis),
    )?;

    if let Some(spec) = item.engine() {
        ensure(
            loadout.engine().is_none(),
            Denial::new(DenialKind::EngineAlreadyPresent),
        )?;
        ensure(
            (chassis.engine_min..=chassis.engine_max).contains(&spec.rating),
            Denial::new(DenialKind::EngineRatingOutOfBounds),
        )?;
    }

    if item.is_jump_jet() {
        ensure(
            chassis.jump_jets_max > 0 && item.jump_jet_fits(chassis.mass_max),
            Denial::new(DenialKind::ChassisDisallows),
        )?;
        ensure(
            loadout.jump_jet_count() < chassis.jump_jets_max as usize,
            Denial::new(DenialKind::JumpJetCapacityReached),
        )?;
    }

    if item.is_heat_sink() {
        ensure(
            loadout.upgrades().heat_sink_item() == Some(item.id),
            Denial::new(DenialKind::IncompatibleUpgrades),
        )?;
    }

    ensure(
        !exceeds(
            loadout.mass() + loadout.upgrades().item_mass(item),
            chassis.mass_max,
        ),
        Denial::new(DenialKind::TooHeavy),
    )?;

    // Omni chassis have no floating slots; the location check is exact.
    if !chassis.is_omni() {
        let side_slots = item
            .engine()
            .map(|spec| spec.reserved_side_slots() * 2)
            .unwrap_or(0);
        let needed = loadout.upgrades().item_slots(item) + side_slots;
        ensure(
            needed <= loadout.slots_free_total(),
            Denial::new(DenialKind::NotEnoughSlots),
        )?;
    }

    Ok(())
}

/// Location-level feasibility of placing `item` at `location`. The engine
/// context (side torso shielding of the current engine) is read from the
/// loadout.
pub fn can_equip_at(loadout: &Loadout, location: Location, item: &Item) -> EquipOutcome {
    check_equip_at(loadout, location, item).into()
}

fn check_equip_at(loadout: &Loadout, location: Location, item: &Item) -> Check {
    if item.is_engine() {
        ensure(
            location == Location::CenterTorso,
            Denial::at(DenialKind::ComponentDisallows, location),
        )?;
    }
    if item.is_jump_jet() {
        ensure(
            location.allows_jump_jets(),
            Denial::at(DenialKind::ComponentDisallows, location),
        )?;
    }

    let needed = loadout.upgrades().item_slots(item);
    let available = loadout.slots_free(location) + large_bore_slack(loadout, location, item);
    ensure(
        needed <= available,
        Denial::at(DenialKind::NotEnoughSlots, location),
    )?;

    if let Some(spec) = item.engine() {
        let reserved = spec.reserved_side_slots();
        for side in [Location::RightTorso, Location::LeftTorso] {
            ensure(
                reserved <= loadout.slots_free(side),
                Denial::at(DenialKind::NotEnoughSlotsForXlSides, side),
            )?;
        }
    }

    if item.hardpoint != HardPointType::None {
        ensure(
            loadout.hardpoints_used(location, item.hardpoint)
                < loadout.hardpoint_count(location, item.hardpoint),
            Denial::at(DenialKind::NoFreeHardPoints, location),
        )?;
    }

    Ok(())
}

/// Slots a large-bore weapon frees on an omni arm by pushing out the
/// lower arm and hand actuators.
fn large_bore_slack(loadout: &Loadout, location: Location, item: &Item) -> u32 {
    if !loadout.chassis().is_omni() || !location.is_arm() || !item.is_large_bore() {
        return 0;
    }
    loadout
        .fixed_items(location)
        .filter(|fixed| fixed.actuator().is_some())
        .map(|fixed| fixed.slots)
        .sum()
}

/// Both layers in order: chassis-wide first, then the location.
pub fn can_add_item(loadout: &Loadout, location: Location, item: &Item) -> EquipOutcome {
    check_equip(loadout, item)
        .and_then(|()| check_equip_at(loadout, location, item))
        .into()
}

// -------------------------------------------------------------------------
// Actuators, armor, modules, upgrades, pods
// -------------------------------------------------------------------------

/// Whether an arm actuator of an omni loadout may be set to `state`.
pub fn can_toggle_actuator(
    loadout: &Loadout,
    location: Location,
    actuator: Actuator,
    state: bool,
) -> EquipOutcome {
    check_toggle_actuator(loadout, location, actuator, state).into()
}

fn check_toggle_actuator(
    loadout: &Loadout,
    location: Location,
    actuator: Actuator,
    state: bool,
) -> Check {
    let component = loadout.component(location);
    ensure(
        loadout.chassis().is_omni() && location.is_arm(),
        Denial::at(DenialKind::ActuatorNotToggleable, location),
    )?;
    if !state || component.toggles().get(actuator) {
        return Ok(());
    }

    let available = component
        .pod()
        .map(|pod| pod.actuators.has(actuator))
        .unwrap_or(false);
    ensure(
        available,
        Denial::at(DenialKind::ActuatorNotPresent, location),
    )?;
    if actuator == Actuator::Hand {
        ensure(
            component.toggles().lower_arm,
            Denial::at(DenialKind::LowerArmActuatorRequired, location),
        )?;
    }
    ensure(
        !component.has_large_bore(),
        Denial::at(DenialKind::LargeBoreWeaponPresent, location),
    )?;

    if let Some(fixed) = loadout.chassis().component(location).fixed_actuator(actuator) {
        ensure(
            fixed.slots <= loadout.slots_free(location),
            Denial::at(DenialKind::NotEnoughSlots, location),
        )?;
        ensure(
            !exceeds(loadout.mass() + fixed.mass, loadout.chassis().mass_max),
            Denial::new(DenialKind::TooHeavy),
        )?;
    }
    Ok(())
}

/// Whether one armor side may be set to `amount` points.
pub fn can_set_armor(
    loadout: &Loadout,
    location: Location,
    side: ArmorSide,
    amount: u32,
) -> EquipOutcome {
    check_set_armor(loadout, location, side, amount).into()
}

fn check_set_armor(loadout: &Loadout, location: Location, side: ArmorSide, amount: u32) -> Check {
    ensure(
        location.armor_sides().contains(&side),
        Denial::at(DenialKind::ComponentDisallows, location),
    )?;

    let component = loadout.component(location);
    let other = match side {
        ArmorSide::Only => 0,
        ArmorSide::Front => component.armor(ArmorSide::Back),
        ArmorSide::Back => component.armor(ArmorSide::Front),
    };
    ensure(
        other + amount <= loadout.armor_max(location),
        Denial::at(DenialKind::ArmorExceedsMaximum, location),
    )?;

    let current = component.armor(side);
    if amount > current {
        let per_ton = loadout.upgrades().armor_points_per_ton();
        let added = if per_ton > 0.0 {
            f64::from(amount - current) / per_ton
        } else {
            0.0
        };
        ensure(
            !exceeds(loadout.mass() + added, loadout.chassis().mass_max),
            Denial::new(DenialKind::TooHeavy),
        )?;
    }
    Ok(())
}

/// Whether a pilot module may be added.
pub fn can_add_module(loadout: &Loadout, module: &Item) -> EquipOutcome {
    check_add_module(loadout, module).into()
}

fn check_add_module(loadout: &Loadout, module: &Item) -> Check {
    let chassis = loadout.chassis();
    ensure(module.is_module(), Denial::new(DenialKind::ChassisDisallows))?;
    ensure(
        module.faction.is_compatible(chassis.faction),
        Denial::new(DenialKind::NotCompatibleWithChassis),
    )?;
    ensure(
        !loadout.modules().iter().any(|m| m.id == module.id),
        Denial::new(DenialKind::ModuleAlreadyEquipped),
    )?;
    ensure(
        loadout.modules().len() < chassis.module_slots as usize,
        Denial::new(DenialKind::ModuleCapacityReached),
    )?;
    ensure(
        !exceeds(loadout.mass() + module.mass, chassis.mass_max),
        Denial::new(DenialKind::TooHeavy),
    )
}

/// Preconditions of an upgrade change. The consequences of the change are
/// checked afterwards with [`verify_loadout_invariant`].
pub fn can_set_upgrade(loadout: &Loadout, upgrade: &Upgrade) -> EquipOutcome {
    let chassis = loadout.chassis();
    let result = ensure(
        upgrade.faction.is_compatible(chassis.faction),
        Denial::new(DenialKind::NotCompatibleWithChassis),
    )
    .and_then(|()| {
        ensure(
            !chassis.is_omni() || upgrade.kind() == UpgradeKind::Guidance,
            Denial::new(DenialKind::ChassisDisallows),
        )
    });
    result.into()
}

/// Preconditions of a pod change.
pub fn can_set_pod(loadout: &Loadout, pod: &Pod) -> EquipOutcome {
    let chassis = loadout.chassis();
    let location = pod.location;
    let result = ensure(
        chassis.is_omni(),
        Denial::at(DenialKind::ChassisDisallows, location),
    )
    .and_then(|()| {
        let selectable = matches!(
            chassis.component(location).pod,
            PodSlot::Selectable { .. }
        );
        ensure(
            selectable && chassis.series() == Some(pod.series.as_str()),
            Denial::at(DenialKind::IncompatiblePod, location),
        )
    });
    result.into()
}

// -------------------------------------------------------------------------
// Whole-loadout invariant
// -------------------------------------------------------------------------

/// Re-scan every location and the whole loadout, returning the first
/// violated invariant.
pub fn verify_loadout_invariant(loadout: &Loadout) -> EquipOutcome {
    check_invariant(loadout).into()
}

fn check_invariant(loadout: &Loadout) -> Check {
    let chassis = loadout.chassis();
    let upgrades = loadout.upgrades();

    for location in Location::RIGHT_TO_LEFT {
        let definition = chassis.component(location);
        let component = loadout.component(location);

        ensure(
            loadout.slots_used(location) <= definition.slots,
            Denial::at(DenialKind::NotEnoughSlots, location),
        )?;
        for kind in HardPointType::ALL {
            if kind == HardPointType::None {
                continue;
            }
            ensure(
                loadout.hardpoints_used(location, kind) <= loadout.hardpoint_count(location, kind),
                Denial::at(DenialKind::NoFreeHardPoints, location),
            )?;
        }
        ensure(
            component.armor_total() <= loadout.armor_max(location),
            Denial::at(DenialKind::ArmorExceedsMaximum, location),
        )?;
        if chassis.is_omni() && location.is_arm() && component.has_large_bore() {
            let toggles = component.toggles();
            ensure(
                !toggles.lower_arm && !toggles.hand,
                Denial::at(DenialKind::LargeBoreWeaponPresent, location),
            )?;
        }

        for item in component.items() {
            ensure(
                !item.is_internal() && !item.is_module(),
                Denial::at(DenialKind::ComponentDisallows, location),
            )?;
            ensure(
                !item.is_engine() || location == Location::CenterTorso,
                Denial::at(DenialKind::ComponentDisallows, location),
            )?;
            ensure(
                !item.is_jump_jet() || location.allows_jump_jets(),
                Denial::at(DenialKind::ComponentDisallows, location),
            )?;
            ensure(
                item.faction.is_compatible(chassis.faction),
                Denial::at(DenialKind::NotCompatibleWithChassis, location),
            )?;
            if item.is_heat_sink() {
                ensure(
                    upgrades.heat_sink_item() == Some(item.id),
                    Denial::at(DenialKind::IncompatibleUpgrades, location),
                )?;
            }
            if item.is_jump_jet() {
                ensure(
                    item.jump_jet_fits(chassis.mass_max),
                    Denial::at(DenialKind::ChassisDisallows, location),
                )?;
            }
        }
    }

    let engines = chassis
        .components
        .iter()
        .flat_map(|c| c.fixed_items.iter())
        .chain(loadout.equipped_items().map(|(_, item)| item))
        .filter(|item| item.is_engine())
        .count();
    ensure(engines <= 1, Denial::new(DenialKind::EngineAlreadyPresent))?;
    if let Some(spec) = loadout.equipped_engine().and_then(|item| item.engine()) {
        ensure(
            (chassis.engine_min..=chassis.engine_max).contains(&spec.rating),
            Denial::new(DenialKind::EngineRatingOutOfBounds),
        )?;
    }

    ensure(
        loadout.jump_jet_count() <= chassis.jump_jets_max as usize,
        Denial::new(DenialKind::JumpJetCapacityReached),
    )?;

    for upgrade in upgrades.in_wire_order() {
        ensure(
            upgrade.faction.is_compatible(chassis.faction),
            Denial::new(DenialKind::NotCompatibleWithChassis),
        )?;
    }
    if chassis.is_omni() {
        let fixed = &chassis.upgrades;
        ensure(
            upgrades.armor().id == fixed.armor
                && upgrades.structure().id == fixed.structure
                && upgrades.heat_sink().id == fixed.heat_sink,
            Denial::new(DenialKind::ChassisDisallows),
        )?;
    }

    ensure(
        loadout.slots_used_total() <= chassis.total_slots(),
        Denial::new(DenialKind::NotEnoughSlots),
    )?;
    ensure(
        !exceeds(loadout.mass(), chassis.mass_max),
        Denial::new(DenialKind::TooHeavy),
    )?;
    ensure(
        loadout.modules().len() <= chassis.module_slots as usize,
        Denial::new(DenialKind::ModuleCapacityReached),
    )
}
