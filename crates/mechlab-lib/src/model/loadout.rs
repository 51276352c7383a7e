//! Mutable loadout state and derived slot/mass bookkeeping.
//!
//! A [`Loadout`] is a plain value: cloning it produces an independent copy.
//! Reference data (chassis, items, pods, upgrades) is shared through `Arc`
//! handles, which is safe because those values are immutable.
//!
//! Mutation goes through [`crate::command::Command`]; the setters here are
//! crate-private and perform no validation.

use std::sync::Arc;

use super::chassis::{Chassis, Pod};
use super::item::{Actuator, HardPoint, HardPointType, Item, ItemId};
use super::location::{ArmorSide, Location, LOCATION_COUNT};
use super::upgrade::Upgrades;

/// On/off state of the toggleable arm actuators of one location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActuatorToggles {
    pub lower_arm: bool,
    pub hand: bool,
}

impl ActuatorToggles {
    pub const ALL_ON: ActuatorToggles = ActuatorToggles {
        lower_arm: true,
        hand: true,
    };

    /// Toggles matching what a pod physically carries.
    pub fn for_pod(pod: &Pod) -> Self {
        Self {
            lower_arm: pod.actuators.lower_arm,
            hand: pod.actuators.hand,
        }
    }

    pub fn get(&self, actuator: Actuator) -> bool {
        match actuator {
            Actuator::LowerArm => self.lower_arm,
            Actuator::Hand => self.hand,
        }
    }

    pub fn set(&mut self, actuator: Actuator, state: bool) {
        match actuator {
            Actuator::LowerArm => self.lower_arm = state,
            Actuator::Hand => self.hand = state,
        }
    }
}

/// Player configuration of one location.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfiguredComponent {
    location: Location,
    items: Vec<Arc<Item>>,
    armor_front: u32,
    armor_back: u32,
    pod: Option<Arc<Pod>>,
    toggles: ActuatorToggles,
}

impl ConfiguredComponent {
    fn new(location: Location, pod: Option<Arc<Pod>>) -> Self {
        let toggles = pod
            .as_deref()
            .filter(|_| location.is_arm())
            .map(ActuatorToggles::for_pod)
            .unwrap_or(ActuatorToggles::ALL_ON);
        Self {
            location,
            items: Vec::new(),
            armor_front: 0,
            armor_back: 0,
            pod,
            toggles,
        }
    }

    pub fn location(&self) -> Location {
        self.location
    }

    /// Equipped (removable) items in insertion order.
    pub fn items(&self) -> &[Arc<Item>] {
        &self.items
    }

    pub fn armor(&self, side: ArmorSide) -> u32 {
        match side {
            ArmorSide::Only | ArmorSide::Front => self.armor_front,
            ArmorSide::Back => self.armor_back,
        }
    }

    pub fn armor_total(&self) -> u32 {
        self.armor_front + self.armor_back
    }

    pub fn pod(&self) -> Option<&Arc<Pod>> {
        self.pod.as_ref()
    }

    pub fn toggles(&self) -> ActuatorToggles {
        self.toggles
    }

    pub fn has_large_bore(&self) -> bool {
        self.items.iter().any(|item| item.is_large_bore())
    }
}

/// A player-chosen equipment configuration for one chassis.
#[derive(Debug, Clone, PartialEq)]
pub struct Loadout {
    name: String,
    chassis: Arc<Chassis>,
    components: Vec<ConfiguredComponent>,
    upgrades: Upgrades,
    modules: Vec<Arc<Item>>,
}

impl Loadout {
    /// Create an empty loadout. `pods` supplies the initial pod of every
    /// pod-selectable location on omni chassis; it is ignored otherwise.
    pub fn new<F>(chassis: Arc<Chassis>, upgrades: Upgrades, mut pods: F) -> Self
    where
        F: FnMut(Location) -> Option<Arc<Pod>>,
    {
        let components = Location::ALL
            .iter()
            .map(|&location| {
                let pod = if chassis.is_omni() {
                    pods(location)
                } else {
                    None
                };
                ConfiguredComponent::new(location, pod)
            })
            .collect();
        Self {
            name: chassis.name.clone(),
            chassis,
            components,
            upgrades,
            modules: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn chassis(&self) -> &Arc<Chassis> {
        &self.chassis
    }

    pub fn component(&self, location: Location) -> &ConfiguredComponent {
        &self.components[location.index()]
    }

    pub fn components(&self) -> &[ConfiguredComponent] {
        &self.components
    }

    pub fn upgrades(&self) -> &Upgrades {
        &self.upgrades
    }

    pub fn modules(&self) -> &[Arc<Item>] {
        &self.modules
    }

    /// Every equipped item with its location, in declaration order.
    pub fn equipped_items(&self) -> impl Iterator<Item = (Location, &Arc<Item>)> {
        self.components
            .iter()
            .flat_map(|c| c.items.iter().map(move |item| (c.location, item)))
    }

    // ---------------------------------------------------------------------
    // Hardpoints
    // ---------------------------------------------------------------------

    /// Hardpoints at a location: the selected pod's, or the chassis'.
    pub fn hardpoints(&self, location: Location) -> &[HardPoint] {
        match &self.component(location).pod {
            Some(pod) => &pod.hardpoints,
            None => &self.chassis.component(location).hardpoints,
        }
    }

    pub fn hardpoint_count(&self, location: Location, kind: HardPointType) -> usize {
        self.hardpoints(location)
            .iter()
            .filter(|hp| hp.kind == kind)
            .count()
    }

    pub fn hardpoints_used(&self, location: Location, kind: HardPointType) -> usize {
        self.component(location)
            .items
            .iter()
            .filter(|item| item.hardpoint == kind)
            .count()
    }

    // ---------------------------------------------------------------------
    // Engine and jump jets
    // ---------------------------------------------------------------------

    /// The engine of the loadout, fixed or equipped, with its location.
    pub fn engine(&self) -> Option<(Location, &Arc<Item>)> {
        self.chassis
            .components
            .iter()
            .flat_map(|c| c.fixed_items.iter().map(move |i| (c.location, i)))
            .chain(self.equipped_items())
            .find(|(_, item)| item.is_engine())
    }

    /// The engine if it was equipped by the player rather than fixed.
    pub fn equipped_engine(&self) -> Option<&Arc<Item>> {
        self.equipped_items()
            .map(|(_, item)| item)
            .find(|item| item.is_engine())
    }

    /// Slots a side torso gives up to the equipped engine's shielding.
    pub fn engine_reserved_slots(&self, location: Location) -> u32 {
        if !location.is_side_torso() {
            return 0;
        }
        self.equipped_engine()
            .and_then(|engine| engine.engine())
            .map(|spec| spec.reserved_side_slots())
            .unwrap_or(0)
    }

    pub fn jump_jet_count(&self) -> usize {
        self.equipped_items()
            .filter(|(_, item)| item.is_jump_jet())
            .count()
    }

    pub fn heat_sink_count(&self) -> usize {
        let fixed = self
            .chassis
            .components
            .iter()
            .flat_map(|c| c.fixed_items.iter())
            .filter(|item| item.is_heat_sink())
            .count();
        fixed
            + self
                .equipped_items()
                .filter(|(_, item)| item.is_heat_sink())
                .count()
    }

    // ---------------------------------------------------------------------
    // Slots
    // ---------------------------------------------------------------------

    /// Fixed items currently present at a location. Toggled-off actuators
    /// are absent.
    pub fn fixed_items(&self, location: Location) -> impl Iterator<Item = &Arc<Item>> {
        let toggles = self.component(location).toggles;
        self.chassis
            .component(location)
            .fixed_items
            .iter()
            .filter(move |item| match item.actuator() {
                Some(actuator) => toggles.get(actuator),
                None => true,
            })
    }

    pub fn fixed_slots(&self, location: Location) -> u32 {
        self.fixed_items(location).map(|item| item.slots).sum()
    }

    pub fn item_slots(&self, location: Location) -> u32 {
        self.component(location)
            .items
            .iter()
            .map(|item| self.upgrades.item_slots(item))
            .sum()
    }

    /// Omni chassis reserve dynamic slots per location; standard chassis
    /// distribute them (see [`Loadout::dynamic_slots`]).
    fn omni_dynamic_slots(&self, location: Location) -> u32 {
        if self.chassis.is_omni() {
            let component = self.chassis.component(location);
            component.dynamic_armor_slots + component.dynamic_structure_slots
        } else {
            0
        }
    }

    /// Slots used at a location, excluding floating dynamic slots of
    /// standard chassis.
    pub fn slots_used(&self, location: Location) -> u32 {
        self.fixed_slots(location)
            + self.item_slots(location)
            + self.engine_reserved_slots(location)
            + self.omni_dynamic_slots(location)
    }

    /// Slots free at a location, ignoring floating dynamic slots.
    pub fn slots_free(&self, location: Location) -> u32 {
        self.chassis
            .component(location)
            .slots
            .saturating_sub(self.slots_used(location))
    }

    /// Dynamic slots occupying each location, indexed by
    /// [`Location::index`]. Standard chassis fill free slots in
    /// right-to-left location order.
    pub fn dynamic_slot_distribution(&self) -> [u32; LOCATION_COUNT] {
        let mut distribution = [0u32; LOCATION_COUNT];
        if self.chassis.is_omni() {
            for location in Location::ALL {
                distribution[location.index()] = self.omni_dynamic_slots(location);
            }
            return distribution;
        }

        let mut remaining = self.upgrades.dynamic_slots();
        for location in Location::RIGHT_TO_LEFT {
            let taken = self.slots_free(location).min(remaining);
            distribution[location.index()] = taken;
            remaining -= taken;
        }
        distribution
    }

    pub fn dynamic_slots(&self, location: Location) -> u32 {
        self.dynamic_slot_distribution()[location.index()]
    }

    /// Dynamic slots the loadout needs in total.
    pub fn dynamic_slots_required(&self) -> u32 {
        if self.chassis.is_omni() {
            Location::ALL
                .iter()
                .map(|&l| self.omni_dynamic_slots(l))
                .sum()
        } else {
            self.upgrades.dynamic_slots()
        }
    }

    /// All slots in use, including every required dynamic slot.
    pub fn slots_used_total(&self) -> u32 {
        let used: u32 = Location::ALL.iter().map(|&l| self.slots_used(l)).sum();
        if self.chassis.is_omni() {
            used
        } else {
            used + self.upgrades.dynamic_slots()
        }
    }

    pub fn slots_free_total(&self) -> u32 {
        self.chassis
            .total_slots()
            .saturating_sub(self.slots_used_total())
    }

    // ---------------------------------------------------------------------
    // Armor and mass
    // ---------------------------------------------------------------------

    pub fn armor(&self, location: Location, side: ArmorSide) -> u32 {
        self.component(location).armor(side)
    }

    pub fn armor_total(&self) -> u32 {
        self.components.iter().map(|c| c.armor_total()).sum()
    }

    /// Maximum armor for a location under the current armor upgrade.
    pub fn armor_max(&self, location: Location) -> u32 {
        self.chassis
            .component(location)
            .max_armor(self.upgrades.max_armor_multiplier())
    }

    pub fn armor_max_total(&self) -> u32 {
        Location::ALL.iter().map(|&l| self.armor_max(l)).sum()
    }

    pub fn armor_mass(&self) -> f64 {
        let per_ton = self.upgrades.armor_points_per_ton();
        if per_ton > 0.0 {
            f64::from(self.armor_total()) / per_ton
        } else {
            0.0
        }
    }

    /// Internal structure mass, rounded to the nearest half ton.
    pub fn structure_mass(&self) -> f64 {
        round_to_half_ton(self.chassis.mass_max * self.upgrades.internal_mass_fraction())
    }

    pub fn items_mass(&self) -> f64 {
        let fixed: f64 = Location::ALL
            .iter()
            .flat_map(|&l| self.fixed_items(l))
            .map(|item| item.mass)
            .sum();
        let equipped: f64 = self
            .equipped_items()
            .map(|(_, item)| self.upgrades.item_mass(item))
            .sum();
        let modules: f64 = self.modules.iter().map(|m| m.mass).sum();
        fixed + equipped + modules
    }

    pub fn mass(&self) -> f64 {
        self.structure_mass() + self.items_mass() + self.armor_mass()
    }

    /// Tons left before reaching the chassis mass limit; negative if over.
    pub fn free_mass(&self) -> f64 {
        self.chassis.mass_max - self.mass()
    }

    // ---------------------------------------------------------------------
    // Crate-private mutation, used by commands
    // ---------------------------------------------------------------------

    pub(crate) fn push_item(&mut self, location: Location, item: Arc<Item>) {
        self.components[location.index()].items.push(item);
    }

    pub(crate) fn insert_item(&mut self, location: Location, index: usize, item: Arc<Item>) {
        let items = &mut self.components[location.index()].items;
        let index = index.min(items.len());
        items.insert(index, item);
    }

    /// Remove the last equipped instance of `item_id`, returning its index.
    pub(crate) fn take_item(&mut self, location: Location, item_id: ItemId) -> Option<usize> {
        let items = &mut self.components[location.index()].items;
        let index = items.iter().rposition(|i| i.id == item_id)?;
        items.remove(index);
        Some(index)
    }

    pub(crate) fn set_armor(&mut self, location: Location, side: ArmorSide, amount: u32) {
        let component = &mut self.components[location.index()];
        match side {
            ArmorSide::Only | ArmorSide::Front => component.armor_front = amount,
            ArmorSide::Back => component.armor_back = amount,
        }
    }

    pub(crate) fn set_pod(
        &mut self,
        location: Location,
        pod: Option<Arc<Pod>>,
    ) -> Option<Arc<Pod>> {
        std::mem::replace(&mut self.components[location.index()].pod, pod)
    }

    pub(crate) fn set_toggles(&mut self, location: Location, toggles: ActuatorToggles) {
        self.components[location.index()].toggles = toggles;
    }

    pub(crate) fn set_items(
        &mut self,
        location: Location,
        items: Vec<Arc<Item>>,
    ) -> Vec<Arc<Item>> {
        std::mem::replace(&mut self.components[location.index()].items, items)
    }

    pub(crate) fn upgrades_mut(&mut self) -> &mut Upgrades {
        &mut self.upgrades
    }

    pub(crate) fn modules_mut(&mut self) -> &mut Vec<Arc<Item>> {
        &mut self.modules
    }
}

fn round_to_half_ton(tons: f64) -> f64 {
    (tons * 2.0).round() / 2.0
}
