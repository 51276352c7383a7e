// Test-only helpers for `mechlab-lib` unit tests
#![allow(dead_code)]

use std::sync::Arc;

use crate::model::{
    Actuator, ActuatorAvailability, Chassis, ChassisVariant, Component, EngineSpec, EngineType,
    Faction, HardPoint, HardPointType, Item, ItemKind, Loadout, Location, Pod, PodSlot, Upgrade,
    UpgradeEffect, UpgradeSet, Upgrades, WeaponSpec,
};

pub const STANDARD_ARMOR: u32 = 2810;
pub const FERRO_FIBROUS: u32 = 2811;
pub const STANDARD_STRUCTURE: u32 = 3100;
pub const ENDO_STEEL: u32 = 3101;
pub const SINGLE_HEAT_SINKS: u32 = 3000;
pub const DOUBLE_HEAT_SINKS: u32 = 3002;
pub const NO_GUIDANCE: u32 = 3050;
pub const ARTEMIS: u32 = 3051;

pub const HEAT_SINK: u32 = 1000;
pub const DOUBLE_HEAT_SINK: u32 = 1001;

pub const OMNI_SERIES: &str = "Timber Wolf";

fn item(
    id: u32,
    name: &str,
    slots: u32,
    mass: f64,
    hardpoint: HardPointType,
    kind: ItemKind,
) -> Arc<Item> {
    Arc::new(Item {
        id,
        name: name.to_string(),
        slots,
        mass,
        hardpoint,
        health: 10.0,
        faction: Faction::Any,
        kind,
    })
}

fn weapon_kind(guided: bool) -> ItemKind {
    ItemKind::Weapon(WeaponSpec {
        heat: 4.0,
        cooldown: 3.0,
        ammo: None,
        guided,
        category: None,
    })
}

pub fn medium_laser() -> Arc<Item> {
    item(1500, "Medium Laser", 1, 1.0, HardPointType::Energy, weapon_kind(false))
}

pub fn energy_weapon(name: &str, slots: u32) -> Arc<Item> {
    item(1501, name, slots, 1.0, HardPointType::Energy, weapon_kind(false))
}

pub fn gauss_rifle(slots: u32) -> Arc<Item> {
    item(1600, "Gauss Rifle", slots, 1.0, HardPointType::Ballistic, weapon_kind(false))
}

pub fn guided_launcher(slots: u32) -> Arc<Item> {
    item(1700, "LRM 10", slots, 1.0, HardPointType::Missile, weapon_kind(true))
}

pub fn equipment(name: &str, slots: u32, mass: f64) -> Arc<Item> {
    item(9000, name, slots, mass, HardPointType::None, ItemKind::Equipment)
}

/// One-slot equipment requiring a hardpoint of `kind`.
pub fn equipment_with_hardpoint(kind: HardPointType) -> Arc<Item> {
    item(9100, "Hardpoint Gadget", 1, 0.5, kind, ItemKind::Equipment)
}

pub fn std_engine(rating: u32) -> Arc<Item> {
    item(
        3200 + rating,
        &format!("STD ENGINE {rating}"),
        6,
        rating as f64 / 25.0,
        HardPointType::None,
        ItemKind::Engine(EngineSpec {
            engine_type: EngineType::Standard,
            rating,
            side_slots: 0,
        }),
    )
}

pub fn xl_engine(rating: u32) -> Arc<Item> {
    item(
        3600 + rating,
        &format!("XL ENGINE {rating}"),
        6,
        rating as f64 / 50.0,
        HardPointType::None,
        ItemKind::Engine(EngineSpec {
            engine_type: EngineType::ExtraLight,
            rating,
            side_slots: 3,
        }),
    )
}

pub fn heat_sink() -> Arc<Item> {
    item(HEAT_SINK, "Heat Sink", 1, 1.0, HardPointType::None, ItemKind::HeatSink)
}

pub fn double_heat_sink() -> Arc<Item> {
    item(DOUBLE_HEAT_SINK, "Double Heat Sink", 3, 1.0, HardPointType::None, ItemKind::HeatSink)
}

pub fn jump_jet(min_tons: f64, max_tons: f64) -> Arc<Item> {
    item(
        1200,
        "Jump Jet",
        1,
        0.5,
        HardPointType::None,
        ItemKind::JumpJet { min_tons, max_tons },
    )
}

pub fn pilot_module(id: u32) -> Arc<Item> {
    item(id, &format!("Module {id}"), 0, 0.0, HardPointType::None, ItemKind::Module)
}

pub fn actuator(actuator: Actuator) -> Arc<Item> {
    let (id, name) = match actuator {
        Actuator::LowerArm => (1900, "Lower Arm"),
        Actuator::Hand => (1901, "Hand"),
    };
    item(
        id,
        name,
        1,
        0.0,
        HardPointType::None,
        ItemKind::Internal {
            actuator: Some(actuator),
        },
    )
}

fn upgrade(id: u32, name: &str, extra_slots: u32, effect: UpgradeEffect) -> Arc<Upgrade> {
    Arc::new(Upgrade {
        id,
        name: name.to_string(),
        faction: Faction::Any,
        extra_slots,
        effect,
    })
}

pub fn standard_armor() -> Arc<Upgrade> {
    upgrade(
        STANDARD_ARMOR,
        "Standard Armor",
        0,
        UpgradeEffect::Armor {
            points_per_ton: 32.0,
            max_armor_multiplier: 1.0,
        },
    )
}

pub fn ferro_fibrous() -> Arc<Upgrade> {
    upgrade(
        FERRO_FIBROUS,
        "Ferro-Fibrous Armor",
        14,
        UpgradeEffect::Armor {
            points_per_ton: 35.84,
            max_armor_multiplier: 1.0,
        },
    )
}

pub fn standard_structure() -> Arc<Upgrade> {
    upgrade(
        STANDARD_STRUCTURE,
        "Standard Structure",
        0,
        UpgradeEffect::Structure {
            internal_mass_fraction: 0.1,
        },
    )
}

pub fn endo_steel() -> Arc<Upgrade> {
    upgrade(
        ENDO_STEEL,
        "Endo-Steel Structure",
        14,
        UpgradeEffect::Structure {
            internal_mass_fraction: 0.05,
        },
    )
}

pub fn single_heat_sinks() -> Arc<Upgrade> {
    upgrade(
        SINGLE_HEAT_SINKS,
        "Single Heat Sinks",
        0,
        UpgradeEffect::HeatSink {
            heat_sink: HEAT_SINK,
        },
    )
}

pub fn double_heat_sinks() -> Arc<Upgrade> {
    upgrade(
        DOUBLE_HEAT_SINKS,
        "Double Heat Sinks",
        0,
        UpgradeEffect::HeatSink {
            heat_sink: DOUBLE_HEAT_SINK,
        },
    )
}

pub fn no_guidance() -> Arc<Upgrade> {
    upgrade(
        NO_GUIDANCE,
        "No Guidance",
        0,
        UpgradeEffect::Guidance {
            slots_per_launcher: 0,
            tons_per_launcher: 0.0,
        },
    )
}

pub fn artemis() -> Arc<Upgrade> {
    upgrade(
        ARTEMIS,
        "Artemis IV",
        0,
        UpgradeEffect::Guidance {
            slots_per_launcher: 1,
            tons_per_launcher: 1.0,
        },
    )
}

pub fn standard_upgrades() -> Upgrades {
    Upgrades::new(
        standard_armor(),
        standard_structure(),
        single_heat_sinks(),
        no_guidance(),
    )
    .expect("standard upgrades are well formed")
}

fn default_slots(location: Location) -> u32 {
    match location {
        Location::Head | Location::LeftLeg | Location::RightLeg => 6,
        _ => 12,
    }
}

fn default_health(location: Location) -> f64 {
    match location {
        Location::Head => 9.0,
        Location::CenterTorso => 30.0,
        Location::LeftTorso | Location::RightTorso => 20.0,
        _ => 15.0,
    }
}

/// Builder to create `Chassis` instances in tests with sensible defaults.
pub struct ChassisBuilder {
    chassis: Chassis,
}

impl ChassisBuilder {
    #[must_use]
    pub fn new(id: u32, mass_max: f64) -> Self {
        let components = Location::ALL
            .iter()
            .map(|&location| Component {
                location,
                slots: default_slots(location),
                health: default_health(location),
                fixed_items: if location.is_arm() {
                    vec![actuator(Actuator::LowerArm), actuator(Actuator::Hand)]
                } else {
                    Vec::new()
                },
                hardpoints: Vec::new(),
                pod: PodSlot::Fixed,
                dynamic_armor_slots: 0,
                dynamic_structure_slots: 0,
            })
            .collect();
        Self {
            chassis: Chassis {
                id,
                name: format!("TEST-{id}"),
                mass_max,
                engine_min: 100,
                engine_max: 300,
                jump_jets_max: 0,
                module_slots: 2,
                faction: Faction::InnerSphere,
                variant: ChassisVariant::Standard,
                components,
                upgrades: UpgradeSet {
                    armor: STANDARD_ARMOR,
                    structure: STANDARD_STRUCTURE,
                    heat_sink: SINGLE_HEAT_SINKS,
                    guidance: NO_GUIDANCE,
                },
            },
        }
    }

    pub fn hardpoint(mut self, location: Location, hardpoint: HardPoint) -> Self {
        self.chassis.components[location.index()]
            .hardpoints
            .push(hardpoint);
        self
    }

    pub fn engine_bounds(mut self, min: u32, max: u32) -> Self {
        self.chassis.engine_min = min;
        self.chassis.engine_max = max;
        self
    }

    pub fn jump_jets(mut self, max: u32) -> Self {
        self.chassis.jump_jets_max = max;
        self
    }

    pub fn module_slots(mut self, slots: u32) -> Self {
        self.chassis.module_slots = slots;
        self
    }

    pub fn fixed_item(mut self, location: Location, item: Arc<Item>) -> Self {
        self.chassis.components[location.index()]
            .fixed_items
            .push(item);
        self
    }

    pub fn omni(mut self, series: &str, default_pods: &[(Location, u32)]) -> Self {
        self.chassis.variant = ChassisVariant::Omni {
            series: series.to_string(),
        };
        self.chassis.faction = Faction::Clan;
        for &(location, pod) in default_pods {
            self.chassis.components[location.index()].pod =
                PodSlot::Selectable { default_pod: pod };
        }
        self
    }

    pub fn build(self) -> Arc<Chassis> {
        Arc::new(self.chassis)
    }
}

pub fn standard_loadout(chassis: Arc<Chassis>) -> Loadout {
    Loadout::new(chassis, standard_upgrades(), |_| None)
}

/// Pods of the test omni series.
pub struct OmniPods {
    /// Default pod of every selectable location, indexed by location.
    pub defaults: Vec<Option<Arc<Pod>>>,
    /// Alternate right arm pod with two energy hardpoints.
    pub right_arm_alt: Arc<Pod>,
    /// Right arm pod of a different series.
    pub foreign: Arc<Pod>,
}

impl OmniPods {
    pub fn default_for(&self, location: Location) -> Option<Arc<Pod>> {
        self.defaults[location.index()].clone()
    }
}

fn pod(
    id: u32,
    series: &str,
    location: Location,
    hardpoints: Vec<HardPoint>,
    actuators: ActuatorAvailability,
) -> Arc<Pod> {
    Arc::new(Pod {
        id,
        name: format!("{series} {}", location.short_name()),
        series: series.to_string(),
        location,
        hardpoints,
        actuators,
    })
}

/// An omni chassis whose right arm pod carries both actuators and an
/// energy plus a ballistic hardpoint, and whose left arm pod lacks a hand.
pub fn omni_chassis() -> (Arc<Chassis>, OmniPods) {
    let mut defaults: Vec<Option<Arc<Pod>>> = vec![None; Location::ALL.len()];
    let mut default_ids = Vec::new();
    for (offset, location) in Location::ALL.into_iter().enumerate() {
        if location == Location::CenterTorso {
            continue;
        }
        let id = 5000 + offset as u32;
        let (hardpoints, actuators) = match location {
            Location::RightArm => (
                vec![
                    HardPoint::new(HardPointType::Energy),
                    HardPoint::new(HardPointType::Ballistic),
                ],
                ActuatorAvailability {
                    lower_arm: true,
                    hand: true,
                },
            ),
            Location::LeftArm => (
                vec![HardPoint::new(HardPointType::Energy)],
                ActuatorAvailability {
                    lower_arm: true,
                    hand: false,
                },
            ),
            _ => (Vec::new(), ActuatorAvailability::default()),
        };
        defaults[location.index()] = Some(pod(id, OMNI_SERIES, location, hardpoints, actuators));
        default_ids.push((location, id));
    }

    let chassis = ChassisBuilder::new(7000, 75.0)
        .omni(OMNI_SERIES, &default_ids)
        .build();
    let pods = OmniPods {
        defaults,
        right_arm_alt: pod(
            5100,
            OMNI_SERIES,
            Location::RightArm,
            vec![
                HardPoint::new(HardPointType::Energy),
                HardPoint::new(HardPointType::Energy),
            ],
            ActuatorAvailability {
                lower_arm: true,
                hand: false,
            },
        ),
        foreign: pod(
            5200,
            "Stormcrow",
            Location::RightArm,
            vec![HardPoint::new(HardPointType::Missile)],
            ActuatorAvailability::default(),
        ),
    };
    (chassis, pods)
}

pub fn omni_loadout(chassis: Arc<Chassis>, pods: &OmniPods) -> Loadout {
    Loadout::new(chassis, standard_upgrades(), |location| pods.default_for(location))
}
