//! Reversible loadout mutations.
//!
//! A [`Command`] wraps one [`CommandKind`] plus whatever it needs to undo
//! itself. `apply` consults the constraint engine first and fails with a
//! typed error instead of doing nothing; `undo` restores the exact prior
//! state of a successfully applied command.
//!
//! [`CommandBatch`] records commands (and errors met while building them)
//! and applies them in order, collecting failures rather than stopping at
//! the first one. The codec's decoder and stock loadout construction both go
//! through it.

use std::sync::Arc;

use tracing::debug;

use crate::error::{Error, Result};
use crate::model::{
    Actuator, ActuatorToggles, ArmorSide, HardPointType, Item, Loadout, Location, Pod, Upgrade,
    UpgradeEffect,
};
use crate::rules::{self, Denial, DenialKind};

/// One mutation of a loadout.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandKind {
    AddItem {
        location: Location,
        item: Arc<Item>,
    },
    RemoveItem {
        location: Location,
        item: Arc<Item>,
    },
    SetArmor {
        location: Location,
        side: ArmorSide,
        amount: u32,
    },
    /// `heat_sink` is the item the new heat sink upgrade allows; equipped
    /// heat sinks are swapped to it. Ignored for other upgrade kinds.
    SetUpgrade {
        upgrade: Arc<Upgrade>,
        heat_sink: Option<Arc<Item>>,
    },
    SetPod {
        pod: Arc<Pod>,
    },
    ToggleActuator {
        location: Location,
        actuator: Actuator,
        state: bool,
    },
    AddModule {
        module: Arc<Item>,
    },
    RemoveModule {
        module: Arc<Item>,
    },
}

#[derive(Debug, Clone, PartialEq)]
enum Undo {
    AddItem {
        toggles: Option<ActuatorToggles>,
    },
    RemoveItem {
        index: usize,
    },
    SetArmor {
        previous: u32,
    },
    SetUpgrade {
        previous: Arc<Upgrade>,
        items: Vec<(Location, Vec<Arc<Item>>)>,
    },
    SetPod {
        previous: Option<Arc<Pod>>,
        items: Vec<Arc<Item>>,
        toggles: ActuatorToggles,
    },
    ToggleActuator {
        previous: ActuatorToggles,
    },
    AddModule,
    RemoveModule {
        index: usize,
    },
}

/// A mutation together with the state needed to reverse it.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    kind: CommandKind,
    undo: Option<Undo>,
}

impl From<CommandKind> for Command {
    fn from(kind: CommandKind) -> Self {
        Self { kind, undo: None }
    }
}

impl Command {
    pub fn add_item(location: Location, item: Arc<Item>) -> Self {
        CommandKind::AddItem { location, item }.into()
    }

    pub fn remove_item(location: Location, item: Arc<Item>) -> Self {
        CommandKind::RemoveItem { location, item }.into()
    }

    pub fn set_armor(location: Location, side: ArmorSide, amount: u32) -> Self {
        CommandKind::SetArmor {
            location,
            side,
            amount,
        }
        .into()
    }

    pub fn set_upgrade(upgrade: Arc<Upgrade>, heat_sink: Option<Arc<Item>>) -> Self {
        CommandKind::SetUpgrade { upgrade, heat_sink }.into()
    }

    pub fn set_pod(pod: Arc<Pod>) -> Self {
        CommandKind::SetPod { pod }.into()
    }

    pub fn toggle_actuator(location: Location, actuator: Actuator, state: bool) -> Self {
        CommandKind::ToggleActuator {
            location,
            actuator,
            state,
        }
        .into()
    }

    pub fn add_module(module: Arc<Item>) -> Self {
        CommandKind::AddModule { module }.into()
    }

    pub fn remove_module(module: Arc<Item>) -> Self {
        CommandKind::RemoveModule { module }.into()
    }

    pub fn kind(&self) -> &CommandKind {
        &self.kind
    }

    /// Apply the mutation, or fail without touching the loadout.
    pub fn apply(&mut self, loadout: &mut Loadout) -> Result<()> {
        let undo = match &self.kind {
            CommandKind::AddItem { location, item } => add_item(loadout, *location, item)?,
            CommandKind::RemoveItem { location, item } => remove_item(loadout, *location, item)?,
            CommandKind::SetArmor {
                location,
                side,
                amount,
            } => {
                rules::can_set_armor(loadout, *location, *side, *amount).into_result()?;
                let previous = loadout.armor(*location, *side);
                loadout.set_armor(*location, *side, *amount);
                Undo::SetArmor { previous }
            }
            CommandKind::SetUpgrade { upgrade, heat_sink } => {
                set_upgrade(loadout, upgrade, heat_sink.as_ref())?
            }
            CommandKind::SetPod { pod } => set_pod(loadout, pod)?,
            CommandKind::ToggleActuator {
                location,
                actuator,
                state,
            } => {
                rules::can_toggle_actuator(loadout, *location, *actuator, *state).into_result()?;
                let previous = loadout.component(*location).toggles();
                let mut toggles = previous;
                toggles.set(*actuator, *state);
                if *actuator == Actuator::LowerArm && !*state {
                    toggles.hand = false;
                }
                loadout.set_toggles(*location, toggles);
                Undo::ToggleActuator { previous }
            }
            CommandKind::AddModule { module } => {
                rules::can_add_module(loadout, module).into_result()?;
                loadout.modules_mut().push(Arc::clone(module));
                Undo::AddModule
            }
            CommandKind::RemoveModule { module } => {
                let modules = loadout.modules_mut();
                let index = modules
                    .iter()
                    .rposition(|m| m.id == module.id)
                    .ok_or_else(|| Error::ModuleNotEquipped {
                        module: module.name.clone(),
                    })?;
                modules.remove(index);
                Undo::RemoveModule { index }
            }
        };
        self.undo = Some(undo);
        Ok(())
    }

    /// Reverse a successful [`Command::apply`]. Does nothing if the command
    /// is not currently applied.
    pub fn undo(&mut self, loadout: &mut Loadout) {
        let Some(undo) = self.undo.take() else {
            return;
        };
        match (&self.kind, undo) {
            (CommandKind::AddItem { location, item }, Undo::AddItem { toggles }) => {
                loadout.take_item(*location, item.id);
                if let Some(toggles) = toggles {
                    loadout.set_toggles(*location, toggles);
                }
            }
            (CommandKind::RemoveItem { location, item }, Undo::RemoveItem { index }) => {
                loadout.insert_item(*location, index, Arc::clone(item));
            }
            (CommandKind::SetArmor { location, side, .. }, Undo::SetArmor { previous }) => {
                loadout.set_armor(*location, *side, previous);
            }
            (CommandKind::SetUpgrade { .. }, Undo::SetUpgrade { previous, items }) => {
                loadout.upgrades_mut().replace(previous);
                for (location, items) in items {
                    loadout.set_items(location, items);
                }
            }
            (
                CommandKind::SetPod { pod },
                Undo::SetPod {
                    previous,
                    items,
                    toggles,
                },
            ) => {
                loadout.set_pod(pod.location, previous);
                loadout.set_items(pod.location, items);
                loadout.set_toggles(pod.location, toggles);
            }
            (CommandKind::ToggleActuator { location, .. }, Undo::ToggleActuator { previous }) => {
                loadout.set_toggles(*location, previous);
            }
            (CommandKind::AddModule { module }, Undo::AddModule) => {
                let modules = loadout.modules_mut();
                if let Some(index) = modules.iter().rposition(|m| m.id == module.id) {
                    modules.remove(index);
                }
            }
            (CommandKind::RemoveModule { module }, Undo::RemoveModule { index }) => {
                let modules = loadout.modules_mut();
                let index = index.min(modules.len());
                modules.insert(index, Arc::clone(module));
            }
            // Undo state is always built by the matching arm of `apply`.
            (_, undo) => self.undo = Some(undo),
        }
    }
}

fn add_item(loadout: &mut Loadout, location: Location, item: &Arc<Item>) -> Result<Undo> {
    rules::can_add_item(loadout, location, item).into_result()?;

    let displaces_actuators =
        loadout.chassis().is_omni() && location.is_arm() && item.is_large_bore();
    let toggles = if displaces_actuators {
        let previous = loadout.component(location).toggles();
        loadout.set_toggles(
            location,
            ActuatorToggles {
                lower_arm: false,
                hand: false,
            },
        );
        Some(previous)
    } else {
        None
    };

    loadout.push_item(location, Arc::clone(item));
    Ok(Undo::AddItem { toggles })
}

fn remove_item(loadout: &mut Loadout, location: Location, item: &Arc<Item>) -> Result<Undo> {
    if item.is_internal() {
        return Err(Denial::at(DenialKind::InternalItem, location).into());
    }
    let index = loadout
        .take_item(location, item.id)
        .ok_or_else(|| Error::ItemNotEquipped {
            item: item.name.clone(),
            location,
        })?;
    Ok(Undo::RemoveItem { index })
}

fn set_upgrade(
    loadout: &mut Loadout,
    upgrade: &Arc<Upgrade>,
    heat_sink: Option<&Arc<Item>>,
) -> Result<Undo> {
    rules::can_set_upgrade(loadout, upgrade).into_result()?;

    let mut items = Vec::new();
    if let UpgradeEffect::HeatSink { heat_sink: allowed } = upgrade.effect {
        let replacement = heat_sink.filter(|item| item.id == allowed);
        for location in Location::ALL {
            let current = loadout.component(location).items();
            if !current.iter().any(|i| i.is_heat_sink() && i.id != allowed) {
                continue;
            }
            let swapped = current
                .iter()
                .filter_map(|i| {
                    if i.is_heat_sink() && i.id != allowed {
                        replacement.cloned()
                    } else {
                        Some(Arc::clone(i))
                    }
                })
                .collect();
            items.push((location, loadout.set_items(location, swapped)));
        }
    }

    let previous = loadout.upgrades_mut().replace(Arc::clone(upgrade));
    if let Err(denial) = rules::verify_loadout_invariant(loadout).into_result() {
        loadout.upgrades_mut().replace(previous);
        for (location, original) in items {
            loadout.set_items(location, original);
        }
        return Err(denial.into());
    }
    Ok(Undo::SetUpgrade { previous, items })
}

fn set_pod(loadout: &mut Loadout, pod: &Arc<Pod>) -> Result<Undo> {
    rules::can_set_pod(loadout, pod).into_result()?;
    let location = pod.location;

    let toggles = loadout.component(location).toggles();
    let previous = loadout.set_pod(location, Some(Arc::clone(pod)));

    // Keep items in order while the new pod still has a hardpoint for them.
    let mut remaining: Vec<(HardPointType, usize)> = HardPointType::ALL
        .iter()
        .map(|&kind| (kind, pod.hardpoint_count(kind)))
        .collect();
    let kept: Vec<Arc<Item>> = loadout
        .component(location)
        .items()
        .iter()
        .filter(|item| {
            if item.hardpoint == HardPointType::None {
                return true;
            }
            match remaining.iter_mut().find(|(kind, _)| *kind == item.hardpoint) {
                Some((_, free)) if *free > 0 => {
                    *free -= 1;
                    true
                }
                _ => false,
            }
        })
        .cloned()
        .collect();
    let dropped = loadout.component(location).items().len() - kept.len();
    let items = loadout.set_items(location, kept);

    if location.is_arm() {
        let mut reset = ActuatorToggles::for_pod(pod);
        if loadout.component(location).has_large_bore() {
            reset.lower_arm = false;
            reset.hand = false;
        }
        loadout.set_toggles(location, reset);
    }

    if let Err(denial) = rules::verify_loadout_invariant(loadout).into_result() {
        loadout.set_pod(location, previous);
        loadout.set_items(location, items);
        loadout.set_toggles(location, toggles);
        return Err(denial.into());
    }
    if dropped > 0 {
        debug!(pod = %pod.name, %location, dropped, "pod change removed items");
    }
    Ok(Undo::SetPod {
        previous,
        items,
        toggles,
    })
}

#[derive(Debug)]
enum Entry {
    Command(Command),
    Failed(Error),
}

/// Ordered list of commands to apply as one unit.
///
/// Errors met while *building* a command (typically an id that does not
/// resolve) are recorded in place with [`CommandBatch::push_error`] so the
/// final report lists every failure in stream order.
#[derive(Debug, Default)]
pub struct CommandBatch {
    entries: Vec<Entry>,
}

impl CommandBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: Command) {
        self.entries.push(Entry::Command(command));
    }

    pub fn push_error(&mut self, error: Error) {
        self.entries.push(Entry::Failed(error));
    }

    /// Record a command that may have failed to resolve.
    pub fn push_result(&mut self, command: Result<Command>) {
        match command {
            Ok(command) => self.push(command),
            Err(error) => self.push_error(error),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Apply every command in recorded order. A failing command is skipped
    /// and reported; later commands still run.
    pub fn apply(self, loadout: &mut Loadout) -> BatchReport {
        let mut report = BatchReport::default();
        for entry in self.entries {
            match entry {
                Entry::Command(mut command) => match command.apply(loadout) {
                    Ok(()) => report.applied.push(command),
                    Err(error) => report.errors.push(error),
                },
                Entry::Failed(error) => report.errors.push(error),
            }
        }
        debug!(
            applied = report.applied.len(),
            failed = report.errors.len(),
            "applied command batch"
        );
        report
    }
}

/// Outcome of [`CommandBatch::apply`].
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Successfully applied commands, in order.
    pub applied: Vec<Command>,
    /// Every failure, in the order it was met.
    pub errors: Vec<Error>,
}

impl BatchReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Reverse every applied command, newest first.
    pub fn undo_all(&mut self, loadout: &mut Loadout) {
        for command in self.applied.iter_mut().rev() {
            command.undo(loadout);
        }
    }
}
