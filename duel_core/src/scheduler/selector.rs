//! Action selection seam between the scheduler and the host

use crate::capability::{Usable, Wearable};
use crate::entity::EntityId;
use crate::error::Result;
use crate::notify::Notification;
use crate::world::World;
use tracing::warn;

/// Decides what a player does during its turn.
///
/// The scheduler calls [`take_turn`](ActionSelector::take_turn) once per
/// turn and treats the return as end of turn.
pub trait ActionSelector {
    fn take_turn(&mut self, world: &mut World, actor: EntityId) -> Result<()>;
}

impl<F> ActionSelector for F
where
    F: FnMut(&mut World, EntityId) -> Result<()>,
{
    fn take_turn(&mut self, world: &mut World, actor: EntityId) -> Result<()> {
        self(world, actor)
    }
}

/// Source of numeric choices, typically a console menu.
///
/// Implementations return a value in `min..=max`.
pub trait ChoicePrompt {
    fn request_choice(&mut self, prompt: &str, min: usize, max: usize) -> usize;
}

const END_TURN: usize = 0;
const USE: usize = 1;
const EQUIP: usize = 2;
const UNEQUIP: usize = 3;

/// Drives a turn from a [`ChoicePrompt`]: pick a command, then an item and
/// (for use) a target, until the player ends the turn or the action budget
/// runs out
pub struct PromptSelector<P> {
    prompt: P,
}

impl<P: ChoicePrompt> PromptSelector<P> {
    pub fn new(prompt: P) -> Self {
        PromptSelector { prompt }
    }

    pub fn into_inner(self) -> P {
        self.prompt
    }

    /// Ask for one of `candidates`. An index past the end surfaces an
    /// item-not-found notification.
    fn pick(&mut self, world: &mut World, prompt: &str, candidates: &[EntityId]) -> Option<EntityId> {
        let max = candidates.len().saturating_sub(1);
        let index = self.prompt.request_choice(prompt, 0, max);
        let picked = candidates.get(index).copied();
        if picked.is_none() {
            world.notify(Notification::ItemNotFound { index });
        }
        picked
    }

    fn run_command(&mut self, world: &mut World, actor: EntityId, command: usize) -> Result<()> {
        match command {
            USE => {
                let usable: Vec<EntityId> = world
                    .items_of(actor)
                    .into_iter()
                    .filter(|item| world.has::<Usable>(*item))
                    .collect();
                let Some(item) = self.pick(world, "item to use", &usable) else {
                    return Ok(());
                };
                let players = world.players();
                let index = self
                    .prompt
                    .request_choice("target", 0, players.len().saturating_sub(1));
                match players.get(index) {
                    Some(target) => {
                        world.use_item(item, *target)?;
                    }
                    None => {
                        warn!(index, "target choice out of bounds");
                        world.notify(Notification::TargetNotFound { index });
                    }
                }
            }
            EQUIP => {
                let wearable: Vec<EntityId> = world
                    .items_of(actor)
                    .into_iter()
                    .filter(|item| world.try_get::<Wearable>(*item).is_some_and(|w| !w.equipped))
                    .collect();
                if let Some(item) = self.pick(world, "item to equip", &wearable) {
                    world.equip(item)?;
                }
            }
            UNEQUIP => {
                let worn = world.equipped_items(actor);
                if let Some(item) = self.pick(world, "item to unequip", &worn) {
                    world.unequip(item)?;
                }
            }
            other => {
                warn!(choice = other, "unknown command");
                world.notify(Notification::UnknownCommand { choice: other });
            }
        }
        Ok(())
    }
}

impl<P: ChoicePrompt> ActionSelector for PromptSelector<P> {
    fn take_turn(&mut self, world: &mut World, actor: EntityId) -> Result<()> {
        let budget = world.rules().limits.max_actions_per_turn;
        for _ in 0..budget {
            let command = self
                .prompt
                .request_choice("0) end turn 1) use 2) equip 3) unequip", END_TURN, UNEQUIP);
            if command == END_TURN {
                return Ok(());
            }
            self.run_command(world, actor, command)?;
            if !world.is_live(actor) {
                return Ok(());
            }
        }
        warn!(%actor, budget, "action budget exhausted, ending turn");
        Ok(())
    }
}
