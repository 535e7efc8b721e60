//! Turn scheduler - round-robin over live turn-takers
//!
//! Each player gets an immutable turn-order number from the registry when it
//! is created. Before every turn the scheduler re-derives the sorted list of
//! live turn-takers and picks the first one ordered after the previous
//! actor, wrapping around. Removed players therefore drop out of the
//! rotation without the scheduler tracking them.

mod selector;

pub use selector::{ActionSelector, ChoicePrompt, PromptSelector};

use crate::entity::EntityId;
use crate::error::Result;
use crate::notify::Notification;
use crate::trigger::{Trigger, TriggerEvent};
use crate::world::World;
use tracing::debug;

/// Marks an entity that receives scheduled turns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnTaker {
    pub order: u64,
}

impl TurnTaker {
    pub fn new(order: u64) -> Self {
        TurnTaker { order }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Running,
    /// Terminal
    GameOver,
}

/// Result of one [`Scheduler::advance`] call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// `actor` had a turn and the game goes on
    Played { actor: EntityId },
    /// At most one player is left
    GameOver { winner: Option<EntityId> },
}

#[derive(Debug, Clone)]
pub struct Scheduler {
    state: SchedulerState,
    /// Turn order of the last actor
    last_order: Option<u64>,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Scheduler {
            state: SchedulerState::Idle,
            last_order: None,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Play the next turn.
    ///
    /// Publishes OnTurnStart for the actor, hands control to `selector`
    /// until it returns, then publishes OnTurnEnd. Either step is skipped
    /// for an actor that died in the meantime. Once at most one player is
    /// left the scheduler stops for good.
    pub fn advance<S: ActionSelector + ?Sized>(&mut self, world: &mut World, selector: &mut S) -> Result<TurnOutcome> {
        if self.state == SchedulerState::GameOver || world.players().len() <= 1 {
            return Ok(self.finish(world));
        }
        let Some((order, actor)) = self.next_actor(world) else {
            return Ok(self.finish(world));
        };
        self.state = SchedulerState::Running;
        self.last_order = Some(order);

        debug!(%actor, order, "turn started");
        world.notify(Notification::TurnStarted { entity: actor });
        world.publish(TriggerEvent::new(Trigger::OnTurnStart, actor))?;

        if world.is_live(actor) {
            selector.take_turn(world, actor)?;
        }
        if world.is_live(actor) {
            world.publish(TriggerEvent::new(Trigger::OnTurnEnd, actor))?;
            debug!(%actor, "turn ended");
            world.notify(Notification::TurnEnded { entity: actor });
        }

        if world.players().len() <= 1 {
            return Ok(self.finish(world));
        }
        Ok(TurnOutcome::Played { actor })
    }

    /// Advance until the game is over or `max_turns` turns were played
    pub fn run<S: ActionSelector + ?Sized>(
        &mut self,
        world: &mut World,
        selector: &mut S,
        max_turns: usize,
    ) -> Result<TurnOutcome> {
        let mut outcome = TurnOutcome::GameOver { winner: None };
        for _ in 0..max_turns {
            outcome = self.advance(world, selector)?;
            if matches!(outcome, TurnOutcome::GameOver { .. }) {
                break;
            }
        }
        Ok(outcome)
    }

    /// First live turn-taker ordered after the previous actor, wrapping
    fn next_actor(&self, world: &World) -> Option<(u64, EntityId)> {
        let takers = world.turn_takers();
        let after = self
            .last_order
            .and_then(|last| takers.iter().find(|(order, _)| *order > last));
        after.or_else(|| takers.first()).copied()
    }

    fn finish(&mut self, world: &mut World) -> TurnOutcome {
        let players = world.players();
        let winner = match players.as_slice() {
            [winner] => Some(*winner),
            _ => None,
        };
        if self.state != SchedulerState::GameOver {
            self.state = SchedulerState::GameOver;
            debug!(?winner, "game over");
            world.notify(Notification::GameOver { winner });
        }
        TurnOutcome::GameOver { winner }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::{DealsDamage, EffectData, Magnitude, TargetRule};
    use crate::trigger::Handler;
    use crate::types::{Category, DamageType, Polarity, ResourceKind, Stacking};

    fn pass(_: &mut World, _: EntityId) -> Result<()> {
        Ok(())
    }

    #[test]
    fn test_round_robin_order() {
        let mut world = World::with_seed(8);
        let alice = world.spawn_player("Alice").unwrap();
        let bob = world.spawn_player("Bob").unwrap();
        let carol = world.spawn_player("Carol").unwrap();
        let mut scheduler = Scheduler::new();
        assert_eq!(scheduler.state(), SchedulerState::Idle);

        let actors: Vec<TurnOutcome> = (0..4)
            .map(|_| scheduler.advance(&mut world, &mut pass).unwrap())
            .collect();
        assert_eq!(
            actors,
            vec![
                TurnOutcome::Played { actor: alice },
                TurnOutcome::Played { actor: bob },
                TurnOutcome::Played { actor: carol },
                TurnOutcome::Played { actor: alice },
            ]
        );
        assert_eq!(scheduler.state(), SchedulerState::Running);
    }

    #[test]
    fn test_removed_player_leaves_rotation() {
        let mut world = World::with_seed(8);
        let alice = world.spawn_player("Alice").unwrap();
        let bob = world.spawn_player("Bob").unwrap();
        let carol = world.spawn_player("Carol").unwrap();
        let mut scheduler = Scheduler::new();

        scheduler.advance(&mut world, &mut pass).unwrap();
        world.remove_entity(bob).unwrap();

        assert_eq!(
            scheduler.advance(&mut world, &mut pass).unwrap(),
            TurnOutcome::Played { actor: carol }
        );
        assert_eq!(
            scheduler.advance(&mut world, &mut pass).unwrap(),
            TurnOutcome::Played { actor: alice }
        );
    }

    #[test]
    fn test_turn_start_refills_stamina() {
        let mut world = World::with_seed(8);
        let alice = world.spawn_player("Alice").unwrap();
        world.spawn_player("Bob").unwrap();
        world.change_resource(alice, ResourceKind::Stamina, -7).unwrap();

        let mut seen = Vec::new();
        let mut selector = |world: &mut World, actor: EntityId| -> Result<()> {
            seen.push(world.resource(actor, ResourceKind::Stamina)?);
            Ok(())
        };
        Scheduler::new().advance(&mut world, &mut selector).unwrap();
        assert_eq!(seen, vec![10]);
    }

    #[test]
    fn test_game_over_is_terminal() {
        let mut world = World::with_seed(8);
        let alice = world.spawn_player("Alice").unwrap();
        let bob = world.spawn_player("Bob").unwrap();
        let mut scheduler = Scheduler::new();

        let mut finisher = |world: &mut World, _: EntityId| -> Result<()> {
            world.change_resource(bob, ResourceKind::Health, -1000)?;
            Ok(())
        };
        assert_eq!(
            scheduler.advance(&mut world, &mut finisher).unwrap(),
            TurnOutcome::GameOver { winner: Some(alice) }
        );
        assert_eq!(scheduler.state(), SchedulerState::GameOver);

        world.drain_notifications();
        assert_eq!(
            scheduler.advance(&mut world, &mut pass).unwrap(),
            TurnOutcome::GameOver { winner: Some(alice) }
        );
        assert!(world.drain_notifications().is_empty());
    }

    #[test]
    fn test_death_during_other_turn_start() {
        let mut world = World::with_seed(8);
        let alice = world.spawn_player("Alice").unwrap();
        let bob = world.spawn_player("Bob").unwrap();
        world.change_resource(bob, ResourceKind::Health, -95).unwrap();

        // a curse on Bob that also reacts to Alice's turn start
        let damage = DealsDamage::new(vec![Trigger::OnTurnStart], Magnitude::Flat { value: 10.0 }, DamageType::True)
            .with_target(TargetRule::Owner);
        let curse = world
            .build(Category::Effect, "curse", "Curse")
            .with(EffectData::new("curse", bob, Polarity::Negative, Stacking::Ignore))
            .and_then(|b| b.with(damage))
            .and_then(|b| b.finish())
            .unwrap();
        world.subscribe(alice, Trigger::OnTurnStart, curse, Handler::DealDamage);
        world.drain_notifications();

        let mut acted = Vec::new();
        let mut selector = |_: &mut World, actor: EntityId| -> Result<()> {
            acted.push(actor);
            Ok(())
        };
        let mut scheduler = Scheduler::new();
        let outcome = scheduler.advance(&mut world, &mut selector).unwrap();

        assert_eq!(outcome, TurnOutcome::GameOver { winner: Some(alice) });
        assert_eq!(acted, vec![alice]);
        let notes = world.drain_notifications();
        assert!(notes.contains(&Notification::Eliminated { entity: bob }));
        assert!(!notes.contains(&Notification::TurnStarted { entity: bob }));
        assert_eq!(
            scheduler.advance(&mut world, &mut pass).unwrap(),
            TurnOutcome::GameOver { winner: Some(alice) }
        );
    }

    #[test]
    fn test_partial_rules_file_plays_a_turn() {
        let rules = crate::config::RulesConfig::parse(
            r#"
[[player.stats]]
stat = "maximum_health"
base = 250
"#,
        )
        .unwrap();
        let mut world = World::new(rules, crate::config::TemplateCatalog::new(), 8);
        let alice = world.spawn_player("Alice").unwrap();
        world.spawn_player("Bob").unwrap();

        assert_eq!(
            Scheduler::new().advance(&mut world, &mut pass).unwrap(),
            TurnOutcome::Played { actor: alice }
        );
        assert_eq!(world.resource(alice, ResourceKind::Health).unwrap(), 250);
        assert_eq!(world.resource(alice, ResourceKind::Stamina).unwrap(), 10);
    }

    #[test]
    fn test_run_stops_at_turn_limit() {
        let mut world = World::with_seed(8);
        let alice = world.spawn_player("Alice").unwrap();
        world.spawn_player("Bob").unwrap();

        let outcome = Scheduler::new().run(&mut world, &mut pass, 5).unwrap();
        assert_eq!(outcome, TurnOutcome::Played { actor: alice });
    }
}
