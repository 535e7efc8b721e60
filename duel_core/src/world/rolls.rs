//! Per-turn peer and luck rolls of a player

use super::World;
use crate::capability::EffectData;
use crate::entity::EntityId;
use crate::error::Result;
use crate::notify::Notification;
use crate::types::{StatKind, Visibility};
use tracing::debug;

impl World {
    /// Try to reveal each hidden effect on other players, one roll per
    /// effect at `hyperbolic(Peer)`
    pub(crate) fn peer_roll(&mut self, viewer: EntityId) -> Result<()> {
        let chance = self.hyperbolic(viewer, StatKind::Peer)?;
        if chance <= 0.0 {
            return Ok(());
        }
        let hidden: Vec<EntityId> = self
            .effects()
            .into_iter()
            .filter(|effect| {
                self.try_get::<EffectData>(*effect).is_some_and(|d| {
                    d.owner != viewer && d.visibility == Visibility::Hidden && !d.revealed_to.contains(&viewer)
                })
            })
            .collect();
        for effect in hidden {
            if self.roll(chance) {
                self.get_mut::<EffectData>(effect)?.revealed_to.insert(viewer);
                debug!(%viewer, %effect, "hidden effect revealed");
                self.notify(Notification::EffectRevealed { effect, viewer });
            }
        }
        Ok(())
    }

    /// At `hyperbolic(Luck)`, hand the player a random item from the drop table
    pub(crate) fn luck_roll(&mut self, player: EntityId) -> Result<()> {
        let drops = self.catalog.drop_table().len();
        if drops == 0 {
            return Ok(());
        }
        let chance = self.hyperbolic(player, StatKind::Luck)?;
        if !self.roll(chance) {
            return Ok(());
        }
        let index = self.roll_index(drops);
        let template = self.catalog.drop_table()[index].clone();
        let item = self.instantiate_item(&template, player)?;
        debug!(%player, %item, template = %template, "luck drop");
        self.notify(Notification::ItemDropped { item, owner: player });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EffectTemplate, ItemTemplate};
    use crate::types::{ItemKind, Polarity, Rarity, Stacking};

    fn hidden_curse() -> EffectTemplate {
        EffectTemplate {
            id: "curse".to_string(),
            name: "Curse".to_string(),
            polarity: Polarity::Negative,
            visibility: Visibility::Hidden,
            stacking: Stacking::Ignore,
            max_stacks: 1,
            duration: None,
            components: Vec::new(),
        }
    }

    #[test]
    fn test_peer_roll_without_peer_reveals_nothing() {
        let mut world = World::with_seed(5);
        world.catalog_mut().register_effect(hidden_curse());
        let alice = world.spawn_player("Alice").unwrap();
        let bob = world.spawn_player("Bob").unwrap();
        world.apply_effect("curse", bob).unwrap();

        world.peer_roll(alice).unwrap();
        assert!(world.visible_effects(alice, bob).is_empty());
    }

    #[test]
    fn test_peer_roll_reveals_eventually() {
        let mut world = World::with_seed(5);
        world.catalog_mut().register_effect(hidden_curse());
        let alice = world.spawn_player("Alice").unwrap();
        let bob = world.spawn_player("Bob").unwrap();
        world.increase_base(alice, StatKind::Peer, 900).unwrap();
        let curse = match world.apply_effect("curse", bob).unwrap() {
            crate::effect::EffectOutcome::Applied(effect) => effect,
            other => panic!("unexpected outcome {:?}", other),
        };

        for _ in 0..50 {
            world.peer_roll(alice).unwrap();
        }
        assert_eq!(world.visible_effects(alice, bob), vec![curse]);
        assert!(world.visible_effects(bob, bob).contains(&curse));

        let reveals = world
            .drain_notifications()
            .into_iter()
            .filter(|n| matches!(n, Notification::EffectRevealed { .. }))
            .count();
        assert_eq!(reveals, 1);
    }

    #[test]
    fn test_luck_roll_drops_item() {
        let mut world = World::with_seed(9);
        world.catalog_mut().register_item(ItemTemplate {
            id: "coin".to_string(),
            name: "Coin".to_string(),
            rarity: Rarity::Common,
            kind: ItemKind::Trinket,
            components: Vec::new(),
        });
        world.catalog_mut().add_drop("coin");
        let alice = world.spawn_player("Alice").unwrap();

        world.luck_roll(alice).unwrap();
        assert!(world.items_of(alice).is_empty());

        world.increase_base(alice, StatKind::Luck, 100_000).unwrap();
        for _ in 0..20 {
            world.luck_roll(alice).unwrap();
        }
        assert!(!world.items_of(alice).is_empty());
    }
}
