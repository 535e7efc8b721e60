//! Entity removal, elimination and item use

use super::World;
use crate::capability::{ItemData, Targeting, Usable, Wearable};
use crate::entity::EntityId;
use crate::error::{CoreError, Result};
use crate::notify::{Notification, UseFailure};
use crate::stats::Resources;
use crate::trigger::{Trigger, TriggerEvent};
use crate::types::{Category, ResourceKind};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed,
    /// The entity was not live; nothing happened
    NotPresent,
}

/// Result of an attempt to use an item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UseOutcome {
    Used,
    /// Used and destroyed
    Consumed,
    InsufficientResource { required: i64, available: i64 },
    Rejected(UseFailure),
}

impl World {
    /// Remove an entity and everything it owns. Removing an entity that is
    /// not live is a no-op.
    pub fn remove_entity(&mut self, entity: EntityId) -> Result<RemoveOutcome> {
        let Some(category) = self.registry.category(entity) else {
            return Ok(RemoveOutcome::NotPresent);
        };

        if self.try_get::<Wearable>(entity).is_some_and(|w| w.equipped) {
            self.unequip(entity)?;
        }

        let owner = self.owner_of(entity);
        self.publish(TriggerEvent::new(Trigger::OnRemoved, entity).with_target(owner))?;
        if !self.registry.contains(entity) {
            return Ok(RemoveOutcome::Removed);
        }

        let owned = if category == Category::Player {
            self.owned_by(entity)
        } else {
            Vec::new()
        };
        self.registry.remove(entity);
        debug!(%entity, %category, "entity removed");
        self.notify(Notification::EntityRemoved { entity, category });

        for child in owned {
            self.remove_entity(child)?;
        }
        self.bus.unsubscribe_entity(entity);
        self.components.remove_all(entity);
        Ok(RemoveOutcome::Removed)
    }

    /// Remove a player whose health ran out
    pub(crate) fn eliminate(&mut self, player: EntityId) -> Result<()> {
        if !self.is_live(player) {
            return Ok(());
        }
        debug!(%player, "player eliminated");
        self.notify(Notification::Eliminated { entity: player });
        self.remove_entity(player)?;
        Ok(())
    }

    /// Use `item` on `target`, spending the owner's stamina
    pub fn use_item(&mut self, item: EntityId, target: EntityId) -> Result<UseOutcome> {
        let usable = self.get::<Usable>(item)?.clone();
        let owner = self.get::<ItemData>(item)?.owner;

        let rejection = if self.registry.category(target) != Some(Category::Player) {
            Some(UseFailure::TargetGone)
        } else {
            match usable.targeting {
                Targeting::SelfOnly if target != owner => Some(UseFailure::SelfOnly),
                Targeting::Others if target == owner => Some(UseFailure::OthersOnly),
                _ => None,
            }
        };
        if let Some(reason) = rejection {
            self.notify(Notification::UseFailed { item, reason });
            return Ok(UseOutcome::Rejected(reason));
        }

        if usable.cost != 0 {
            let stamina = *self
                .get::<Resources>(owner)?
                .get(ResourceKind::Stamina)
                .ok_or(CoreError::UnknownResource {
                    entity: owner,
                    resource: ResourceKind::Stamina,
                })?;
            let required = -stamina.scaled(-usable.cost);
            if required > stamina.current {
                self.notify(Notification::InsufficientResource {
                    item,
                    resource: ResourceKind::Stamina,
                    required,
                    available: stamina.current,
                });
                return Ok(UseOutcome::InsufficientResource {
                    required,
                    available: stamina.current,
                });
            }
            self.change_resource(owner, ResourceKind::Stamina, -usable.cost)?;
        }

        debug!(%item, %owner, %target, "item used");
        self.notify(Notification::ItemUsed {
            item,
            user: owner,
            target,
        });
        self.publish(TriggerEvent::new(Trigger::OnUse, item).with_target(Some(target)))?;

        if !usable.consumable {
            return Ok(UseOutcome::Used);
        }
        if self.is_live(item) {
            self.notify(Notification::ItemConsumed { item });
            self.remove_entity(item)?;
        }
        Ok(UseOutcome::Consumed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::{DealsDamage, Magnitude};
    use crate::types::{DamageType, ItemKind, Rarity};

    fn duel() -> (World, EntityId, EntityId) {
        let mut world = World::with_seed(11);
        let alice = world.spawn_player("Alice").unwrap();
        let bob = world.spawn_player("Bob").unwrap();
        world.drain_notifications();
        (world, alice, bob)
    }

    fn dart(world: &mut World, owner: EntityId, cost: i64, consumable: bool) -> EntityId {
        world
            .build(Category::Item, "dart", "Dart")
            .with(ItemData {
                owner,
                rarity: Rarity::Common,
                kind: ItemKind::Weapon,
            })
            .and_then(|b| b.with(Usable::new(cost, consumable)))
            .and_then(|b| {
                b.with(DealsDamage::new(
                    vec![Trigger::OnUse],
                    Magnitude::Flat { value: 10.0 },
                    DamageType::True,
                ))
            })
            .and_then(|b| b.finish())
            .unwrap()
    }

    #[test]
    fn test_use_spends_stamina_and_damages() {
        let (mut world, alice, bob) = duel();
        let item = dart(&mut world, alice, 3, false);

        assert_eq!(world.use_item(item, bob).unwrap(), UseOutcome::Used);
        assert_eq!(world.resource(alice, ResourceKind::Stamina).unwrap(), 7);
        assert_eq!(world.resource(bob, ResourceKind::Health).unwrap(), 90);
    }

    #[test]
    fn test_insufficient_stamina() {
        let (mut world, alice, bob) = duel();
        let item = dart(&mut world, alice, 11, false);
        world.drain_notifications();

        assert_eq!(
            world.use_item(item, bob).unwrap(),
            UseOutcome::InsufficientResource {
                required: 11,
                available: 10,
            }
        );
        assert_eq!(world.resource(bob, ResourceKind::Health).unwrap(), 100);

        let notes = world.drain_notifications();
        assert_eq!(notes.len(), 1);
        assert!(matches!(notes[0], Notification::InsufficientResource { .. }));
    }

    #[test]
    fn test_consumable_is_removed() {
        let (mut world, alice, bob) = duel();
        let item = dart(&mut world, alice, 1, true);

        assert_eq!(world.use_item(item, bob).unwrap(), UseOutcome::Consumed);
        assert!(!world.is_live(item));
        assert!(world.items_of(alice).is_empty());
    }

    #[test]
    fn test_remove_is_idempotent() {
        let (mut world, alice, _) = duel();
        let item = dart(&mut world, alice, 1, false);

        assert_eq!(world.remove_entity(item).unwrap(), RemoveOutcome::Removed);
        world.drain_notifications();
        assert_eq!(world.remove_entity(item).unwrap(), RemoveOutcome::NotPresent);
        assert!(world.drain_notifications().is_empty());
    }

    #[test]
    fn test_player_removal_cascades() {
        let (mut world, alice, bob) = duel();
        let item = dart(&mut world, alice, 1, false);

        world.remove_entity(alice).unwrap();

        assert!(!world.is_live(item));
        assert_eq!(world.players(), vec![bob]);
        assert_eq!(world.bus().subscriber_count(item, Trigger::OnUse), 0);
    }

    #[test]
    fn test_use_on_removed_target() {
        let (mut world, alice, bob) = duel();
        let item = dart(&mut world, alice, 1, false);
        world.remove_entity(bob).unwrap();

        assert_eq!(
            world.use_item(item, bob).unwrap(),
            UseOutcome::Rejected(UseFailure::TargetGone)
        );
        assert_eq!(world.resource(alice, ResourceKind::Stamina).unwrap(), 10);
    }
}
