//! Equip and unequip commands

use super::{EquipOutcome, UnequipOutcome};
use crate::capability::{ItemData, Wearable};
use crate::entity::EntityId;
use crate::error::Result;
use crate::notify::{EquipFailure, Notification};
use crate::trigger::{Trigger, TriggerEvent};
use crate::types::EquipSlot;
use crate::world::World;
use tracing::debug;

impl World {
    /// Equip `item` in its slot, unequipping whatever its owner wore there
    pub fn equip(&mut self, item: EntityId) -> Result<EquipOutcome> {
        let wearable = self.get::<Wearable>(item)?.clone();
        let owner = self.get::<ItemData>(item)?.owner;
        if wearable.equipped {
            self.notify(Notification::EquipFailed {
                item,
                reason: EquipFailure::AlreadyEquipped,
            });
            return Ok(EquipOutcome::AlreadyEquipped);
        }

        let replaced = self.equipped_in(owner, wearable.slot);
        if let Some(previous) = replaced {
            self.take_off(previous, owner, wearable.slot)?;
        }

        self.get_mut::<Wearable>(item)?.equipped = true;
        debug!(%item, %owner, slot = ?wearable.slot, "item equipped");
        self.notify(Notification::ItemEquipped {
            item,
            owner,
            slot: wearable.slot,
        });
        self.publish(TriggerEvent::new(Trigger::OnEquip, item).with_target(Some(owner)))?;
        self.refresh_sets(owner)?;
        Ok(EquipOutcome::Equipped { replaced })
    }

    /// Unequip `item`. Unequipping an item that is not worn only raises a
    /// notification.
    pub fn unequip(&mut self, item: EntityId) -> Result<UnequipOutcome> {
        let wearable = self.get::<Wearable>(item)?.clone();
        if !wearable.equipped {
            self.notify(Notification::EquipFailed {
                item,
                reason: EquipFailure::NotEquipped,
            });
            return Ok(UnequipOutcome::NotEquipped);
        }
        let owner = self.get::<ItemData>(item)?.owner;
        self.take_off(item, owner, wearable.slot)?;
        self.refresh_sets(owner)?;
        Ok(UnequipOutcome::Unequipped)
    }

    fn take_off(&mut self, item: EntityId, owner: EntityId, slot: EquipSlot) -> Result<()> {
        self.get_mut::<Wearable>(item)?.equipped = false;
        debug!(%item, %owner, ?slot, "item unequipped");
        self.notify(Notification::ItemUnequipped { item, owner, slot });
        self.publish(TriggerEvent::new(Trigger::OnUnequip, item).with_target(Some(owner)))
    }

    /// Item `player` wears in `slot`
    pub fn equipped_in(&self, player: EntityId, slot: EquipSlot) -> Option<EntityId> {
        self.items_of(player).into_iter().find(|item| {
            self.try_get::<Wearable>(*item)
                .is_some_and(|w| w.equipped && w.slot == slot)
        })
    }

    /// Items `player` wears, ordered by slot
    pub fn equipped_items(&self, player: EntityId) -> Vec<EntityId> {
        let mut worn: Vec<(EquipSlot, EntityId)> = self
            .items_of(player)
            .into_iter()
            .filter_map(|item| {
                self.try_get::<Wearable>(item)
                    .filter(|w| w.equipped)
                    .map(|w| (w.slot, item))
            })
            .collect();
        worn.sort();
        worn.into_iter().map(|(_, item)| item).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::{ModifiesStats, StatChange, StatRule, TargetRule};
    use crate::types::{Category, ItemKind, Rarity, StatKind};

    fn armor(world: &mut World, owner: EntityId, slot: EquipSlot, armor: i64) -> EntityId {
        let rule = StatRule::new(vec![Trigger::OnEquip], vec![Trigger::OnUnequip])
            .with_change(StatChange::base(StatKind::Armor, armor))
            .with_target(TargetRule::Owner);
        world
            .build(Category::Item, "plate", "Plate")
            .with(ItemData {
                owner,
                rarity: Rarity::Common,
                kind: ItemKind::Armor,
            })
            .and_then(|b| b.with(Wearable::new(slot)))
            .and_then(|b| b.with(ModifiesStats { rules: vec![rule] }))
            .and_then(|b| b.finish())
            .unwrap()
    }

    #[test]
    fn test_equip_applies_and_unequip_reverts() {
        let mut world = World::with_seed(2);
        let alice = world.spawn_player("Alice").unwrap();
        let helm = armor(&mut world, alice, EquipSlot::Head, 20);

        assert_eq!(
            world.equip(helm).unwrap(),
            EquipOutcome::Equipped { replaced: None }
        );
        assert_eq!(world.stat(alice, StatKind::Armor).unwrap(), 20);
        assert_eq!(world.equipped_in(alice, EquipSlot::Head), Some(helm));

        assert_eq!(world.unequip(helm).unwrap(), UnequipOutcome::Unequipped);
        assert_eq!(world.stat(alice, StatKind::Armor).unwrap(), 0);
        assert_eq!(world.equipped_in(alice, EquipSlot::Head), None);
    }

    #[test]
    fn test_slot_holds_one_item() {
        let mut world = World::with_seed(2);
        let alice = world.spawn_player("Alice").unwrap();
        let old = armor(&mut world, alice, EquipSlot::Head, 20);
        let new = armor(&mut world, alice, EquipSlot::Head, 5);

        world.equip(old).unwrap();
        assert_eq!(
            world.equip(new).unwrap(),
            EquipOutcome::Equipped { replaced: Some(old) }
        );
        assert!(!world.get::<Wearable>(old).unwrap().equipped);
        assert_eq!(world.equipped_items(alice), vec![new]);
        assert_eq!(world.stat(alice, StatKind::Armor).unwrap(), 5);
    }

    #[test]
    fn test_equip_twice_fails_once() {
        let mut world = World::with_seed(2);
        let alice = world.spawn_player("Alice").unwrap();
        let helm = armor(&mut world, alice, EquipSlot::Head, 20);
        world.equip(helm).unwrap();
        world.drain_notifications();

        assert_eq!(world.equip(helm).unwrap(), EquipOutcome::AlreadyEquipped);
        assert_eq!(world.stat(alice, StatKind::Armor).unwrap(), 20);
        assert_eq!(
            world.drain_notifications(),
            vec![Notification::EquipFailed {
                item: helm,
                reason: EquipFailure::AlreadyEquipped,
            }]
        );
    }

    #[test]
    fn test_unequip_unworn_item() {
        let mut world = World::with_seed(2);
        let alice = world.spawn_player("Alice").unwrap();
        let helm = armor(&mut world, alice, EquipSlot::Head, 20);
        world.drain_notifications();

        assert_eq!(world.unequip(helm).unwrap(), UnequipOutcome::NotEquipped);
        assert_eq!(world.drain_notifications().len(), 1);
    }

    #[test]
    fn test_equipped_items_ordered_by_slot() {
        let mut world = World::with_seed(2);
        let alice = world.spawn_player("Alice").unwrap();
        let boots = armor(&mut world, alice, EquipSlot::Feet, 1);
        let helm = armor(&mut world, alice, EquipSlot::Head, 1);
        let ring = armor(&mut world, alice, EquipSlot::Ring, 1);
        for item in [ring, boots, helm] {
            world.equip(item).unwrap();
        }

        assert_eq!(world.equipped_items(alice), vec![helm, boots, ring]);
    }

    #[test]
    fn test_removing_worn_item_reverts_bonus() {
        let mut world = World::with_seed(2);
        let alice = world.spawn_player("Alice").unwrap();
        let helm = armor(&mut world, alice, EquipSlot::Head, 20);
        world.equip(helm).unwrap();

        world.remove_entity(helm).unwrap();
        assert_eq!(world.stat(alice, StatKind::Armor).unwrap(), 0);
    }
}
