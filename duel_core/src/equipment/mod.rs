//! Equipment - equip slots and armor-set bonuses
//!
//! Slots are not stored on the player. An item is in a slot when its
//! [`Wearable`](crate::capability::Wearable) is marked equipped, so the
//! occupant of a slot is found by scanning the owner's items.
//!
//! A set becomes active when `armor_set_size` equipped items of its owner
//! share a set tag, and stays active until the count drops below that
//! again. The set bonus is published on one piece, the anchor: the lowest
//! id among the equipped pieces when the set completed.

mod sets;
mod slots;

use crate::entity::EntityId;
use std::collections::BTreeMap;

/// Sets currently active on a player, with their anchor piece
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArmorSets {
    active: BTreeMap<String, EntityId>,
}

impl ArmorSets {
    pub fn is_active(&self, set: &str) -> bool {
        self.active.contains_key(set)
    }

    pub fn anchor(&self, set: &str) -> Option<EntityId> {
        self.active.get(set).copied()
    }

    /// Active set tags in name order
    pub fn active(&self) -> impl Iterator<Item = &str> {
        self.active.keys().map(String::as_str)
    }

    pub(crate) fn activate(&mut self, set: &str, anchor: EntityId) {
        self.active.insert(set.to_string(), anchor);
    }

    pub(crate) fn deactivate(&mut self, set: &str) -> Option<EntityId> {
        self.active.remove(set)
    }
}

/// Result of an equip attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EquipOutcome {
    Equipped {
        /// Item that previously held the slot
        replaced: Option<EntityId>,
    },
    AlreadyEquipped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnequipOutcome {
    Unequipped,
    NotEquipped,
}
