//! Item-only capabilities

use crate::entity::EntityId;
use crate::types::{EquipSlot, ItemKind, Rarity};
use serde::{Deserialize, Serialize};

/// Ownership and classification of an item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemData {
    /// The player holding the item
    pub owner: EntityId,
    pub rarity: Rarity,
    pub kind: ItemKind,
}

/// Which players a usable item may be aimed at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Targeting {
    #[default]
    Any,
    SelfOnly,
    Others,
}

/// The item can be used on a target, spending the owner's stamina
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Usable {
    /// Stamina spent per use (before the spend multiplier)
    #[serde(default)]
    pub cost: i64,
    /// Destroyed after a successful use
    #[serde(default)]
    pub consumable: bool,
    #[serde(default)]
    pub targeting: Targeting,
}

impl Usable {
    pub fn new(cost: i64, consumable: bool) -> Self {
        Usable {
            cost,
            consumable,
            targeting: Targeting::Any,
        }
    }

    pub fn with_targeting(mut self, targeting: Targeting) -> Self {
        self.targeting = targeting;
        self
    }
}

/// The item occupies an equip slot while worn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wearable {
    pub slot: EquipSlot,
    #[serde(skip)]
    pub equipped: bool,
}

impl Wearable {
    pub fn new(slot: EquipSlot) -> Self {
        Wearable {
            slot,
            equipped: false,
        }
    }
}

/// The item counts towards an armor set while equipped
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArmorSetPiece {
    pub set: String,
}

impl ArmorSetPiece {
    pub fn new(set: &str) -> Self {
        ArmorSetPiece { set: set.to_string() }
    }
}
