//! Core value types shared by every module

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed category of an entity, chosen at creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Player,
    Item,
    Effect,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Player => "player",
            Category::Item => "item",
            Category::Effect => "effect",
        };
        f.write_str(name)
    }
}

/// Named numeric attribute of a player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatKind {
    MaximumHealth,
    MaximumStamina,
    Attack,
    Accuracy,
    Healing,
    Dodge,
    Critical,
    Precision,
    Armor,
    Shield,
    Peer,
    Luck,
}

impl StatKind {
    /// Get all stat kinds
    pub fn all() -> &'static [StatKind] {
        &[
            StatKind::MaximumHealth,
            StatKind::MaximumStamina,
            StatKind::Attack,
            StatKind::Accuracy,
            StatKind::Healing,
            StatKind::Dodge,
            StatKind::Critical,
            StatKind::Precision,
            StatKind::Armor,
            StatKind::Shield,
            StatKind::Peer,
            StatKind::Luck,
        ]
    }
}

/// Depletable quantity bound to a maximum stat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Health,
    Stamina,
}

impl ResourceKind {
    /// The stat whose effective value is this resource's ceiling
    pub fn ceiling_stat(self) -> StatKind {
        match self {
            ResourceKind::Health => StatKind::MaximumHealth,
            ResourceKind::Stamina => StatKind::MaximumStamina,
        }
    }

    /// The resource capped by `stat`, if any
    pub fn capped_by(stat: StatKind) -> Option<ResourceKind> {
        match stat {
            StatKind::MaximumHealth => Some(ResourceKind::Health),
            StatKind::MaximumStamina => Some(ResourceKind::Stamina),
            _ => None,
        }
    }
}

/// How a damage application is mitigated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageType {
    /// Divided by the defender's Armor
    Physical,
    /// Divided by the defender's Shield
    Magical,
    /// Never mitigated
    True,
}

/// Equip slot. Ordering is the display order of equipped items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipSlot {
    Head,
    Chest,
    Hands,
    Legs,
    Feet,
    MainHand,
    OffHand,
    Neck,
    Ring,
}

impl EquipSlot {
    /// Get all equipment slots
    pub fn all() -> &'static [EquipSlot] {
        &[
            EquipSlot::Head,
            EquipSlot::Chest,
            EquipSlot::Hands,
            EquipSlot::Legs,
            EquipSlot::Feet,
            EquipSlot::MainHand,
            EquipSlot::OffHand,
            EquipSlot::Neck,
            EquipSlot::Ring,
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    #[default]
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

/// Broad item classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Weapon,
    Armor,
    Consumable,
    Trinket,
}

/// Whether an effect helps or harms its host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    Positive,
    Negative,
}

/// Whether other players see an effect without a successful peer roll
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    #[default]
    Visible,
    Hidden,
}

/// Rule applied when an effect is reapplied to a host that already has it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stacking {
    /// Increment stacks up to the maximum and reset duration
    AddStack,
    /// Reset duration only
    RefreshOnly,
    /// Discard the new application
    Ignore,
}
