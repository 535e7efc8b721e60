//! Notifications for the presentation layer
//!
//! The core never reads these back. The world buffers them in the order
//! they happened and the host drains them with
//! [`World::drain_notifications`](crate::world::World::drain_notifications).

use crate::entity::EntityId;
use crate::types::{Category, DamageType, EquipSlot, ResourceKind, StatKind};

/// Why an equip or unequip request did nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EquipFailure {
    AlreadyEquipped,
    NotEquipped,
}

/// Why a use request did nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UseFailure {
    /// Target is not a live player
    TargetGone,
    /// Item only targets its owner
    SelfOnly,
    /// Item never targets its owner
    OthersOnly,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    EntityAdded {
        entity: EntityId,
        category: Category,
    },
    EntityRemoved {
        entity: EntityId,
        category: Category,
    },
    ItemEquipped {
        item: EntityId,
        owner: EntityId,
        slot: EquipSlot,
    },
    ItemUnequipped {
        item: EntityId,
        owner: EntityId,
        slot: EquipSlot,
    },
    EquipFailed {
        item: EntityId,
        reason: EquipFailure,
    },
    ItemUsed {
        item: EntityId,
        user: EntityId,
        target: EntityId,
    },
    ItemConsumed {
        item: EntityId,
    },
    InsufficientResource {
        item: EntityId,
        resource: ResourceKind,
        required: i64,
        available: i64,
    },
    UseFailed {
        item: EntityId,
        reason: UseFailure,
    },
    /// A luck roll produced an item
    ItemDropped {
        item: EntityId,
        owner: EntityId,
    },
    StatChanged {
        entity: EntityId,
        stat: StatKind,
        old: i64,
        new: i64,
    },
    ResourceChanged {
        entity: EntityId,
        resource: ResourceKind,
        old: i64,
        new: i64,
    },
    ResourceDepleted {
        entity: EntityId,
        resource: ResourceKind,
    },
    Missed {
        source: EntityId,
        target: EntityId,
    },
    Dodged {
        source: EntityId,
        target: EntityId,
    },
    CriticalHit {
        source: EntityId,
        target: EntityId,
    },
    DamageDealt {
        source: EntityId,
        target: EntityId,
        amount: i64,
        damage_type: DamageType,
    },
    HealingDone {
        source: EntityId,
        target: EntityId,
        amount: i64,
    },
    EffectApplied {
        effect: EntityId,
        host: EntityId,
    },
    EffectStacked {
        effect: EntityId,
        stacks: u32,
    },
    EffectRefreshed {
        effect: EntityId,
    },
    EffectIgnored {
        effect: EntityId,
    },
    EffectExpired {
        effect: EntityId,
    },
    EffectCured {
        effect: EntityId,
    },
    /// A peer roll let `viewer` see a hidden effect
    EffectRevealed {
        effect: EntityId,
        viewer: EntityId,
    },
    ArmorSetCompleted {
        owner: EntityId,
        set: String,
    },
    ArmorSetBroken {
        owner: EntityId,
        set: String,
    },
    TurnStarted {
        entity: EntityId,
    },
    TurnEnded {
        entity: EntityId,
    },
    Eliminated {
        entity: EntityId,
    },
    GameOver {
        winner: Option<EntityId>,
    },
    /// A menu selection did not name an item
    ItemNotFound {
        index: usize,
    },
    /// A menu selection did not name a live player
    TargetNotFound {
        index: usize,
    },
    UnknownCommand {
        choice: usize,
    },
}
