//! Trigger bus - typed publish/subscribe between capabilities
//!
//! Every channel is keyed by a publishing entity and a [`Trigger`] kind.
//! Subscribers are plain data ([`Subscription`]): the subscribing entity and
//! the [`Handler`] naming which of its capabilities reacts. The world
//! resolves handlers when an event is published, so no callback ever holds a
//! reference into the world.

mod bus;

pub use bus::TriggerBus;

use crate::entity::{ComponentKind, EntityId};
use crate::types::{Category, StatKind};
use serde::{Deserialize, Serialize};

/// Closed set of event kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    OnUse,
    OnEquip,
    OnUnequip,
    OnAdded,
    OnRemoved,
    OnHit,
    OnMiss,
    OnDodge,
    OnCritical,
    OnDamageDealt,
    OnHealingDone,
    OnTurnStart,
    OnTurnStartWhileEquipped,
    OnTurnEnd,
    OnArmorSetCompleted,
    OnArmorSetBroken,
    /// Internal: a stat's base or modifier changed on the publishing player
    OnStatChanged,
}

impl Trigger {
    /// Triggers published on the owning player rather than on the entity itself
    pub fn is_host_channel(self) -> bool {
        matches!(self, Trigger::OnTurnStart | Trigger::OnTurnEnd)
    }

    /// Whether a capability on a `category` entity may react to this trigger
    pub fn support(self, category: Category) -> TriggerSupport {
        use Trigger::*;
        match (category, self) {
            (Category::Item, OnUse) => TriggerSupport::Requires(ComponentKind::Usable),
            (Category::Item, OnEquip | OnUnequip | OnTurnStartWhileEquipped) => {
                TriggerSupport::Requires(ComponentKind::Wearable)
            }
            (Category::Item, OnArmorSetCompleted | OnArmorSetBroken) => {
                TriggerSupport::Requires(ComponentKind::ArmorSetPiece)
            }
            (Category::Effect, OnTurnStart | OnTurnEnd) => TriggerSupport::Always,
            (Category::Item | Category::Effect, OnAdded | OnRemoved) => TriggerSupport::Always,
            (Category::Item | Category::Effect, OnHit | OnMiss | OnDodge | OnCritical | OnDamageDealt) => {
                TriggerSupport::Requires(ComponentKind::DealsDamage)
            }
            (Category::Item | Category::Effect, OnHealingDone) => {
                TriggerSupport::Requires(ComponentKind::DealsHealing)
            }
            _ => TriggerSupport::Unsupported,
        }
    }
}

/// Answer of [`Trigger::support`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerSupport {
    Always,
    /// Only once a sibling component of this kind exists
    Requires(ComponentKind),
    /// Never published where such an entity could hear it
    Unsupported,
}

/// Payload carried by an event
#[derive(Debug, Clone, PartialEq)]
pub enum EventDetail {
    None,
    /// Final integer amount of a damage or healing application
    Amount(i64),
    StatChanged { stat: StatKind, old: i64, new: i64 },
    ArmorSet(String),
}

/// A published event
#[derive(Debug, Clone, PartialEq)]
pub struct TriggerEvent {
    pub kind: Trigger,
    /// Entity whose channel carries the event
    pub source: EntityId,
    /// Chosen target, when the event has one (use, hit, ...)
    pub target: Option<EntityId>,
    pub detail: EventDetail,
}

impl TriggerEvent {
    pub fn new(kind: Trigger, source: EntityId) -> Self {
        TriggerEvent {
            kind,
            source,
            target: None,
            detail: EventDetail::None,
        }
    }

    pub fn with_target(mut self, target: Option<EntityId>) -> Self {
        self.target = target;
        self
    }

    pub fn with_detail(mut self, detail: EventDetail) -> Self {
        self.detail = detail;
        self
    }
}

/// Which capability of the subscriber reacts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handler {
    DealDamage,
    DealHealing,
    ApplyStatRule(usize),
    RevertStatRule(usize),
    EffectRule(usize),
    TickDuration,
    /// Resources follow their maximum stat
    TrackCeiling,
    RefillStamina,
    PeerRoll,
    LuckRoll,
    /// Wearable turns the owner's turn start into its own while-equipped event
    RelayWhileEquipped,
}

/// One entry of a channel's ordered subscriber list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subscription {
    pub subscriber: EntityId,
    pub handler: Handler,
}
