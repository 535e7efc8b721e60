//! Status effect lifecycle
//!
//! Effects are entities hosted by a player. At most one effect of a given
//! name lives on a host; reapplying it goes through the effect's
//! [`Stacking`](crate::types::Stacking) policy instead of creating a second
//! entity.

mod lifecycle;

use crate::entity::EntityId;

/// Result of applying an effect to a player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectOutcome {
    /// A new effect entity now lives on the host
    Applied(EntityId),
    /// The existing effect gained a stack (or sat at its maximum) and was
    /// refreshed
    Stacked { effect: EntityId, stacks: u32 },
    Refreshed(EntityId),
    /// The existing effect was left untouched
    Ignored(EntityId),
    /// The host is no longer in the world
    TargetGone,
}

impl EffectOutcome {
    /// The effect entity the application landed on, if any
    pub fn effect(&self) -> Option<EntityId> {
        match self {
            EffectOutcome::Applied(effect)
            | EffectOutcome::Refreshed(effect)
            | EffectOutcome::Ignored(effect)
            | EffectOutcome::Stacked { effect, .. } => Some(*effect),
            EffectOutcome::TargetGone => None,
        }
    }
}
