//! Status effect identity and duration

use crate::entity::EntityId;
use crate::types::{Polarity, Stacking, Visibility};
use std::collections::BTreeSet;

/// Identity and stacking state of a status effect
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectData {
    /// Template name; at most one effect per name per host
    pub name: String,
    /// The player hosting the effect
    pub owner: EntityId,
    pub polarity: Polarity,
    pub visibility: Visibility,
    pub stacking: Stacking,
    pub stacks: u32,
    pub max_stacks: u32,
    /// Players that revealed this hidden effect with a peer roll
    pub revealed_to: BTreeSet<EntityId>,
}

impl EffectData {
    pub fn new(name: &str, owner: EntityId, polarity: Polarity, stacking: Stacking) -> Self {
        EffectData {
            name: name.to_string(),
            owner,
            polarity,
            visibility: Visibility::Visible,
            stacking,
            stacks: 1,
            max_stacks: 1,
            revealed_to: BTreeSet::new(),
        }
    }

    /// Add one stack, saturating at the maximum. Returns the new count.
    pub fn add_stack(&mut self) -> u32 {
        if self.stacks < self.max_stacks {
            self.stacks += 1;
        }
        self.stacks
    }

    /// Whether `viewer` can see this effect
    pub fn visible_to(&self, viewer: EntityId) -> bool {
        viewer == self.owner || self.visibility == Visibility::Visible || self.revealed_to.contains(&viewer)
    }
}

/// Remaining lifetime of an effect, in host turns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectDuration {
    pub remaining: u32,
    pub maximum: u32,
}

impl EffectDuration {
    pub fn new(turns: u32) -> Self {
        EffectDuration {
            remaining: turns,
            maximum: turns,
        }
    }

    pub fn refresh(&mut self) {
        self.remaining = self.maximum;
    }

    /// Decrement, then report whether the effect has run out
    pub fn tick(&mut self) -> bool {
        self.remaining = self.remaining.saturating_sub(1);
        self.remaining == 0
    }
}
