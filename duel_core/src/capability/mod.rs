//! Capabilities attached to item and effect entities
//!
//! Each capability is a small typed record. The reactive ones declare the
//! triggers they listen to through [`Reactive`]; the world wires those
//! subscriptions once, when the owning entity is assembled.

mod damage;
mod effect;
mod item;
mod modifiers;

pub use damage::{DealsDamage, DealsHealing, Magnitude};
pub use effect::{EffectData, EffectDuration};
pub use item::{ArmorSetPiece, ItemData, Targeting, Usable, Wearable};
pub use modifiers::{
    EffectAction, EffectRule, ModifiesEffects, ModifiesStats, MultiplierChange, StatChange, StatRule,
};

use crate::trigger::{Handler, Trigger};
use serde::{Deserialize, Serialize};

/// Who receives the outcome of a reaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetRule {
    /// The target carried by the event; the owner when the event has none
    #[default]
    EventTarget,
    /// The owning player (an item's holder, an effect's host)
    Owner,
}

/// A capability that reacts to triggers
pub trait Reactive {
    /// (trigger, handler) pairs in declaration order
    fn subscriptions(&self) -> Vec<(Trigger, Handler)>;
}

impl Reactive for DealsDamage {
    fn subscriptions(&self) -> Vec<(Trigger, Handler)> {
        self.triggers.iter().map(|t| (*t, Handler::DealDamage)).collect()
    }
}

impl Reactive for DealsHealing {
    fn subscriptions(&self) -> Vec<(Trigger, Handler)> {
        self.triggers.iter().map(|t| (*t, Handler::DealHealing)).collect()
    }
}

impl Reactive for ModifiesStats {
    fn subscriptions(&self) -> Vec<(Trigger, Handler)> {
        let mut subs = Vec::new();
        for (index, rule) in self.rules.iter().enumerate() {
            subs.extend(rule.apply_on.iter().map(|t| (*t, Handler::ApplyStatRule(index))));
            subs.extend(rule.revert_on.iter().map(|t| (*t, Handler::RevertStatRule(index))));
        }
        subs
    }
}

impl Reactive for ModifiesEffects {
    fn subscriptions(&self) -> Vec<(Trigger, Handler)> {
        self.rules
            .iter()
            .enumerate()
            .flat_map(|(index, rule)| rule.triggers.iter().map(move |t| (*t, Handler::EffectRule(index))))
            .collect()
    }
}
