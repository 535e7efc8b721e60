//! Prelude module for convenient imports
//!
//! ```rust
//! use duel_core::prelude::*;
//! ```

// World and commands
pub use crate::world::{RemoveOutcome, UseOutcome, World};
pub use crate::entity::{Component, ComponentKind, EntityBuilder, EntityId};
pub use crate::error::{CoreError, Result};

// Core types
pub use crate::types::{
    Category, DamageType, EquipSlot, ItemKind, Polarity, Rarity, ResourceKind, Stacking, StatKind, Visibility,
};

// Capabilities
pub use crate::capability::{
    ArmorSetPiece, DealsDamage, DealsHealing, EffectAction, EffectData, EffectDuration, EffectRule, ItemData,
    Magnitude, ModifiesEffects, ModifiesStats, StatChange, StatRule, TargetRule, Targeting, Usable, Wearable,
};

// Outcomes
pub use crate::combat::Resolution;
pub use crate::effect::EffectOutcome;
pub use crate::equipment::{EquipOutcome, UnequipOutcome};

// Triggers and notifications
pub use crate::notify::{EquipFailure, Notification, UseFailure};
pub use crate::trigger::Trigger;

// Turns
pub use crate::scheduler::{ActionSelector, ChoicePrompt, PromptSelector, Scheduler, SchedulerState, TurnOutcome};

// Config
pub use crate::config::{default_catalog, load_catalog, parse_catalog, RulesConfig, TemplateCatalog};
