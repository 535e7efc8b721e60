//! duel_core - Simulation core for a turn-based dueling game
//!
//! This library provides:
//! - World: entities, components and the trigger bus that wires them
//! - Stats and Resources: base/modifier stats, clamped resources with
//!   maximum tracking
//! - Combat: accuracy, dodge, critical and mitigation for damage and healing
//! - Effects: status effects with stacking policies and durations
//! - Equipment: equip slots and edge-triggered armor-set bonuses
//! - Scheduler: round-robin turns over live players
//!
//! Content (items and effects) is data: templates in a TOML catalog,
//! assembled into entities by the world.

pub mod capability;
pub mod combat;
pub mod config;
pub mod effect;
pub mod entity;
pub mod equipment;
pub mod error;
pub mod notify;
pub mod prelude;
pub mod scheduler;
pub mod stats;
pub mod trigger;
pub mod types;
pub mod world;

// Re-export core types for convenience
pub use combat::Resolution;
pub use config::{default_catalog, RulesConfig, TemplateCatalog};
pub use effect::EffectOutcome;
pub use entity::{EntityBuilder, EntityId};
pub use equipment::{EquipOutcome, UnequipOutcome};
pub use error::{CoreError, Result};
pub use notify::Notification;
pub use scheduler::{ActionSelector, ChoicePrompt, PromptSelector, Scheduler, TurnOutcome};
pub use world::{RemoveOutcome, UseOutcome, World};
