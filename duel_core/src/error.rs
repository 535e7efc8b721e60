//! Content and configuration errors
//!
//! Everything in [`CoreError`] means a broken template or a programming
//! mistake. Gameplay outcomes such as a miss or an unaffordable item are
//! never errors; they are returned as outcome values.

use crate::config::ConfigError;
use crate::entity::{ComponentKind, EntityId};
use crate::trigger::Trigger;
use crate::types::{Category, ResourceKind, StatKind};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("entity {0} is not registered")]
    UnknownEntity(EntityId),

    #[error("entity {entity} has no {component:?} component")]
    MissingComponent {
        entity: EntityId,
        component: ComponentKind,
    },

    #[error("entity {entity} already has a {component:?} component")]
    DuplicateComponent {
        entity: EntityId,
        component: ComponentKind,
    },

    #[error("{component:?} cannot attach to {category} entity {entity}")]
    CategoryMismatch {
        entity: EntityId,
        category: Category,
        component: ComponentKind,
    },

    #[error("{component:?} on entity {entity} requires a {requires:?} component")]
    MissingDependency {
        entity: EntityId,
        component: ComponentKind,
        requires: ComponentKind,
    },

    #[error("{component:?} on {category} entity {entity} cannot react to {trigger:?}")]
    UnsupportedTrigger {
        entity: EntityId,
        category: Category,
        component: ComponentKind,
        trigger: Trigger,
    },

    #[error("entity {entity} has no {stat:?} stat")]
    UnknownStat { entity: EntityId, stat: StatKind },

    #[error("entity {entity} has no {resource:?} resource")]
    UnknownResource {
        entity: EntityId,
        resource: ResourceKind,
    },

    #[error("factor {factor} for {stat:?} must be positive and finite")]
    InvalidFactor { stat: StatKind, factor: f64 },

    #[error("multiplier {factor} for {resource:?} must be positive and finite")]
    InvalidMultiplier { resource: ResourceKind, factor: f64 },

    #[error("no template named '{0}'")]
    UnknownTemplate(String),

    #[error("invalid template '{template}': {reason}")]
    InvalidTemplate { template: String, reason: String },

    #[error("trigger chain exceeded depth {0}")]
    TriggerDepthExceeded(usize),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
