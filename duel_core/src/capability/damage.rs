//! Damage and healing payloads

use super::TargetRule;
use crate::trigger::Trigger;
use crate::types::{DamageType, ResourceKind};
use serde::{Deserialize, Serialize};

/// Base magnitude of a damage or healing application, before scaling
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Magnitude {
    Flat { value: f64 },
    /// Fraction (0.1 = 10%) of the target's current value of a resource
    PercentOfCurrent { resource: ResourceKind, fraction: f64 },
    /// Fraction of the target's ceiling of a resource
    PercentOfMaximum { resource: ResourceKind, fraction: f64 },
}

impl Magnitude {
    /// Resolve against the target's current and maximum values of the
    /// referenced resource
    pub fn resolve(&self, current: i64, maximum: i64) -> f64 {
        match self {
            Magnitude::Flat { value } => *value,
            Magnitude::PercentOfCurrent { fraction, .. } => current as f64 * fraction,
            Magnitude::PercentOfMaximum { fraction, .. } => maximum as f64 * fraction,
        }
    }

    /// Resource the magnitude reads from the target, if dynamic
    pub fn resource(&self) -> Option<ResourceKind> {
        match self {
            Magnitude::Flat { .. } => None,
            Magnitude::PercentOfCurrent { resource, .. } | Magnitude::PercentOfMaximum { resource, .. } => {
                Some(*resource)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealsDamage {
    pub triggers: Vec<Trigger>,
    pub magnitude: Magnitude,
    pub damage_type: DamageType,
    #[serde(default)]
    pub target: TargetRule,
}

impl DealsDamage {
    pub fn new(triggers: Vec<Trigger>, magnitude: Magnitude, damage_type: DamageType) -> Self {
        DealsDamage {
            triggers,
            magnitude,
            damage_type,
            target: TargetRule::EventTarget,
        }
    }

    pub fn with_target(mut self, target: TargetRule) -> Self {
        self.target = target;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealsHealing {
    pub triggers: Vec<Trigger>,
    pub magnitude: Magnitude,
    #[serde(default)]
    pub target: TargetRule,
}

impl DealsHealing {
    pub fn new(triggers: Vec<Trigger>, magnitude: Magnitude) -> Self {
        DealsHealing {
            triggers,
            magnitude,
            target: TargetRule::EventTarget,
        }
    }

    pub fn with_target(mut self, target: TargetRule) -> Self {
        self.target = target;
        self
    }
}
