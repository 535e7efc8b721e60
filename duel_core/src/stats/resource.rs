//! Depletable resources bound to a maximum stat

use crate::types::ResourceKind;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resource {
    pub current: i64,
    /// Scales positive changes
    pub restore_multiplier: f64,
    /// Scales negative changes
    pub spend_multiplier: f64,
}

impl Resource {
    pub fn new(current: i64) -> Self {
        Resource {
            current,
            restore_multiplier: 1.0,
            spend_multiplier: 1.0,
        }
    }

    /// Delta after the restore/spend multiplier, truncated toward zero
    pub fn scaled(&self, delta: i64) -> i64 {
        let multiplier = if delta >= 0 {
            self.restore_multiplier
        } else {
            self.spend_multiplier
        };
        (delta as f64 * multiplier) as i64
    }
}

/// Scale `delta`, add it to `current` and clamp into `[0, ceiling]`
pub fn apply_change(resource: &Resource, delta: i64, ceiling: i64) -> i64 {
    clamp_into(resource.current.saturating_add(resource.scaled(delta)), ceiling)
}

/// Keep the headroom below the ceiling when the ceiling moves
pub fn track_ceiling(current: i64, old_ceiling: i64, new_ceiling: i64) -> i64 {
    clamp_into(current.saturating_add(new_ceiling - old_ceiling), new_ceiling)
}

fn clamp_into(value: i64, ceiling: i64) -> i64 {
    value.clamp(0, ceiling.max(0))
}

/// A player's resources
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resources {
    values: BTreeMap<ResourceKind, Resource>,
}

impl Resources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, kind: ResourceKind, current: i64) -> Self {
        self.values.insert(kind, Resource::new(current.max(0)));
        self
    }

    pub fn get(&self, kind: ResourceKind) -> Option<&Resource> {
        self.values.get(&kind)
    }

    pub fn current(&self, kind: ResourceKind) -> Option<i64> {
        self.values.get(&kind).map(|r| r.current)
    }

    pub fn kinds(&self) -> impl Iterator<Item = ResourceKind> + '_ {
        self.values.keys().copied()
    }

    /// Overwrite the current value. Returns the old value.
    pub fn set(&mut self, kind: ResourceKind, value: i64) -> Option<i64> {
        let entry = self.values.get_mut(&kind)?;
        Some(std::mem::replace(&mut entry.current, value))
    }

    /// Multiply the restore and/or spend multiplier
    pub fn scale_multipliers(&mut self, kind: ResourceKind, restore: Option<f64>, spend: Option<f64>) -> bool {
        let Some(entry) = self.values.get_mut(&kind) else {
            return false;
        };
        if let Some(factor) = restore {
            entry.restore_multiplier *= factor;
        }
        if let Some(factor) = spend {
            entry.spend_multiplier *= factor;
        }
        true
    }
}
