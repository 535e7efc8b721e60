//! Subscriber lists and re-entrancy bookkeeping

use super::{Subscription, Trigger};
use crate::entity::EntityId;
use std::collections::HashMap;

/// Ordered subscriber lists keyed by (publisher, trigger)
///
/// Delivery order is insertion order. Publication takes a snapshot of the
/// list, so handlers may subscribe or unsubscribe while an event is being
/// delivered without disturbing the delivery in progress.
#[derive(Debug, Clone, Default)]
pub struct TriggerBus {
    channels: HashMap<(EntityId, Trigger), Vec<Subscription>>,
    depth: usize,
}

impl TriggerBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, publisher: EntityId, trigger: Trigger, subscription: Subscription) {
        self.channels
            .entry((publisher, trigger))
            .or_default()
            .push(subscription);
    }

    /// Copy of the current subscriber list of a channel
    pub fn snapshot(&self, publisher: EntityId, trigger: Trigger) -> Vec<Subscription> {
        self.channels
            .get(&(publisher, trigger))
            .cloned()
            .unwrap_or_default()
    }

    pub fn subscriber_count(&self, publisher: EntityId, trigger: Trigger) -> usize {
        self.channels
            .get(&(publisher, trigger))
            .map_or(0, |subs| subs.len())
    }

    /// Drop every channel published by `entity` and every subscription it holds
    pub fn unsubscribe_entity(&mut self, entity: EntityId) {
        self.channels.retain(|(publisher, _), subs| {
            if *publisher == entity {
                return false;
            }
            subs.retain(|s| s.subscriber != entity);
            !subs.is_empty()
        });
    }

    /// Enter one level of nested publication. Returns false past `limit`.
    pub fn enter(&mut self, limit: usize) -> bool {
        if self.depth >= limit {
            return false;
        }
        self.depth += 1;
        true
    }

    pub fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    pub fn depth(&self) -> usize {
        self.depth
    }
}
