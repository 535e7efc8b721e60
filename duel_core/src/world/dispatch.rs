//! Synchronous trigger publication and handler dispatch

use super::World;
use crate::capability::{
    DealsDamage, DealsHealing, EffectAction, ModifiesEffects, ModifiesStats, StatRule, TargetRule, Wearable,
};
use crate::entity::EntityId;
use crate::error::{CoreError, Result};
use crate::trigger::{EventDetail, Handler, Subscription, Trigger, TriggerEvent};
use crate::types::ResourceKind;
use tracing::trace;

impl World {
    /// Deliver `event` to every subscriber of its channel, in subscription
    /// order, before returning.
    ///
    /// The subscriber list is snapshotted first. Subscribers removed while
    /// the event is in flight are skipped.
    pub(crate) fn publish(&mut self, event: TriggerEvent) -> Result<()> {
        let subscribers = self.bus.snapshot(event.source, event.kind);
        if subscribers.is_empty() {
            return Ok(());
        }
        let limit = self.rules.limits.max_trigger_depth;
        if !self.bus.enter(limit) {
            return Err(CoreError::TriggerDepthExceeded(limit));
        }
        trace!(
            source = %event.source,
            trigger = ?event.kind,
            subscribers = subscribers.len(),
            depth = self.bus.depth(),
            "publish"
        );
        let result = self.deliver(&event, &subscribers);
        self.bus.leave();
        result
    }

    fn deliver(&mut self, event: &TriggerEvent, subscribers: &[Subscription]) -> Result<()> {
        for subscription in subscribers {
            if !self.registry.contains(subscription.subscriber) {
                continue;
            }
            self.handle(subscription.subscriber, subscription.handler, event)?;
        }
        Ok(())
    }

    fn handle(&mut self, subscriber: EntityId, handler: Handler, event: &TriggerEvent) -> Result<()> {
        match handler {
            Handler::DealDamage => {
                let damage = self.get::<DealsDamage>(subscriber)?.clone();
                if let Some(target) = self.reaction_target(subscriber, damage.target, event) {
                    self.resolve_damage(subscriber, target, &damage)?;
                }
            }
            Handler::DealHealing => {
                let healing = self.get::<DealsHealing>(subscriber)?.clone();
                if let Some(target) = self.reaction_target(subscriber, healing.target, event) {
                    self.resolve_healing(subscriber, target, &healing)?;
                }
            }
            Handler::ApplyStatRule(index) => self.apply_stat_rule(subscriber, index, event)?,
            Handler::RevertStatRule(index) => self.revert_stat_rule(subscriber, index)?,
            Handler::EffectRule(index) => self.run_effect_rule(subscriber, index, event)?,
            Handler::TickDuration => self.tick_effect(subscriber)?,
            Handler::TrackCeiling => {
                if let EventDetail::StatChanged { stat, old, new } = event.detail {
                    self.follow_ceiling(subscriber, stat, old, new)?;
                }
            }
            Handler::RefillStamina => self.refill(subscriber, ResourceKind::Stamina)?,
            Handler::PeerRoll => self.peer_roll(subscriber)?,
            Handler::LuckRoll => self.luck_roll(subscriber)?,
            Handler::RelayWhileEquipped => {
                if self.get::<Wearable>(subscriber)?.equipped {
                    let relay = TriggerEvent::new(Trigger::OnTurnStartWhileEquipped, subscriber)
                        .with_target(self.owner_of(subscriber));
                    self.publish(relay)?;
                }
            }
        }
        Ok(())
    }

    /// Live player a reaction lands on
    fn reaction_target(&self, subscriber: EntityId, rule: TargetRule, event: &TriggerEvent) -> Option<EntityId> {
        let owner = self.owner_of(subscriber);
        let target = match rule {
            TargetRule::EventTarget => event.target.or(owner),
            TargetRule::Owner => owner,
        }?;
        self.is_live(target).then_some(target)
    }

    fn stat_rule(&self, subscriber: EntityId, index: usize) -> Result<StatRule> {
        self.get::<ModifiesStats>(subscriber)?
            .rules
            .get(index)
            .cloned()
            .ok_or_else(|| CoreError::InvalidTemplate {
                template: self.type_tag(subscriber),
                reason: format!("no stat rule at index {}", index),
            })
    }

    fn apply_stat_rule(&mut self, subscriber: EntityId, index: usize, event: &TriggerEvent) -> Result<()> {
        let rule = self.stat_rule(subscriber, index)?;
        let Some(target) = self.reaction_target(subscriber, rule.target, event) else {
            return Ok(());
        };
        if let Some(stored) = self.get_mut::<ModifiesStats>(subscriber)?.rules.get_mut(index) {
            stored.applied.push(target);
        }
        for change in &rule.changes {
            self.increase_base(target, change.stat, change.base)?;
            self.increase_modifier(target, change.stat, change.factor)?;
        }
        for multiplier in &rule.multipliers {
            self.change_multiplier(target, multiplier.resource, multiplier.restore, multiplier.spend)?;
        }
        Ok(())
    }

    /// Undo the most recent application of a rule, if any
    fn revert_stat_rule(&mut self, subscriber: EntityId, index: usize) -> Result<()> {
        let rule = self.stat_rule(subscriber, index)?;
        let target = self
            .get_mut::<ModifiesStats>(subscriber)?
            .rules
            .get_mut(index)
            .and_then(|stored| stored.applied.pop());
        let Some(target) = target.filter(|t| self.is_live(*t)) else {
            return Ok(());
        };
        for change in rule.changes.iter().rev() {
            self.reduce_modifier(target, change.stat, change.factor)?;
            self.increase_base(target, change.stat, -change.base)?;
        }
        for multiplier in &rule.multipliers {
            self.change_multiplier(
                target,
                multiplier.resource,
                multiplier.restore.map(|f| 1.0 / f),
                multiplier.spend.map(|f| 1.0 / f),
            )?;
        }
        Ok(())
    }

    fn run_effect_rule(&mut self, subscriber: EntityId, index: usize, event: &TriggerEvent) -> Result<()> {
        let rule = self
            .get::<ModifiesEffects>(subscriber)?
            .rules
            .get(index)
            .cloned()
            .ok_or_else(|| CoreError::InvalidTemplate {
                template: self.type_tag(subscriber),
                reason: format!("no effect rule at index {}", index),
            })?;
        let Some(target) = self.reaction_target(subscriber, rule.target, event) else {
            return Ok(());
        };
        match rule.action {
            EffectAction::Apply { effect } => {
                self.apply_effect(&effect, target)?;
            }
            EffectAction::Cure { effect } => {
                self.cure_effect(&effect, target)?;
            }
            EffectAction::CureAll { polarity } => {
                self.cure_all(polarity, target)?;
            }
        }
        Ok(())
    }

    pub(crate) fn type_tag(&self, entity: EntityId) -> String {
        self.registry
            .identity(entity)
            .map(|identity| identity.type_tag.clone())
            .unwrap_or_default()
    }
}
