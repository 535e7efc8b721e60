//! Damage resolution - accuracy, dodge, scaling, critical, mitigation

use super::mitigation::{critical_multiplier, final_amount, mitigate};
use super::result::Resolution;
use crate::capability::{DealsDamage, DealsHealing, EffectData, ItemData, Magnitude};
use crate::entity::EntityId;
use crate::error::{CoreError, Result};
use crate::notify::Notification;
use crate::trigger::{EventDetail, Trigger, TriggerEvent};
use crate::types::{ResourceKind, StatKind};
use crate::world::World;
use tracing::trace;

/// Who stands behind an application
enum Origin {
    /// An item: its holder's stats drive the rolls and scaling
    Wielder(EntityId),
    /// An effect: no attacker, scaled by stack count. The defender still
    /// gets a dodge roll.
    Stacks(u32),
}

impl World {
    fn origin(&self, source: EntityId) -> Result<Origin> {
        if let Some(data) = self.try_get::<ItemData>(source) {
            return Ok(Origin::Wielder(data.owner));
        }
        if let Some(data) = self.try_get::<EffectData>(source) {
            return Ok(Origin::Stacks(data.stacks));
        }
        Err(CoreError::MissingComponent {
            entity: source,
            component: crate::entity::ComponentKind::ItemData,
        })
    }

    /// Base magnitude before any scaling, read from the target
    fn base_magnitude(&self, magnitude: &Magnitude, target: EntityId) -> Result<f64> {
        match magnitude.resource() {
            None => Ok(magnitude.resolve(0, 0)),
            Some(resource) => Ok(magnitude.resolve(
                self.resource(target, resource)?,
                self.resource_ceiling(target, resource)?,
            )),
        }
    }

    /// Defender's dodge roll. A dodge is notified and published here.
    fn dodges(&mut self, source: EntityId, target: EntityId) -> Result<bool> {
        let dodge = self.hyperbolic(target, StatKind::Dodge)?;
        if !self.roll(dodge) {
            return Ok(false);
        }
        self.notify(Notification::Dodged { source, target });
        self.publish_outcome(Trigger::OnDodge, source, target, EventDetail::None)?;
        Ok(true)
    }

    fn publish_outcome(&mut self, kind: Trigger, source: EntityId, target: EntityId, detail: EventDetail) -> Result<()> {
        let event = TriggerEvent::new(kind, source)
            .with_target(Some(target))
            .with_detail(detail);
        self.publish(event)
    }

    /// Resolve one damage application from `source` against `target`
    pub fn resolve_damage(&mut self, source: EntityId, target: EntityId, damage: &DealsDamage) -> Result<Resolution> {
        let scaling = self.rules().scaling.clone();
        let origin = self.origin(source)?;

        let mut critical = false;
        let amount = match origin {
            Origin::Wielder(attacker) => {
                let accuracy = self.linear_clamped(attacker, StatKind::Accuracy, scaling.accuracy_floor)?;
                if !self.roll(accuracy) {
                    self.notify(Notification::Missed { source, target });
                    self.publish_outcome(Trigger::OnMiss, source, target, EventDetail::None)?;
                    return Ok(Resolution::Missed);
                }

                if self.dodges(source, target)? {
                    return Ok(Resolution::Dodged);
                }

                self.publish_outcome(Trigger::OnHit, source, target, EventDetail::None)?;
                if !self.is_live(target) || !self.is_live(attacker) {
                    return Ok(Resolution::TargetGone);
                }

                let base = self.base_magnitude(&damage.magnitude, target)?;
                let mut amount = base * self.linear_clamped(attacker, StatKind::Attack, scaling.attack_floor)?;

                let crit_chance = self.hyperbolic(attacker, StatKind::Critical)?;
                if self.roll(crit_chance) {
                    critical = true;
                    let precision = self.linear_clamped(attacker, StatKind::Precision, scaling.precision_floor)?;
                    amount *= critical_multiplier(precision);
                    self.notify(Notification::CriticalHit { source, target });
                    self.publish_outcome(Trigger::OnCritical, source, target, EventDetail::None)?;
                    if !self.is_live(target) {
                        return Ok(Resolution::TargetGone);
                    }
                }
                amount
            }
            Origin::Stacks(stacks) => {
                if self.dodges(source, target)? {
                    return Ok(Resolution::Dodged);
                }
                self.base_magnitude(&damage.magnitude, target)? * f64::from(stacks)
            }
        };

        let armor = self.hyperbolic(target, StatKind::Armor)?;
        let shield = self.hyperbolic(target, StatKind::Shield)?;
        let amount = final_amount(mitigate(amount, damage.damage_type, armor, shield));
        trace!(%source, %target, amount, critical, "damage resolved");

        self.notify(Notification::DamageDealt {
            source,
            target,
            amount,
            damage_type: damage.damage_type,
        });
        self.change_resource(target, ResourceKind::Health, -amount)?;
        self.publish_outcome(Trigger::OnDamageDealt, source, target, EventDetail::Amount(amount))?;
        Ok(Resolution::Landed { amount, critical })
    }

    /// Resolve one healing application. Healing never misses, crits or is
    /// mitigated.
    pub fn resolve_healing(&mut self, source: EntityId, target: EntityId, healing: &DealsHealing) -> Result<Resolution> {
        let base = self.base_magnitude(&healing.magnitude, target)?;
        let amount = match self.origin(source)? {
            Origin::Wielder(healer) => {
                let floor = self.rules().scaling.healing_floor;
                base * self.linear_clamped(healer, StatKind::Healing, floor)?
            }
            Origin::Stacks(stacks) => base * f64::from(stacks),
        };
        let amount = final_amount(amount);
        trace!(%source, %target, amount, "healing resolved");

        self.notify(Notification::HealingDone { source, target, amount });
        self.change_resource(target, ResourceKind::Health, amount)?;
        self.publish_outcome(Trigger::OnHealingDone, source, target, EventDetail::Amount(amount))?;
        Ok(Resolution::Landed {
            amount,
            critical: false,
        })
    }
}
