//! Stat and resource engines
//!
//! Stats are `(base, modifier)` pairs whose effective value is
//! `floor(base * modifier)`. Resources hold a current value clamped into
//! `[0, ceiling]`, where the ceiling is the effective value of the matching
//! maximum stat. Every stat change is published on the owner's
//! `OnStatChanged` channel; the owner's resources subscribe to it and keep
//! their headroom when a ceiling moves.

mod resource;
mod stat;

pub use resource::{apply_change, track_ceiling, Resource, Resources};
pub use stat::{Stat, Stats};

use crate::entity::EntityId;
use crate::error::{CoreError, Result};
use crate::notify::Notification;
use crate::trigger::{EventDetail, Trigger, TriggerEvent};
use crate::types::{ResourceKind, StatKind};
use crate::world::World;
use tracing::trace;

fn valid_factor(factor: f64) -> bool {
    factor.is_finite() && factor > 0.0
}

impl World {
    pub fn stat_record(&self, entity: EntityId, stat: StatKind) -> Result<Stat> {
        self.get::<Stats>(entity)?
            .get(stat)
            .copied()
            .ok_or(CoreError::UnknownStat { entity, stat })
    }

    /// Effective value `floor(base * modifier)`
    pub fn stat(&self, entity: EntityId, stat: StatKind) -> Result<i64> {
        Ok(self.stat_record(entity, stat)?.value())
    }

    /// Diminishing-returns chance of a stat, in `[0, 1)`
    pub fn hyperbolic(&self, entity: EntityId, stat: StatKind) -> Result<f64> {
        Ok(self.rules().scaling.hyperbolic(self.stat(entity, stat)?))
    }

    /// Linear scaling factor of a stat, never below `minimum`
    pub fn linear_clamped(&self, entity: EntityId, stat: StatKind, minimum: f64) -> Result<f64> {
        Ok(self.rules().scaling.linear_clamped(self.stat(entity, stat)?, minimum))
    }

    pub fn increase_base(&mut self, entity: EntityId, stat: StatKind, delta: i64) -> Result<()> {
        if delta == 0 {
            return Ok(());
        }
        let (old, new) = self
            .get_mut::<Stats>(entity)?
            .increase_base(stat, delta)
            .ok_or(CoreError::UnknownStat { entity, stat })?;
        trace!(%entity, ?stat, delta, old, new, "stat base changed");
        self.stat_changed(entity, stat, old, new)
    }

    pub fn increase_modifier(&mut self, entity: EntityId, stat: StatKind, factor: f64) -> Result<()> {
        if !valid_factor(factor) {
            return Err(CoreError::InvalidFactor { stat, factor });
        }
        if factor == 1.0 {
            return Ok(());
        }
        let (old, new) = self
            .get_mut::<Stats>(entity)?
            .increase_modifier(stat, factor)
            .ok_or(CoreError::UnknownStat { entity, stat })?;
        trace!(%entity, ?stat, factor, old, new, "stat modifier changed");
        self.stat_changed(entity, stat, old, new)
    }

    /// Undo a previous [`World::increase_modifier`] by the same factor
    pub(crate) fn reduce_modifier(&mut self, entity: EntityId, stat: StatKind, factor: f64) -> Result<()> {
        if !valid_factor(factor) {
            return Err(CoreError::InvalidFactor { stat, factor });
        }
        if factor == 1.0 {
            return Ok(());
        }
        let (old, new) = self
            .get_mut::<Stats>(entity)?
            .reduce_modifier(stat, factor)
            .ok_or(CoreError::UnknownStat { entity, stat })?;
        self.stat_changed(entity, stat, old, new)
    }

    fn stat_changed(&mut self, entity: EntityId, stat: StatKind, old: i64, new: i64) -> Result<()> {
        self.notify(Notification::StatChanged { entity, stat, old, new });
        let event = TriggerEvent::new(Trigger::OnStatChanged, entity)
            .with_detail(EventDetail::StatChanged { stat, old, new });
        self.publish(event)
    }

    pub fn resource(&self, entity: EntityId, resource: ResourceKind) -> Result<i64> {
        self.get::<Resources>(entity)?
            .current(resource)
            .ok_or(CoreError::UnknownResource { entity, resource })
    }

    /// Effective value of the resource's maximum stat
    pub fn resource_ceiling(&self, entity: EntityId, resource: ResourceKind) -> Result<i64> {
        self.stat(entity, resource.ceiling_stat())
    }

    /// Scale `delta` by the restore or spend multiplier and apply it,
    /// clamped into `[0, ceiling]`. Returns the new current value.
    pub fn change_resource(&mut self, entity: EntityId, resource: ResourceKind, delta: i64) -> Result<i64> {
        let ceiling = self.resource_ceiling(entity, resource)?;
        let record = *self
            .get::<Resources>(entity)?
            .get(resource)
            .ok_or(CoreError::UnknownResource { entity, resource })?;
        let new = apply_change(&record, delta, ceiling);
        self.set_resource(entity, resource, new)?;
        Ok(new)
    }

    pub fn change_multiplier(
        &mut self,
        entity: EntityId,
        resource: ResourceKind,
        restore: Option<f64>,
        spend: Option<f64>,
    ) -> Result<()> {
        for factor in restore.into_iter().chain(spend) {
            if !valid_factor(factor) {
                return Err(CoreError::InvalidMultiplier { resource, factor });
            }
        }
        if !self.get_mut::<Resources>(entity)?.scale_multipliers(resource, restore, spend) {
            return Err(CoreError::UnknownResource { entity, resource });
        }
        Ok(())
    }

    /// Set the resource to its ceiling
    pub fn refill(&mut self, entity: EntityId, resource: ResourceKind) -> Result<()> {
        let ceiling = self.resource_ceiling(entity, resource)?;
        self.set_resource(entity, resource, ceiling.max(0))
    }

    /// A maximum stat moved from `old` to `new`; carry the headroom over
    pub(crate) fn follow_ceiling(&mut self, entity: EntityId, stat: StatKind, old: i64, new: i64) -> Result<()> {
        let Some(resource) = ResourceKind::capped_by(stat) else {
            return Ok(());
        };
        let Some(current) = self.get::<Resources>(entity)?.current(resource) else {
            return Ok(());
        };
        self.set_resource(entity, resource, track_ceiling(current, old, new))
    }

    fn set_resource(&mut self, entity: EntityId, resource: ResourceKind, value: i64) -> Result<()> {
        let old = self
            .get_mut::<Resources>(entity)?
            .set(resource, value)
            .ok_or(CoreError::UnknownResource { entity, resource })?;
        if old == value {
            return Ok(());
        }
        trace!(%entity, ?resource, old, new = value, "resource changed");
        self.notify(Notification::ResourceChanged {
            entity,
            resource,
            old,
            new: value,
        });
        if value == 0 && old > 0 {
            self.notify(Notification::ResourceDepleted { entity, resource });
            if resource == ResourceKind::Health {
                self.eliminate(entity)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::World;

    fn world_with_player() -> (World, EntityId) {
        let mut world = World::with_seed(7);
        let player = world.spawn_player("Alice").unwrap();
        world.drain_notifications();
        (world, player)
    }

    #[test]
    fn test_stat_accessors() {
        let (world, player) = world_with_player();
        assert_eq!(world.stat(player, StatKind::Attack).unwrap(), 100);
        assert!((world.linear_clamped(player, StatKind::Attack, 0.1).unwrap() - 1.0).abs() < f64::EPSILON);
        assert!((world.hyperbolic(player, StatKind::Dodge).unwrap() - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_stat_change_notifies() {
        let (mut world, player) = world_with_player();
        world.increase_base(player, StatKind::Armor, 50).unwrap();

        assert_eq!(world.stat(player, StatKind::Armor).unwrap(), 50);
        assert!(world.drain_notifications().contains(&Notification::StatChanged {
            entity: player,
            stat: StatKind::Armor,
            old: 0,
            new: 50,
        }));
    }

    #[test]
    fn test_invalid_factor_rejected() {
        let (mut world, player) = world_with_player();
        assert!(matches!(
            world.increase_modifier(player, StatKind::Attack, 0.0),
            Err(CoreError::InvalidFactor { .. })
        ));
        assert!(matches!(
            world.increase_modifier(player, StatKind::Attack, f64::NAN),
            Err(CoreError::InvalidFactor { .. })
        ));
    }

    #[test]
    fn test_headroom_follows_maximum() {
        let (mut world, player) = world_with_player();
        world.change_resource(player, ResourceKind::Health, -90).unwrap();
        assert_eq!(world.resource(player, ResourceKind::Health).unwrap(), 10);

        world.increase_base(player, StatKind::MaximumHealth, 20).unwrap();

        assert_eq!(world.resource_ceiling(player, ResourceKind::Health).unwrap(), 120);
        assert_eq!(world.resource(player, ResourceKind::Health).unwrap(), 30);
    }

    #[test]
    fn test_lowering_maximum_clamps() {
        let (mut world, player) = world_with_player();
        world.increase_modifier(player, StatKind::MaximumHealth, 0.5).unwrap();
        assert_eq!(world.resource(player, ResourceKind::Health).unwrap(), 50);
    }

    #[test]
    fn test_refill_is_idempotent() {
        let (mut world, player) = world_with_player();
        world.change_resource(player, ResourceKind::Stamina, -4).unwrap();
        world.drain_notifications();

        world.refill(player, ResourceKind::Stamina).unwrap();
        let once = world.resource(player, ResourceKind::Stamina).unwrap();
        let first = world.drain_notifications();

        world.refill(player, ResourceKind::Stamina).unwrap();
        assert_eq!(world.resource(player, ResourceKind::Stamina).unwrap(), once);
        assert_eq!(first.len(), 1);
        assert!(world.drain_notifications().is_empty());
    }

    #[test]
    fn test_spend_multiplier() {
        let (mut world, player) = world_with_player();
        world
            .change_multiplier(player, ResourceKind::Health, None, Some(0.5))
            .unwrap();
        assert_eq!(world.change_resource(player, ResourceKind::Health, -30).unwrap(), 85);
    }

    #[test]
    fn test_health_depletion_eliminates() {
        let (mut world, player) = world_with_player();
        world.change_resource(player, ResourceKind::Health, -500).unwrap();

        let notes = world.drain_notifications();
        assert!(notes.contains(&Notification::ResourceDepleted {
            entity: player,
            resource: ResourceKind::Health,
        }));
        assert!(notes.contains(&Notification::Eliminated { entity: player }));
        assert!(!world.is_live(player));
    }
}
