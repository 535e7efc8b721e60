//! The simulation state and its dispatch loop
//!
//! [`World`] owns every entity, component, subscription and the random
//! stream. Each engine (stats, combat, effects, equipment) adds its own
//! `impl World` block in its module; this module holds the shared plumbing.

mod assembly;
mod dispatch;
mod lifecycle;
mod query;
mod rolls;

pub use lifecycle::{RemoveOutcome, UseOutcome};

use crate::capability::{EffectData, ItemData};
use crate::config::{RulesConfig, TemplateCatalog};
use crate::entity::{Component, ComponentStore, EntityId, Registry};
use crate::error::{CoreError, Result};
use crate::notify::Notification;
use crate::trigger::TriggerBus;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub struct World {
    registry: Registry,
    components: ComponentStore,
    bus: TriggerBus,
    rng: ChaCha8Rng,
    rules: RulesConfig,
    catalog: TemplateCatalog,
    notifications: Vec<Notification>,
}

impl World {
    pub fn new(rules: RulesConfig, catalog: TemplateCatalog, seed: u64) -> Self {
        World {
            registry: Registry::new(),
            components: ComponentStore::new(),
            bus: TriggerBus::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            rules,
            catalog,
            notifications: Vec::new(),
        }
    }

    /// Default rules and an empty catalog
    pub fn with_seed(seed: u64) -> Self {
        Self::new(RulesConfig::default(), TemplateCatalog::new(), seed)
    }

    pub fn rules(&self) -> &RulesConfig {
        &self.rules
    }

    pub fn catalog(&self) -> &TemplateCatalog {
        &self.catalog
    }

    pub fn catalog_mut(&mut self) -> &mut TemplateCatalog {
        &mut self.catalog
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn bus(&self) -> &TriggerBus {
        &self.bus
    }

    pub fn is_live(&self, entity: EntityId) -> bool {
        self.registry.contains(entity)
    }

    /// Required component access: absence is a content error
    pub fn get<T: Component>(&self, entity: EntityId) -> Result<&T> {
        if !self.registry.contains(entity) {
            return Err(CoreError::UnknownEntity(entity));
        }
        self.components.get::<T>(entity).ok_or(CoreError::MissingComponent {
            entity,
            component: T::KIND,
        })
    }

    /// Optional component access
    pub fn try_get<T: Component>(&self, entity: EntityId) -> Option<&T> {
        if !self.registry.contains(entity) {
            return None;
        }
        self.components.get::<T>(entity)
    }

    pub fn has<T: Component>(&self, entity: EntityId) -> bool {
        self.try_get::<T>(entity).is_some()
    }

    pub(crate) fn get_mut<T: Component>(&mut self, entity: EntityId) -> Result<&mut T> {
        if !self.registry.contains(entity) {
            return Err(CoreError::UnknownEntity(entity));
        }
        self.components.get_mut::<T>(entity).ok_or(CoreError::MissingComponent {
            entity,
            component: T::KIND,
        })
    }

    /// The player an item is held by or an effect is hosted on.
    /// A player owns itself.
    pub fn owner_of(&self, entity: EntityId) -> Option<EntityId> {
        if let Some(data) = self.try_get::<ItemData>(entity) {
            return Some(data.owner);
        }
        if let Some(data) = self.try_get::<EffectData>(entity) {
            return Some(data.owner);
        }
        match self.registry.category(entity) {
            Some(crate::types::Category::Player) => Some(entity),
            _ => None,
        }
    }

    pub(crate) fn notify(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }

    /// Notifications raised since the last drain, oldest first
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    pub fn pending_notifications(&self) -> &[Notification] {
        &self.notifications
    }

    /// Succeeds with probability `chance`. Certain outcomes draw nothing
    /// from the random stream.
    pub(crate) fn roll(&mut self, chance: f64) -> bool {
        if chance <= 0.0 {
            return false;
        }
        if chance >= 1.0 {
            return true;
        }
        self.rng.gen::<f64>() < chance
    }

    pub(crate) fn roll_index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }
}

impl std::fmt::Debug for World {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("World")
            .field("entities", &self.registry.len())
            .field("pending_notifications", &self.notifications.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::Wearable;
    use crate::stats::Stats;

    #[test]
    fn test_required_and_optional_access() {
        let mut world = World::with_seed(1);
        let player = world.spawn_player("Alice").unwrap();

        assert!(world.get::<Stats>(player).is_ok());
        assert!(matches!(
            world.get::<Wearable>(player),
            Err(CoreError::MissingComponent { .. })
        ));
        assert!(world.try_get::<Wearable>(player).is_none());
        assert!(matches!(
            world.get::<Stats>(EntityId(999)),
            Err(CoreError::UnknownEntity(_))
        ));
    }

    #[test]
    fn test_roll_extremes_draw_nothing() {
        let mut a = World::with_seed(3);
        let mut b = World::with_seed(3);

        assert!(!a.roll(0.0));
        assert!(a.roll(1.0));
        assert_eq!(a.roll(0.5), b.roll(0.5));
    }

    #[test]
    fn test_same_seed_same_rolls() {
        let mut a = World::with_seed(42);
        let mut b = World::with_seed(42);
        let left: Vec<bool> = (0..32).map(|_| a.roll(0.3)).collect();
        let right: Vec<bool> = (0..32).map(|_| b.roll(0.3)).collect();
        assert_eq!(left, right);
    }

    #[test]
    fn test_player_owns_itself() {
        let mut world = World::with_seed(1);
        let player = world.spawn_player("Alice").unwrap();
        assert_eq!(world.owner_of(player), Some(player));
        assert_eq!(world.owner_of(EntityId(77)), None);
    }
}
