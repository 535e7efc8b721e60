//! Ordered entity assembly

use super::{Component, EntityId};
use crate::config::ComponentSpec;
use crate::error::Result;
use crate::world::World;

/// Assembles one entity, component by component, in a fixed order.
///
/// Category admission is checked as each component is attached.
/// Dependencies and trigger support are checked by [`EntityBuilder::finish`],
/// which then wires subscriptions in attachment order and announces the
/// entity. A builder dropped before `finish` succeeds discards the entity.
pub struct EntityBuilder<'w> {
    world: &'w mut World,
    entity: EntityId,
    finished: bool,
}

impl<'w> EntityBuilder<'w> {
    pub(crate) fn new(world: &'w mut World, entity: EntityId) -> Self {
        EntityBuilder {
            world,
            entity,
            finished: false,
        }
    }

    pub fn id(&self) -> EntityId {
        self.entity
    }

    pub fn with<T: Component>(self, component: T) -> Result<Self> {
        self.world.attach(self.entity, component)?;
        Ok(self)
    }

    /// Attach a component described by a catalog entry
    pub fn with_spec(self, spec: ComponentSpec) -> Result<Self> {
        match spec {
            ComponentSpec::Usable(c) => self.with(c),
            ComponentSpec::Wearable(c) => self.with(c),
            ComponentSpec::ArmorSetPiece(c) => self.with(c),
            ComponentSpec::DealsDamage(c) => self.with(c),
            ComponentSpec::DealsHealing(c) => self.with(c),
            ComponentSpec::ModifiesStats(c) => self.with(c),
            ComponentSpec::ModifiesEffects(c) => self.with(c),
        }
    }

    pub fn finish(mut self) -> Result<EntityId> {
        self.world.complete(self.entity)?;
        self.finished = true;
        self.world.announce(self.entity)?;
        Ok(self.entity)
    }
}

impl Drop for EntityBuilder<'_> {
    fn drop(&mut self) {
        if !self.finished {
            self.world.discard(self.entity);
        }
    }
}
