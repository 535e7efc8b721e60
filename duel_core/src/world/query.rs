//! Read-only views for the presentation layer

use super::World;
use crate::capability::{EffectData, ItemData};
use crate::entity::{EntityId, Identity};
use crate::scheduler::TurnTaker;
use crate::types::Category;

impl World {
    /// Live players in creation order
    pub fn players(&self) -> Vec<EntityId> {
        self.registry.of_category(Category::Player).collect()
    }

    pub fn items(&self) -> Vec<EntityId> {
        self.registry.of_category(Category::Item).collect()
    }

    pub fn effects(&self) -> Vec<EntityId> {
        self.registry.of_category(Category::Effect).collect()
    }

    /// Items held by `player`, in creation order
    pub fn items_of(&self, player: EntityId) -> Vec<EntityId> {
        self.registry
            .of_category(Category::Item)
            .filter(|item| self.try_get::<ItemData>(*item).is_some_and(|d| d.owner == player))
            .collect()
    }

    /// Effects hosted by `player`, in creation order
    pub fn effects_of(&self, player: EntityId) -> Vec<EntityId> {
        self.registry
            .of_category(Category::Effect)
            .filter(|effect| self.try_get::<EffectData>(*effect).is_some_and(|d| d.owner == player))
            .collect()
    }

    /// Effects on `host` that `viewer` can see
    pub fn visible_effects(&self, viewer: EntityId, host: EntityId) -> Vec<EntityId> {
        self.effects_of(host)
            .into_iter()
            .filter(|effect| self.try_get::<EffectData>(*effect).is_some_and(|d| d.visible_to(viewer)))
            .collect()
    }

    /// Everything owned by `player`: items first, then effects
    pub fn owned_by(&self, player: EntityId) -> Vec<EntityId> {
        let mut owned = self.items_of(player);
        owned.extend(self.effects_of(player));
        owned
    }

    pub fn identity(&self, entity: EntityId) -> Option<&Identity> {
        self.registry.identity(entity)
    }

    pub fn display_name(&self, entity: EntityId) -> Option<&str> {
        self.registry.identity(entity).map(|i| i.display_name.as_str())
    }

    /// Live turn-takers sorted by turn order
    pub fn turn_takers(&self) -> Vec<(u64, EntityId)> {
        let mut takers: Vec<(u64, EntityId)> = self
            .registry
            .of_category(Category::Player)
            .filter_map(|player| self.try_get::<TurnTaker>(player).map(|t| (t.order, player)))
            .collect();
        takers.sort();
        takers
    }
}
