//! Entity registry - identity and lifetime of every live entity
//!
//! An entity is only an identity. Its behaviour comes entirely from the
//! components attached to it (see [`ComponentStore`]).

mod builder;
mod component;

pub use builder::EntityBuilder;
pub use component::{Component, ComponentKind, ComponentStore};

use crate::types::Category;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Handle to an entity. Non-owning; may outlive the entity it names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Immutable identity of an entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: EntityId,
    pub category: Category,
    /// Template or type name (e.g. "iron_helm", "poison", "player")
    pub type_tag: String,
    pub display_name: String,
}

/// Owns every live entity identity and the two global counters
#[derive(Debug, Clone, Default)]
pub struct Registry {
    next_instance: u64,
    next_turn_order: u64,
    entities: BTreeMap<EntityId, Identity>,
    by_category: BTreeMap<Category, BTreeSet<EntityId>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new entity and return its handle
    pub fn create(&mut self, category: Category, type_tag: &str, display_name: &str) -> EntityId {
        self.next_instance += 1;
        let id = EntityId(self.next_instance);
        self.entities.insert(
            id,
            Identity {
                id,
                category,
                type_tag: type_tag.to_string(),
                display_name: display_name.to_string(),
            },
        );
        self.by_category.entry(category).or_default().insert(id);
        id
    }

    /// Evict an entity from every index. Returns `None` if it was not live.
    pub fn remove(&mut self, id: EntityId) -> Option<Identity> {
        let identity = self.entities.remove(&id)?;
        if let Some(ids) = self.by_category.get_mut(&identity.category) {
            ids.remove(&id);
        }
        Some(identity)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    pub fn identity(&self, id: EntityId) -> Option<&Identity> {
        self.entities.get(&id)
    }

    pub fn category(&self, id: EntityId) -> Option<Category> {
        self.entities.get(&id).map(|i| i.category)
    }

    /// Live entities of a category in creation order
    pub fn of_category(&self, category: Category) -> impl Iterator<Item = EntityId> + '_ {
        self.by_category
            .get(&category)
            .into_iter()
            .flat_map(|ids| ids.iter().copied())
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Next value of the monotonic turn-order counter
    pub fn next_turn_order(&mut self) -> u64 {
        self.next_turn_order += 1;
        self.next_turn_order
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_assigns_unique_ids() {
        let mut registry = Registry::new();
        let a = registry.create(Category::Player, "player", "Alice");
        let b = registry.create(Category::Item, "potion", "Potion");

        assert_ne!(a, b);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.category(b), Some(Category::Item));
        assert_eq!(registry.identity(a).unwrap().display_name, "Alice");
    }

    #[test]
    fn test_remove_evicts_from_category_index() {
        let mut registry = Registry::new();
        let a = registry.create(Category::Player, "player", "Alice");
        let b = registry.create(Category::Player, "player", "Bob");

        assert!(registry.remove(a).is_some());
        assert_eq!(registry.of_category(Category::Player).collect::<Vec<_>>(), vec![b]);
        assert!(!registry.contains(a));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut registry = Registry::new();
        let a = registry.create(Category::Effect, "poison", "Poison");

        assert!(registry.remove(a).is_some());
        assert!(registry.remove(a).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_ids_are_never_reused() {
        let mut registry = Registry::new();
        let a = registry.create(Category::Item, "potion", "Potion");
        registry.remove(a);
        let b = registry.create(Category::Item, "potion", "Potion");
        assert!(b > a);
    }

    #[test]
    fn test_turn_order_is_monotonic() {
        let mut registry = Registry::new();
        let first = registry.next_turn_order();
        let second = registry.next_turn_order();
        assert!(second > first);
    }
}
