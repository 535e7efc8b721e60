//! Typed component storage
//!
//! Every component type gets its own column keyed by [`EntityId`]. The
//! store also remembers the order in which components were attached to each
//! entity, since subscription wiring follows assembly order.

use super::EntityId;
use crate::capability::{
    ArmorSetPiece, DealsDamage, DealsHealing, EffectData, EffectDuration, ItemData, ModifiesEffects, ModifiesStats,
    Usable, Wearable,
};
use crate::equipment::ArmorSets;
use crate::scheduler::TurnTaker;
use crate::stats::{Resources, Stats};
use crate::types::Category;
use std::collections::HashMap;

/// A record that can be attached to an entity
pub trait Component: Clone + 'static {
    const KIND: ComponentKind;

    /// Whether an entity of `category` may carry this component
    fn admits(category: Category) -> bool {
        Self::KIND.admits(category)
    }

    fn column(store: &ComponentStore) -> &HashMap<EntityId, Self>;

    fn column_mut(store: &mut ComponentStore) -> &mut HashMap<EntityId, Self>;
}

macro_rules! components {
    ($($kind:ident => $ty:ty, $field:ident, [$($category:ident),+];)+) => {
        /// Closed set of component kinds
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum ComponentKind {
            $($kind,)+
        }

        impl ComponentKind {
            /// Whether an entity of `category` may carry this kind
            pub fn admits(self, category: Category) -> bool {
                match self {
                    $(ComponentKind::$kind => matches!(category, $(Category::$category)|+),)+
                }
            }
        }

        /// Component columns of every live entity
        #[derive(Debug, Clone, Default)]
        pub struct ComponentStore {
            $($field: HashMap<EntityId, $ty>,)+
            order: HashMap<EntityId, Vec<ComponentKind>>,
        }

        $(
            impl Component for $ty {
                const KIND: ComponentKind = ComponentKind::$kind;

                fn column(store: &ComponentStore) -> &HashMap<EntityId, Self> {
                    &store.$field
                }

                fn column_mut(store: &mut ComponentStore) -> &mut HashMap<EntityId, Self> {
                    &mut store.$field
                }
            }
        )+

        impl ComponentStore {
            fn clear_columns(&mut self, entity: EntityId) {
                $(self.$field.remove(&entity);)+
            }
        }
    };
}

components! {
    Stats => Stats, stats, [Player];
    Resources => Resources, resources, [Player];
    TurnTaker => TurnTaker, turn_takers, [Player];
    ArmorSets => ArmorSets, armor_sets, [Player];
    ItemData => ItemData, item_data, [Item];
    Usable => Usable, usables, [Item];
    Wearable => Wearable, wearables, [Item];
    ArmorSetPiece => ArmorSetPiece, set_pieces, [Item];
    DealsDamage => DealsDamage, deals_damage, [Item, Effect];
    DealsHealing => DealsHealing, deals_healing, [Item, Effect];
    ModifiesStats => ModifiesStats, modifies_stats, [Item, Effect];
    ModifiesEffects => ModifiesEffects, modifies_effects, [Item, Effect];
    EffectData => EffectData, effect_data, [Effect];
    EffectDuration => EffectDuration, durations, [Effect];
}

impl ComponentKind {
    /// Sibling components that must be present once assembly finishes
    pub fn requires(self, category: Category) -> &'static [ComponentKind] {
        match (self, category) {
            (ComponentKind::Usable | ComponentKind::Wearable, _) => &[ComponentKind::ItemData],
            (ComponentKind::ArmorSetPiece, _) => &[ComponentKind::Wearable],
            (ComponentKind::EffectDuration, _) => &[ComponentKind::EffectData],
            (ComponentKind::Resources, _) => &[ComponentKind::Stats],
            (kind, Category::Item) if kind.is_reactive() => &[ComponentKind::ItemData],
            (kind, Category::Effect) if kind.is_reactive() => &[ComponentKind::EffectData],
            _ => &[],
        }
    }

    /// Kinds that declare trigger subscriptions
    pub fn is_reactive(self) -> bool {
        matches!(
            self,
            ComponentKind::DealsDamage
                | ComponentKind::DealsHealing
                | ComponentKind::ModifiesStats
                | ComponentKind::ModifiesEffects
        )
    }
}

impl ComponentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a component. Returns false, leaving the store untouched, if
    /// the entity already has one of this kind.
    pub fn insert<T: Component>(&mut self, entity: EntityId, component: T) -> bool {
        let column = T::column_mut(self);
        if column.contains_key(&entity) {
            return false;
        }
        column.insert(entity, component);
        self.order.entry(entity).or_default().push(T::KIND);
        true
    }

    /// Detach a single component
    pub fn remove<T: Component>(&mut self, entity: EntityId) -> Option<T> {
        let component = T::column_mut(self).remove(&entity)?;
        if let Some(kinds) = self.order.get_mut(&entity) {
            kinds.retain(|kind| *kind != T::KIND);
        }
        Some(component)
    }

    pub fn get<T: Component>(&self, entity: EntityId) -> Option<&T> {
        T::column(self).get(&entity)
    }

    pub fn get_mut<T: Component>(&mut self, entity: EntityId) -> Option<&mut T> {
        T::column_mut(self).get_mut(&entity)
    }

    pub fn has<T: Component>(&self, entity: EntityId) -> bool {
        T::column(self).contains_key(&entity)
    }

    pub fn has_kind(&self, entity: EntityId, kind: ComponentKind) -> bool {
        self.kinds(entity).contains(&kind)
    }

    /// Kinds attached to `entity`, in attachment order
    pub fn kinds(&self, entity: EntityId) -> &[ComponentKind] {
        self.order.get(&entity).map(|kinds| kinds.as_slice()).unwrap_or(&[])
    }

    /// Entities carrying a `T`, in ascending id order
    pub fn entities_with<T: Component>(&self) -> Vec<EntityId> {
        let mut ids: Vec<EntityId> = T::column(self).keys().copied().collect();
        ids.sort();
        ids
    }

    /// Drop every component of `entity`
    pub fn remove_all(&mut self, entity: EntityId) {
        self.clear_columns(entity);
        self.order.remove(&entity);
    }
}
