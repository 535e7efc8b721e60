//! Entity assembly: admission, validation, subscription wiring

use super::World;
use crate::capability::{
    DealsDamage, DealsHealing, EffectData, ItemData, ModifiesEffects, ModifiesStats, Reactive,
};
use crate::entity::{Component, ComponentKind, EntityBuilder, EntityId};
use crate::equipment::ArmorSets;
use crate::error::{CoreError, Result};
use crate::notify::Notification;
use crate::scheduler::TurnTaker;
use crate::stats::{Resources, Stats};
use crate::trigger::{Handler, Subscription, Trigger, TriggerEvent, TriggerSupport};
use crate::types::{Category, ResourceKind, StatKind};
use tracing::debug;

impl World {
    /// Start assembling a new entity
    pub fn build(&mut self, category: Category, type_tag: &str, display_name: &str) -> EntityBuilder<'_> {
        let entity = self.registry.create(category, type_tag, display_name);
        EntityBuilder::new(self, entity)
    }

    /// Create a player with the configured stat table, full resources and
    /// the next turn-order number
    pub fn spawn_player(&mut self, name: &str) -> Result<EntityId> {
        let stats = Stats::from_entries(&self.rules.player.stat_table());
        let mut resources = Resources::new();
        for resource in [ResourceKind::Health, ResourceKind::Stamina] {
            if let Some(ceiling) = stats.value(resource.ceiling_stat()) {
                resources = resources.with(resource, ceiling);
            }
        }
        let order = self.registry.next_turn_order();
        self.build(Category::Player, "player", name)
            .with(stats)?
            .with(resources)?
            .with(TurnTaker::new(order))?
            .with(ArmorSets::default())?
            .finish()
    }

    /// Instantiate a catalog item for `owner`
    pub fn instantiate_item(&mut self, template: &str, owner: EntityId) -> Result<EntityId> {
        let template = self
            .catalog
            .item(template)
            .cloned()
            .ok_or_else(|| CoreError::UnknownTemplate(template.to_string()))?;
        let data = ItemData {
            owner,
            rarity: template.rarity,
            kind: template.kind,
        };
        let mut builder = self.build(Category::Item, &template.id, &template.name).with(data)?;
        for spec in template.components {
            builder = builder.with_spec(spec)?;
        }
        builder.finish()
    }

    /// Attach a component to a live, already assembled entity, validating
    /// and wiring it on the spot
    pub fn add_component<T: Component>(&mut self, entity: EntityId, component: T) -> Result<()> {
        let category = self.registry.category(entity).ok_or(CoreError::UnknownEntity(entity))?;
        self.attach(entity, component)?;
        if let Err(err) = self.validate_kind(entity, category, T::KIND) {
            self.components.remove::<T>(entity);
            return Err(err);
        }
        self.wire_kind(entity, T::KIND);
        Ok(())
    }

    pub(crate) fn attach<T: Component>(&mut self, entity: EntityId, component: T) -> Result<()> {
        let category = self.registry.category(entity).ok_or(CoreError::UnknownEntity(entity))?;
        if !T::admits(category) {
            return Err(CoreError::CategoryMismatch {
                entity,
                category,
                component: T::KIND,
            });
        }
        if !self.components.insert(entity, component) {
            return Err(CoreError::DuplicateComponent {
                entity,
                component: T::KIND,
            });
        }
        Ok(())
    }

    /// Validate the finished component set, then wire it
    pub(crate) fn complete(&mut self, entity: EntityId) -> Result<()> {
        let category = self.registry.category(entity).ok_or(CoreError::UnknownEntity(entity))?;
        match category {
            Category::Item => self.require_owner::<ItemData>(entity, |d| d.owner)?,
            Category::Effect => self.require_owner::<EffectData>(entity, |d| d.owner)?,
            Category::Player => {}
        }
        for kind in self.components.kinds(entity).to_vec() {
            self.validate_kind(entity, category, kind)?;
        }
        self.wire(entity, category);
        Ok(())
    }

    pub(crate) fn announce(&mut self, entity: EntityId) -> Result<()> {
        let category = self.registry.category(entity).ok_or(CoreError::UnknownEntity(entity))?;
        debug!(%entity, %category, tag = %self.type_tag(entity), "entity added");
        self.notify(Notification::EntityAdded { entity, category });
        let owner = self.owner_of(entity);
        self.publish(TriggerEvent::new(Trigger::OnAdded, entity).with_target(owner))
    }

    /// Drop a half-built entity without any notification
    pub(crate) fn discard(&mut self, entity: EntityId) {
        self.registry.remove(entity);
        self.bus.unsubscribe_entity(entity);
        self.components.remove_all(entity);
    }

    fn require_owner<T: Component>(&self, entity: EntityId, owner: impl Fn(&T) -> EntityId) -> Result<()> {
        let data = self.components.get::<T>(entity).ok_or(CoreError::MissingComponent {
            entity,
            component: T::KIND,
        })?;
        let owner = owner(data);
        if self.registry.category(owner) != Some(Category::Player) {
            return Err(CoreError::UnknownEntity(owner));
        }
        Ok(())
    }

    fn validate_kind(&self, entity: EntityId, category: Category, kind: ComponentKind) -> Result<()> {
        for requires in kind.requires(category) {
            if !self.components.has_kind(entity, *requires) {
                return Err(CoreError::MissingDependency {
                    entity,
                    component: kind,
                    requires: *requires,
                });
            }
        }

        if kind == ComponentKind::Resources {
            self.validate_ceilings(entity)?;
        }

        for (trigger, _) in self.reactions(entity, kind) {
            match trigger.support(category) {
                TriggerSupport::Always => {}
                TriggerSupport::Requires(requires) => {
                    if !self.components.has_kind(entity, requires) {
                        return Err(CoreError::MissingDependency {
                            entity,
                            component: kind,
                            requires,
                        });
                    }
                }
                TriggerSupport::Unsupported => {
                    return Err(CoreError::UnsupportedTrigger {
                        entity,
                        category,
                        component: kind,
                        trigger,
                    });
                }
            }
        }

        if let (ComponentKind::ModifiesStats, Some(modifies)) =
            (kind, self.components.get::<ModifiesStats>(entity))
        {
            if let Some(factor) = modifies.rules.iter().find_map(|rule| rule.invalid_factor()) {
                return Err(CoreError::InvalidTemplate {
                    template: self.type_tag(entity),
                    reason: format!("factor {} must be positive", factor),
                });
            }
        }
        Ok(())
    }

    fn validate_ceilings(&self, entity: EntityId) -> Result<()> {
        let (Some(resources), Some(stats)) = (
            self.components.get::<Resources>(entity),
            self.components.get::<Stats>(entity),
        ) else {
            return Ok(());
        };
        let missing: Option<StatKind> = resources
            .kinds()
            .map(ResourceKind::ceiling_stat)
            .find(|stat| !stats.contains(*stat));
        match missing {
            Some(stat) => Err(CoreError::UnknownStat { entity, stat }),
            None => Ok(()),
        }
    }

    /// Declared (trigger, handler) pairs of one reactive component
    fn reactions(&self, entity: EntityId, kind: ComponentKind) -> Vec<(Trigger, Handler)> {
        let reactions = match kind {
            ComponentKind::DealsDamage => self.components.get::<DealsDamage>(entity).map(Reactive::subscriptions),
            ComponentKind::DealsHealing => self.components.get::<DealsHealing>(entity).map(Reactive::subscriptions),
            ComponentKind::ModifiesStats => self.components.get::<ModifiesStats>(entity).map(Reactive::subscriptions),
            ComponentKind::ModifiesEffects => {
                self.components.get::<ModifiesEffects>(entity).map(Reactive::subscriptions)
            }
            _ => None,
        };
        reactions.unwrap_or_default()
    }

    /// Subscribe every component in attachment order. The duration tick goes
    /// last so an effect still acts on the turn it expires.
    fn wire(&mut self, entity: EntityId, category: Category) {
        let kinds = self.components.kinds(entity).to_vec();
        for kind in kinds.iter().filter(|k| **k != ComponentKind::EffectDuration) {
            self.wire_kind(entity, *kind);
        }
        if kinds.contains(&ComponentKind::EffectDuration) {
            self.wire_kind(entity, ComponentKind::EffectDuration);
        }
        if category == Category::Player {
            for handler in [Handler::RefillStamina, Handler::PeerRoll, Handler::LuckRoll] {
                self.subscribe(entity, Trigger::OnTurnStart, entity, handler);
            }
        }
    }

    fn wire_kind(&mut self, entity: EntityId, kind: ComponentKind) {
        let owner = self.owner_of(entity).unwrap_or(entity);
        match kind {
            ComponentKind::Resources => {
                self.subscribe(entity, Trigger::OnStatChanged, entity, Handler::TrackCeiling);
            }
            ComponentKind::Wearable => {
                self.subscribe(owner, Trigger::OnTurnStart, entity, Handler::RelayWhileEquipped);
            }
            ComponentKind::EffectDuration => {
                self.subscribe(owner, Trigger::OnTurnStart, entity, Handler::TickDuration);
            }
            _ => {
                for (trigger, handler) in self.reactions(entity, kind) {
                    let publisher = if trigger.is_host_channel() { owner } else { entity };
                    self.subscribe(publisher, trigger, entity, handler);
                }
            }
        }
    }

    /// Deliver `publisher`'s `trigger` events to `subscriber`'s `handler`
    pub(crate) fn subscribe(&mut self, publisher: EntityId, trigger: Trigger, subscriber: EntityId, handler: Handler) {
        self.bus.subscribe(publisher, trigger, Subscription { subscriber, handler });
    }
}
