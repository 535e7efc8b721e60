//! Applying, ticking and curing effects

use super::EffectOutcome;
use crate::capability::{EffectData, EffectDuration};
use crate::entity::EntityId;
use crate::error::{CoreError, Result};
use crate::notify::Notification;
use crate::types::{Category, Polarity, Stacking};
use crate::world::World;
use tracing::debug;

impl World {
    /// Apply the named effect template to `target`.
    ///
    /// # Arguments
    /// * `name` - Effect template id
    /// * `target` - Player hosting the effect
    ///
    /// # Returns
    /// What happened to the host. An unknown template is an error; a host
    /// that left the world is [`EffectOutcome::TargetGone`].
    pub fn apply_effect(&mut self, name: &str, target: EntityId) -> Result<EffectOutcome> {
        let template = self
            .catalog()
            .effect(name)
            .cloned()
            .ok_or_else(|| CoreError::UnknownTemplate(name.to_string()))?;
        if self.identity(target).map(|i| i.category) != Some(Category::Player) {
            return Ok(EffectOutcome::TargetGone);
        }

        if let Some(existing) = self.effect_on(target, name) {
            return self.reapply(existing);
        }

        let mut data = EffectData::new(&template.id, target, template.polarity, template.stacking);
        data.visibility = template.visibility;
        data.max_stacks = template.max_stacks;

        let mut builder = self.build(Category::Effect, &template.id, &template.name).with(data)?;
        if let Some(turns) = template.duration {
            builder = builder.with(EffectDuration::new(turns))?;
        }
        for spec in template.components {
            builder = builder.with_spec(spec)?;
        }
        let effect = builder.finish()?;

        debug!(%effect, host = %target, name, "effect applied");
        self.notify(Notification::EffectApplied { effect, host: target });
        Ok(EffectOutcome::Applied(effect))
    }

    /// Reapplication of an effect the host already carries
    fn reapply(&mut self, effect: EntityId) -> Result<EffectOutcome> {
        match self.get::<EffectData>(effect)?.stacking {
            Stacking::AddStack => {
                let stacks = self.get_mut::<EffectData>(effect)?.add_stack();
                self.refresh_duration(effect)?;
                self.notify(Notification::EffectStacked { effect, stacks });
                Ok(EffectOutcome::Stacked { effect, stacks })
            }
            Stacking::RefreshOnly => {
                self.refresh_duration(effect)?;
                self.notify(Notification::EffectRefreshed { effect });
                Ok(EffectOutcome::Refreshed(effect))
            }
            Stacking::Ignore => {
                self.notify(Notification::EffectIgnored { effect });
                Ok(EffectOutcome::Ignored(effect))
            }
        }
    }

    fn refresh_duration(&mut self, effect: EntityId) -> Result<()> {
        if self.has::<EffectDuration>(effect) {
            self.get_mut::<EffectDuration>(effect)?.refresh();
        }
        Ok(())
    }

    /// One host turn passed. Runs after the effect's own turn-start
    /// reactions, so an effect acts on the turn it expires.
    pub(crate) fn tick_effect(&mut self, effect: EntityId) -> Result<()> {
        if !self.get_mut::<EffectDuration>(effect)?.tick() {
            return Ok(());
        }
        debug!(%effect, "effect expired");
        self.notify(Notification::EffectExpired { effect });
        self.remove_entity(effect)?;
        Ok(())
    }

    /// The effect named `name` hosted by `player`, if any
    pub fn effect_on(&self, player: EntityId, name: &str) -> Option<EntityId> {
        self.effects_of(player)
            .into_iter()
            .find(|effect| self.try_get::<EffectData>(*effect).is_some_and(|d| d.name == name))
    }

    /// Remove the named effect from `target`. Returns whether one was there.
    pub fn cure_effect(&mut self, name: &str, target: EntityId) -> Result<bool> {
        let Some(effect) = self.effect_on(target, name) else {
            return Ok(false);
        };
        self.cure(effect)?;
        Ok(true)
    }

    /// Remove every effect of `polarity` from `target`, returning how many
    /// were removed
    pub fn cure_all(&mut self, polarity: Polarity, target: EntityId) -> Result<usize> {
        let matching: Vec<EntityId> = self
            .effects_of(target)
            .into_iter()
            .filter(|effect| self.try_get::<EffectData>(*effect).is_some_and(|d| d.polarity == polarity))
            .collect();
        let mut cured = 0;
        for effect in matching {
            // an earlier removal may have cascaded
            if self.is_live(effect) {
                self.cure(effect)?;
                cured += 1;
            }
        }
        Ok(cured)
    }

    fn cure(&mut self, effect: EntityId) -> Result<()> {
        debug!(%effect, "effect cured");
        self.notify(Notification::EffectCured { effect });
        self.remove_entity(effect)?;
        Ok(())
    }
}
