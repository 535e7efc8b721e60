//! Armor-set completion tracking

use super::ArmorSets;
use crate::capability::ArmorSetPiece;
use crate::entity::EntityId;
use crate::error::Result;
use crate::notify::Notification;
use crate::trigger::{EventDetail, Trigger, TriggerEvent};
use crate::world::World;
use std::collections::BTreeMap;
use tracing::debug;

impl World {
    /// Equipped pieces of `owner` grouped by set tag, lowest id first
    fn equipped_pieces(&self, owner: EntityId) -> BTreeMap<String, Vec<EntityId>> {
        let mut pieces: BTreeMap<String, Vec<EntityId>> = BTreeMap::new();
        for item in self.equipped_items(owner) {
            if let Some(piece) = self.try_get::<ArmorSetPiece>(item) {
                pieces.entry(piece.set.clone()).or_default().push(item);
            }
        }
        for group in pieces.values_mut() {
            group.sort();
        }
        pieces
    }

    /// Bring the owner's active sets in line with what is equipped.
    ///
    /// Edge-triggered: a set fires completed when its count reaches the
    /// threshold and broken when it falls below, never while it stays on
    /// one side. When the anchor piece comes off a set that is still
    /// complete, the bonus moves to the lowest remaining piece without a
    /// completed/broken notification.
    pub(crate) fn refresh_sets(&mut self, owner: EntityId) -> Result<()> {
        if !self.is_live(owner) {
            return Ok(());
        }
        // a set needs at least one piece
        let size = self.rules().limits.armor_set_size.max(1);
        let pieces = self.equipped_pieces(owner);
        let active: Vec<(String, EntityId)> = {
            let sets = self.get::<ArmorSets>(owner)?;
            sets.active()
                .filter_map(|set| sets.anchor(set).map(|anchor| (set.to_string(), anchor)))
                .collect()
        };

        for (set, anchor) in &active {
            let worn = pieces.get(set).map(Vec::as_slice).unwrap_or(&[]);
            if worn.len() >= size {
                if let Some(&first) = worn.first().filter(|_| !worn.contains(anchor)) {
                    self.move_anchor(owner, set, *anchor, first)?;
                }
                continue;
            }
            self.get_mut::<ArmorSets>(owner)?.deactivate(set);
            debug!(%owner, set = %set, "armor set broken");
            self.notify(Notification::ArmorSetBroken {
                owner,
                set: set.clone(),
            });
            self.publish_set(Trigger::OnArmorSetBroken, *anchor, owner, set)?;
        }

        for (set, worn) in &pieces {
            if worn.len() < size || active.iter().any(|(s, _)| s == set) {
                continue;
            }
            let Some(&anchor) = worn.first() else {
                continue;
            };
            self.get_mut::<ArmorSets>(owner)?.activate(set, anchor);
            debug!(%owner, set = %set, %anchor, "armor set completed");
            self.notify(Notification::ArmorSetCompleted {
                owner,
                set: set.clone(),
            });
            self.publish_set(Trigger::OnArmorSetCompleted, anchor, owner, set)?;
        }
        Ok(())
    }

    fn move_anchor(&mut self, owner: EntityId, set: &str, from: EntityId, to: EntityId) -> Result<()> {
        self.get_mut::<ArmorSets>(owner)?.activate(set, to);
        debug!(%owner, set, %from, %to, "armor set anchor moved");
        self.publish_set(Trigger::OnArmorSetBroken, from, owner, set)?;
        self.publish_set(Trigger::OnArmorSetCompleted, to, owner, set)
    }

    fn publish_set(&mut self, kind: Trigger, piece: EntityId, owner: EntityId, set: &str) -> Result<()> {
        let event = TriggerEvent::new(kind, piece)
            .with_target(Some(owner))
            .with_detail(EventDetail::ArmorSet(set.to_string()));
        self.publish(event)
    }

    /// Whether `set` is currently complete on `player`
    pub fn set_active(&self, player: EntityId, set: &str) -> bool {
        self.try_get::<ArmorSets>(player).is_some_and(|sets| sets.is_active(set))
    }
}
