//! Item and effect template catalog

use super::ConfigError;
use crate::capability::{
    ArmorSetPiece, DealsDamage, DealsHealing, EffectAction, ModifiesEffects, ModifiesStats, Usable, Wearable,
};
use crate::entity::ComponentKind;
use crate::types::{ItemKind, Polarity, Rarity, Stacking, Visibility};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// One capability of a template, in assembly order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ComponentSpec {
    Usable(Usable),
    Wearable(Wearable),
    ArmorSetPiece(ArmorSetPiece),
    DealsDamage(DealsDamage),
    DealsHealing(DealsHealing),
    ModifiesStats(ModifiesStats),
    ModifiesEffects(ModifiesEffects),
}

impl ComponentSpec {
    pub fn kind(&self) -> ComponentKind {
        match self {
            ComponentSpec::Usable(_) => ComponentKind::Usable,
            ComponentSpec::Wearable(_) => ComponentKind::Wearable,
            ComponentSpec::ArmorSetPiece(_) => ComponentKind::ArmorSetPiece,
            ComponentSpec::DealsDamage(_) => ComponentKind::DealsDamage,
            ComponentSpec::DealsHealing(_) => ComponentKind::DealsHealing,
            ComponentSpec::ModifiesStats(_) => ComponentKind::ModifiesStats,
            ComponentSpec::ModifiesEffects(_) => ComponentKind::ModifiesEffects,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemTemplate {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub rarity: Rarity,
    pub kind: ItemKind,
    #[serde(default)]
    pub components: Vec<ComponentSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectTemplate {
    pub id: String,
    pub name: String,
    pub polarity: Polarity,
    #[serde(default)]
    pub visibility: Visibility,
    pub stacking: Stacking,
    #[serde(default = "default_max_stacks")]
    pub max_stacks: u32,
    /// Turns of the host; permanent until cured when absent
    #[serde(default)]
    pub duration: Option<u32>,
    #[serde(default)]
    pub components: Vec<ComponentSpec>,
}

fn default_max_stacks() -> u32 {
    1
}

/// On-disk shape of a catalog file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    items: Vec<ItemTemplate>,
    #[serde(default)]
    effects: Vec<EffectTemplate>,
    #[serde(default)]
    drop_table: Vec<String>,
}

/// Named templates the world instantiates entities from
#[derive(Debug, Clone, Default)]
pub struct TemplateCatalog {
    items: HashMap<String, ItemTemplate>,
    effects: HashMap<String, EffectTemplate>,
    drop_table: Vec<String>,
}

impl TemplateCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an item template, replacing any with the same id
    pub fn register_item(&mut self, template: ItemTemplate) {
        self.items.insert(template.id.clone(), template);
    }

    /// Register an effect template, replacing any with the same id
    pub fn register_effect(&mut self, template: EffectTemplate) {
        self.effects.insert(template.id.clone(), template);
    }

    /// Add an item template id to the luck drop table
    pub fn add_drop(&mut self, item_id: &str) {
        self.drop_table.push(item_id.to_string());
    }

    pub fn item(&self, id: &str) -> Option<&ItemTemplate> {
        self.items.get(id)
    }

    pub fn effect(&self, id: &str) -> Option<&EffectTemplate> {
        self.effects.get(id)
    }

    pub fn drop_table(&self) -> &[String] {
        &self.drop_table
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn effect_count(&self) -> usize {
        self.effects.len()
    }

    /// Check cross references and numeric ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        for template in self.items.values() {
            self.validate_components(&template.id, &template.components)?;
        }
        for template in self.effects.values() {
            if template.max_stacks == 0 {
                return Err(invalid(&template.id, "max_stacks must be at least 1"));
            }
            if template.duration == Some(0) {
                return Err(invalid(&template.id, "duration must be at least 1 turn"));
            }
            self.validate_components(&template.id, &template.components)?;
        }
        for id in &self.drop_table {
            if !self.items.contains_key(id) {
                return Err(ConfigError::Invalid(format!(
                    "drop table names unknown item template '{}'",
                    id
                )));
            }
        }
        Ok(())
    }

    fn validate_components(&self, template: &str, components: &[ComponentSpec]) -> Result<(), ConfigError> {
        for spec in components {
            match spec {
                ComponentSpec::ModifiesStats(modifies) => {
                    for rule in &modifies.rules {
                        if let Some(factor) = rule.invalid_factor() {
                            return Err(invalid(template, &format!("factor {} must be positive", factor)));
                        }
                    }
                }
                ComponentSpec::ModifiesEffects(modifies) => {
                    for rule in &modifies.rules {
                        let effect = match &rule.action {
                            EffectAction::Apply { effect } | EffectAction::Cure { effect } => effect,
                            EffectAction::CureAll { .. } => continue,
                        };
                        if !self.effects.contains_key(effect) {
                            return Err(invalid(template, &format!("unknown effect template '{}'", effect)));
                        }
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn from_file(file: CatalogFile) -> Result<Self, ConfigError> {
        let mut catalog = TemplateCatalog::new();
        for template in file.items {
            if catalog.items.contains_key(&template.id) {
                return Err(invalid(&template.id, "duplicate item template id"));
            }
            catalog.register_item(template);
        }
        for template in file.effects {
            if catalog.effects.contains_key(&template.id) {
                return Err(invalid(&template.id, "duplicate effect template id"));
            }
            catalog.register_effect(template);
        }
        catalog.drop_table = file.drop_table;
        catalog.validate()?;
        Ok(catalog)
    }
}

fn invalid(template: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid(format!("template '{}': {}", template, reason))
}

/// Load a template catalog from a TOML file
pub fn load_catalog(path: &Path) -> Result<TemplateCatalog, ConfigError> {
    let file: CatalogFile = super::load_toml(path)?;
    TemplateCatalog::from_file(file)
}

/// Load a template catalog from a TOML string
pub fn parse_catalog(content: &str) -> Result<TemplateCatalog, ConfigError> {
    let file: CatalogFile = super::parse_toml(content)?;
    TemplateCatalog::from_file(file)
}

/// The catalog shipped with the crate
pub fn default_catalog() -> Result<TemplateCatalog, ConfigError> {
    parse_catalog(include_str!("../../config/catalog.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::Magnitude;
    use crate::trigger::Trigger;
    use crate::types::{DamageType, EquipSlot, StatKind};

    #[test]
    fn test_parse_catalog() {
        let toml = r#"
drop_table = ["iron_helm"]

[[items]]
id = "iron_helm"
name = "Iron Helm"
kind = "armor"
rarity = "uncommon"

[[items.components]]
type = "wearable"
slot = "head"

[[items.components]]
type = "armor_set_piece"
set = "iron"

[[items.components]]
type = "modifies_stats"

[[items.components.rules]]
apply_on = ["on_equip"]
revert_on = ["on_unequip"]

[[items.components.rules.changes]]
stat = "armor"
base = 10

[[effects]]
id = "poison"
name = "Poison"
polarity = "negative"
stacking = "add_stack"
max_stacks = 5
duration = 3

[[effects.components]]
type = "deals_damage"
triggers = ["on_turn_start"]
damage_type = "true"
target = "owner"

[effects.components.magnitude]
kind = "flat"
value = 4.0
"#;

        let catalog = parse_catalog(toml).unwrap();
        let helm = catalog.item("iron_helm").unwrap();
        assert_eq!(helm.rarity, Rarity::Uncommon);
        assert_eq!(helm.components.len(), 3);
        assert_eq!(helm.components[0], ComponentSpec::Wearable(Wearable::new(EquipSlot::Head)));

        match &helm.components[2] {
            ComponentSpec::ModifiesStats(modifies) => {
                assert_eq!(modifies.rules[0].apply_on, vec![Trigger::OnEquip]);
                assert_eq!(modifies.rules[0].changes[0].stat, StatKind::Armor);
            }
            other => panic!("unexpected component {:?}", other),
        }

        let poison = catalog.effect("poison").unwrap();
        assert_eq!(poison.duration, Some(3));
        assert_eq!(poison.visibility, Visibility::Visible);
        match &poison.components[0] {
            ComponentSpec::DealsDamage(damage) => {
                assert_eq!(damage.damage_type, DamageType::True);
                assert_eq!(damage.magnitude, Magnitude::Flat { value: 4.0 });
            }
            other => panic!("unexpected component {:?}", other),
        }
        assert_eq!(catalog.drop_table(), &["iron_helm".to_string()]);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let toml = r#"
[[items]]
id = "potion"
name = "Potion"
kind = "consumable"

[[items]]
id = "potion"
name = "Other Potion"
kind = "consumable"
"#;
        assert!(matches!(parse_catalog(toml), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_unknown_drop_rejected() {
        let toml = r#"
drop_table = ["missing"]
"#;
        assert!(matches!(parse_catalog(toml), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_non_positive_factor_rejected() {
        let toml = r#"
[[effects]]
id = "weakness"
name = "Weakness"
polarity = "negative"
stacking = "refresh_only"
duration = 2

[[effects.components]]
type = "modifies_stats"

[[effects.components.rules]]
apply_on = ["on_added"]
revert_on = ["on_removed"]

[[effects.components.rules.changes]]
stat = "attack"
factor = 0.0
"#;
        assert!(matches!(parse_catalog(toml), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_unknown_effect_reference_rejected() {
        let toml = r#"
[[items]]
id = "dagger"
name = "Dagger"
kind = "weapon"

[[items.components]]
type = "modifies_effects"

[[items.components.rules]]
triggers = ["on_hit"]

[items.components.rules.action]
kind = "apply"
effect = "bleed"
"#;
        assert!(matches!(parse_catalog(toml), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_default_catalog_loads() {
        let catalog = default_catalog().unwrap();
        assert!(catalog.item_count() > 0);
        assert!(catalog.effect_count() > 0);
        assert!(!catalog.drop_table().is_empty());
    }
}
