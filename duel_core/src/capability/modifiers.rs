//! Stat-modifying and effect-modifying capabilities

use super::TargetRule;
use crate::entity::EntityId;
use crate::trigger::Trigger;
use crate::types::{Polarity, ResourceKind, StatKind};
use serde::{Deserialize, Serialize};

/// Additive base delta and multiplicative modifier factor for one stat
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatChange {
    pub stat: StatKind,
    #[serde(default)]
    pub base: i64,
    #[serde(default = "default_factor")]
    pub factor: f64,
}

fn default_factor() -> f64 {
    1.0
}

impl StatChange {
    pub fn base(stat: StatKind, base: i64) -> Self {
        StatChange {
            stat,
            base,
            factor: 1.0,
        }
    }

    pub fn factor(stat: StatKind, factor: f64) -> Self {
        StatChange {
            stat,
            base: 0,
            factor,
        }
    }
}

/// Scales a resource's restore and/or spend multiplier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MultiplierChange {
    pub resource: ResourceKind,
    #[serde(default)]
    pub restore: Option<f64>,
    #[serde(default)]
    pub spend: Option<f64>,
}

/// Changes applied on one set of triggers and undone on another
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatRule {
    pub apply_on: Vec<Trigger>,
    #[serde(default)]
    pub revert_on: Vec<Trigger>,
    #[serde(default)]
    pub target: TargetRule,
    #[serde(default)]
    pub changes: Vec<StatChange>,
    #[serde(default)]
    pub multipliers: Vec<MultiplierChange>,
    /// Targets the rule is currently applied to, most recent last
    #[serde(skip)]
    pub applied: Vec<EntityId>,
}

impl StatRule {
    pub fn new(apply_on: Vec<Trigger>, revert_on: Vec<Trigger>) -> Self {
        StatRule {
            apply_on,
            revert_on,
            target: TargetRule::EventTarget,
            changes: Vec::new(),
            multipliers: Vec::new(),
            applied: Vec::new(),
        }
    }

    pub fn with_change(mut self, change: StatChange) -> Self {
        self.changes.push(change);
        self
    }

    pub fn with_multiplier(mut self, multiplier: MultiplierChange) -> Self {
        self.multipliers.push(multiplier);
        self
    }

    pub fn with_target(mut self, target: TargetRule) -> Self {
        self.target = target;
        self
    }

    /// Factors must be positive so that every application can be undone
    pub fn invalid_factor(&self) -> Option<f64> {
        self.changes
            .iter()
            .map(|c| c.factor)
            .chain(self.multipliers.iter().flat_map(|m| m.restore.into_iter().chain(m.spend)))
            .find(|f| *f <= 0.0 || !f.is_finite())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModifiesStats {
    pub rules: Vec<StatRule>,
}

/// What an effect rule does to its target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EffectAction {
    Apply { effect: String },
    Cure { effect: String },
    CureAll { polarity: Polarity },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectRule {
    pub triggers: Vec<Trigger>,
    #[serde(default)]
    pub target: TargetRule,
    pub action: EffectAction,
}

impl EffectRule {
    pub fn new(triggers: Vec<Trigger>, action: EffectAction) -> Self {
        EffectRule {
            triggers,
            target: TargetRule::EventTarget,
            action,
        }
    }

    pub fn with_target(mut self, target: TargetRule) -> Self {
        self.target = target;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModifiesEffects {
    pub rules: Vec<EffectRule>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_factor_detection() {
        let good = StatRule::new(vec![Trigger::OnUse], vec![])
            .with_change(StatChange::factor(StatKind::Attack, 1.5));
        assert_eq!(good.invalid_factor(), None);

        let zero = StatRule::new(vec![Trigger::OnUse], vec![])
            .with_change(StatChange::factor(StatKind::Attack, 0.0));
        assert_eq!(zero.invalid_factor(), Some(0.0));

        let negative_spend = StatRule::new(vec![Trigger::OnAdded], vec![Trigger::OnRemoved]).with_multiplier(
            MultiplierChange {
                resource: ResourceKind::Health,
                restore: None,
                spend: Some(-1.0),
            },
        );
        assert_eq!(negative_spend.invalid_factor(), Some(-1.0));
    }

    #[test]
    fn test_parse_effect_rule() {
        let toml = r#"
triggers = ["on_hit"]
target = "event_target"

[action]
kind = "apply"
effect = "bleed"
"#;
        let rule: EffectRule = toml::from_str(toml).unwrap();
        assert_eq!(
            rule.action,
            EffectAction::Apply {
                effect: "bleed".to_string()
            }
        );
    }

    #[test]
    fn test_stat_change_factor_defaults_to_one() {
        let change: StatChange = toml::from_str("stat = \"armor\"\nbase = 5").unwrap();
        assert_eq!(change, StatChange::base(StatKind::Armor, 5));
    }
}
