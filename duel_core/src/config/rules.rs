//! Tunable rules of the simulation

use super::ConfigError;
use crate::types::StatKind;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tunable rules, every field defaulted so a partial file is valid
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RulesConfig {
    #[serde(default)]
    pub scaling: ScalingRules,
    #[serde(default)]
    pub limits: LimitRules,
    #[serde(default)]
    pub player: PlayerDefaults,
}

impl RulesConfig {
    /// Load rules from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let rules: RulesConfig = super::load_toml(path)?;
        rules.validate()?;
        Ok(rules)
    }

    /// Load rules from a TOML string
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let rules: RulesConfig = super::parse_toml(content)?;
        rules.validate()?;
        Ok(rules)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scaling.hyperbolic_constant <= 0.0 {
            return Err(ConfigError::Invalid(
                "scaling.hyperbolic_constant must be positive".to_string(),
            ));
        }
        if self.scaling.linear_divisor <= 0.0 {
            return Err(ConfigError::Invalid(
                "scaling.linear_divisor must be positive".to_string(),
            ));
        }
        if self.limits.armor_set_size == 0 {
            return Err(ConfigError::Invalid(
                "limits.armor_set_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Constants of the two scaling formulas
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScalingRules {
    /// `v / (v + constant)`
    #[serde(default = "default_hundred")]
    pub hyperbolic_constant: f64,
    /// `max(floor, v / divisor)`
    #[serde(default = "default_hundred")]
    pub linear_divisor: f64,
    #[serde(default = "default_floor")]
    pub attack_floor: f64,
    #[serde(default = "default_floor")]
    pub accuracy_floor: f64,
    #[serde(default = "default_floor")]
    pub healing_floor: f64,
    #[serde(default)]
    pub precision_floor: f64,
}

impl Default for ScalingRules {
    fn default() -> Self {
        ScalingRules {
            hyperbolic_constant: 100.0,
            linear_divisor: 100.0,
            attack_floor: 0.1,
            accuracy_floor: 0.1,
            healing_floor: 0.1,
            precision_floor: 0.0,
        }
    }
}

impl ScalingRules {
    /// Diminishing-returns chance: `v / (v + constant)`, never reaching 1.
    /// Negative values count as zero.
    pub fn hyperbolic(&self, value: i64) -> f64 {
        let v = value.max(0) as f64;
        v / (v + self.hyperbolic_constant)
    }

    /// Linear scaling factor with a lower bound: `max(minimum, v / divisor)`
    pub fn linear_clamped(&self, value: i64, minimum: f64) -> f64 {
        (value as f64 / self.linear_divisor).max(minimum)
    }
}

fn default_hundred() -> f64 {
    100.0
}
fn default_floor() -> f64 {
    0.1
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitRules {
    /// Equipped pieces sharing a tag needed to complete a set
    #[serde(default = "default_set_size")]
    pub armor_set_size: usize,
    /// Nested trigger publications allowed before the chain is aborted
    #[serde(default = "default_trigger_depth")]
    pub max_trigger_depth: usize,
    /// Commands a prompt-driven turn may issue before it is ended
    #[serde(default = "default_actions_per_turn")]
    pub max_actions_per_turn: usize,
}

impl Default for LimitRules {
    fn default() -> Self {
        LimitRules {
            armor_set_size: default_set_size(),
            max_trigger_depth: default_trigger_depth(),
            max_actions_per_turn: default_actions_per_turn(),
        }
    }
}

fn default_set_size() -> usize {
    3
}
fn default_trigger_depth() -> usize {
    64
}
fn default_actions_per_turn() -> usize {
    16
}

/// One entry of the initial stat registry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatEntry {
    pub stat: StatKind,
    pub base: i64,
}

impl StatEntry {
    pub fn new(stat: StatKind, base: i64) -> Self {
        StatEntry { stat, base }
    }
}

/// Initial stat registry of every spawned player.
///
/// `stats` lists overrides: any stat it leaves out keeps its default base,
/// so a player always carries every stat the turn subsystems read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerDefaults {
    #[serde(default = "default_player_stats")]
    pub stats: Vec<StatEntry>,
}

impl PlayerDefaults {
    /// Full stat table: defaults, then `stats` applied on top in order
    pub fn stat_table(&self) -> Vec<StatEntry> {
        let mut table = default_player_stats();
        for entry in &self.stats {
            match table.iter_mut().find(|e| e.stat == entry.stat) {
                Some(existing) => existing.base = entry.base,
                None => table.push(*entry),
            }
        }
        table
    }
}

impl Default for PlayerDefaults {
    fn default() -> Self {
        PlayerDefaults {
            stats: default_player_stats(),
        }
    }
}

fn default_player_stats() -> Vec<StatEntry> {
    vec![
        StatEntry::new(StatKind::MaximumHealth, 100),
        StatEntry::new(StatKind::MaximumStamina, 10),
        StatEntry::new(StatKind::Attack, 100),
        StatEntry::new(StatKind::Accuracy, 100),
        StatEntry::new(StatKind::Healing, 100),
        StatEntry::new(StatKind::Dodge, 0),
        StatEntry::new(StatKind::Critical, 0),
        StatEntry::new(StatKind::Precision, 50),
        StatEntry::new(StatKind::Armor, 0),
        StatEntry::new(StatKind::Shield, 0),
        StatEntry::new(StatKind::Peer, 0),
        StatEntry::new(StatKind::Luck, 0),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rules() {
        let rules = RulesConfig::default();
        assert!((rules.scaling.hyperbolic_constant - 100.0).abs() < f64::EPSILON);
        assert_eq!(rules.limits.armor_set_size, 3);
        assert_eq!(rules.player.stats.len(), StatKind::all().len());
    }

    #[test]
    fn test_parse_partial_rules() {
        let toml = r#"
[scaling]
attack_floor = 0.25

[limits]
armor_set_size = 4

[[player.stats]]
stat = "maximum_health"
base = 250
"#;

        let rules = RulesConfig::parse(toml).unwrap();
        assert!((rules.scaling.attack_floor - 0.25).abs() < f64::EPSILON);
        assert!((rules.scaling.linear_divisor - 100.0).abs() < f64::EPSILON);
        assert_eq!(rules.limits.armor_set_size, 4);
        assert_eq!(rules.limits.max_trigger_depth, 64);
        assert_eq!(rules.player.stats, vec![StatEntry::new(StatKind::MaximumHealth, 250)]);

        let table = rules.player.stat_table();
        assert_eq!(table.len(), StatKind::all().len());
        assert!(table.contains(&StatEntry::new(StatKind::MaximumHealth, 250)));
        assert!(table.contains(&StatEntry::new(StatKind::MaximumStamina, 10)));
    }

    #[test]
    fn test_invalid_rules_rejected() {
        let toml = r#"
[scaling]
hyperbolic_constant = 0
"#;
        assert!(matches!(
            RulesConfig::parse(toml),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_hyperbolic_never_reaches_one() {
        let scaling = ScalingRules::default();
        assert!((scaling.hyperbolic(0) - 0.0).abs() < f64::EPSILON);
        assert!((scaling.hyperbolic(100) - 0.5).abs() < f64::EPSILON);
        assert!(scaling.hyperbolic(1_000_000_000) < 1.0);
        assert!((scaling.hyperbolic(-50) - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_linear_clamped_floor() {
        let scaling = ScalingRules::default();
        assert!((scaling.linear_clamped(100, 0.1) - 1.0).abs() < f64::EPSILON);
        assert!((scaling.linear_clamped(250, 0.1) - 2.5).abs() < f64::EPSILON);
        assert!((scaling.linear_clamped(0, 0.1) - 0.1).abs() < f64::EPSILON);
        assert!((scaling.linear_clamped(-40, 0.1) - 0.1).abs() < f64::EPSILON);
    }
}
