//! Base + modifier stat records

use crate::config::StatEntry;
use crate::types::StatKind;
use std::collections::BTreeMap;

/// One named stat: effective value is `floor(base * modifier)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stat {
    pub base: i64,
    /// Multiplicative modifier, always positive
    pub modifier: f64,
}

impl Stat {
    pub fn new(base: i64) -> Self {
        Stat { base, modifier: 1.0 }
    }

    pub fn value(&self) -> i64 {
        (self.base as f64 * self.modifier).floor() as i64
    }
}

/// Fixed registry of a player's stats
///
/// The set of stats is decided at assembly. Changes only ever touch the
/// base or modifier of a stat that already exists.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stats {
    values: BTreeMap<StatKind, Stat>,
}

impl Stats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: &[StatEntry]) -> Self {
        let mut stats = Stats::new();
        for entry in entries {
            stats.values.insert(entry.stat, Stat::new(entry.base));
        }
        stats
    }

    pub fn with(mut self, stat: StatKind, base: i64) -> Self {
        self.values.insert(stat, Stat::new(base));
        self
    }

    pub fn get(&self, stat: StatKind) -> Option<&Stat> {
        self.values.get(&stat)
    }

    pub fn value(&self, stat: StatKind) -> Option<i64> {
        self.values.get(&stat).map(Stat::value)
    }

    pub fn contains(&self, stat: StatKind) -> bool {
        self.values.contains_key(&stat)
    }

    pub fn kinds(&self) -> impl Iterator<Item = StatKind> + '_ {
        self.values.keys().copied()
    }

    /// Add to the base. Returns the (old, new) effective values.
    pub fn increase_base(&mut self, stat: StatKind, delta: i64) -> Option<(i64, i64)> {
        let entry = self.values.get_mut(&stat)?;
        let old = entry.value();
        entry.base += delta;
        Some((old, entry.value()))
    }

    /// Multiply the modifier by `factor`. Returns the (old, new) effective values.
    pub fn increase_modifier(&mut self, stat: StatKind, factor: f64) -> Option<(i64, i64)> {
        let entry = self.values.get_mut(&stat)?;
        let old = entry.value();
        entry.modifier *= factor;
        Some((old, entry.value()))
    }

    /// Divide the modifier by `factor`, undoing [`Stats::increase_modifier`]
    pub fn reduce_modifier(&mut self, stat: StatKind, factor: f64) -> Option<(i64, i64)> {
        let entry = self.values.get_mut(&stat)?;
        let old = entry.value();
        entry.modifier /= factor;
        Some((old, entry.value()))
    }
}
