use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// Metric key to value. Ordered so that iteration, and anything picked by
/// "first entry", is deterministic.
pub type MetricMap = BTreeMap<String, f64>;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr, EnumIter, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MetricCategory {
    Phase,
    Combat,
    Grenade,
}

/// Position of the subject player at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerSnapshot {
    pub timestamp: DateTime<Utc>,
    pub x: f64,
    pub y: f64,
    pub in_vehicle: bool,
}

/// One safe-zone step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseInfo {
    pub phase_index: i64,
    pub timestamp: DateTime<Utc>,
    pub center_x: f64,
    pub center_y: f64,
    pub radius: f64,
}

impl PhaseInfo {
    /// Radius usable as a divisor and as a containment threshold.
    pub fn effective_radius(&self) -> f64 {
        if self.radius > 0.0 {
            self.radius
        } else {
            1.0
        }
    }
}

/// A combat-related record flattened for clustering. Missing positions are NaN.
#[derive(Debug, Clone, PartialEq)]
pub struct CombatEvent {
    pub timestamp: DateTime<Utc>,
    pub event_type: String,
    pub attacker_name: Option<String>,
    pub victim_name: Option<String>,
    pub attacker_x: f64,
    pub attacker_y: f64,
    pub victim_x: f64,
    pub victim_y: f64,
}

impl CombatEvent {
    pub fn has_positions(&self) -> bool {
        self.attacker_x.is_finite()
            && self.attacker_y.is_finite()
            && self.victim_x.is_finite()
            && self.victim_y.is_finite()
    }

    pub fn is_down(&self) -> bool {
        self.event_type.contains("Down")
    }

    pub fn is_kill(&self) -> bool {
        self.event_type.contains("Kill")
    }
}

/// Phase, combat and grenade metrics for one match, or folded across matches.
///
/// Immutable: [`FeatureAggregate::merge`] returns a new value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureAggregate {
    phase_metrics: MetricMap,
    combat_metrics: MetricMap,
    grenade_metrics: MetricMap,
}

impl FeatureAggregate {
    pub fn new(phase_metrics: MetricMap, combat_metrics: MetricMap, grenade_metrics: MetricMap) -> Self {
        Self {
            phase_metrics,
            combat_metrics,
            grenade_metrics,
        }
    }

    pub fn phase_metrics(&self) -> &MetricMap {
        &self.phase_metrics
    }

    pub fn combat_metrics(&self) -> &MetricMap {
        &self.combat_metrics
    }

    pub fn grenade_metrics(&self) -> &MetricMap {
        &self.grenade_metrics
    }

    pub fn metrics(&self, category: MetricCategory) -> &MetricMap {
        match category {
            MetricCategory::Phase => &self.phase_metrics,
            MetricCategory::Combat => &self.combat_metrics,
            MetricCategory::Grenade => &self.grenade_metrics,
        }
    }

    /// Every (key, value) pair across the three categories.
    pub fn iter_all(&self) -> impl Iterator<Item = (&String, &f64)> {
        self.phase_metrics
            .iter()
            .chain(self.combat_metrics.iter())
            .chain(self.grenade_metrics.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.phase_metrics.is_empty() && self.combat_metrics.is_empty() && self.grenade_metrics.is_empty()
    }

    /// Folds `other` into a new aggregate. Keys on both sides average, keys on
    /// one side carry over unchanged.
    ///
    /// Applied pairwise per ingested match this weights the newest match at
    /// 50% regardless of history; it is not a running mean over N matches.
    pub fn merge(&self, other: &FeatureAggregate) -> FeatureAggregate {
        FeatureAggregate {
            phase_metrics: average_maps(&self.phase_metrics, &other.phase_metrics),
            combat_metrics: average_maps(&self.combat_metrics, &other.combat_metrics),
            grenade_metrics: average_maps(&self.grenade_metrics, &other.grenade_metrics),
        }
    }
}

fn average_maps(a: &MetricMap, b: &MetricMap) -> MetricMap {
    let mut result = a.clone();
    for (key, value) in b {
        result
            .entry(key.clone())
            .and_modify(|existing| *existing = (*existing + value) / 2.0)
            .or_insert(*value);
    }
    result
}
