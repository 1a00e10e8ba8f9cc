pub mod engine;
pub mod extractors;
pub mod models;
pub mod phases;
pub mod timeline;

pub use engine::FeatureEngine;
pub use models::*;
pub use phases::extract_phases;
pub use timeline::build_timeline;

use crate::telemetry::{MatchMeta, TelemetryEvent};

/// Fixed windows and sizes used during extraction.
pub mod thresholds {
    /// Max gap between consecutive events of one engagement.
    pub const CLUSTER_WINDOW_SECS: f64 = 10.0;
    /// Max attacker displacement between consecutive events of one engagement.
    pub const CLUSTER_RADIUS_M: f64 = 40.0;
    /// A down converts when the kill lands within this many seconds.
    pub const DOWN_TO_KILL_WINDOW_SECS: f64 = 10.0;
    /// A grenade hit chains when a down follows within this many seconds.
    pub const GRENADE_TO_DOWN_WINDOW_SECS: f64 = 10.0;
    /// Combat actions this close to a throw count as grenade-prepared pushes.
    pub const PRE_PUSH_WINDOW_SECS: f64 = 3.0;
    /// Rates are expressed per this many seconds survived.
    pub const NORMALIZATION_UNIT_SECS: f64 = 600.0;
    pub const FALLBACK_PHASE_COUNT: i64 = 8;
    pub const FALLBACK_PHASE_RADIUS: f64 = 1000.0;
}

/// Everything an extractor may read about one match.
pub struct MatchContext<'a> {
    pub account_id: &'a str,
    pub meta: &'a MatchMeta,
    pub events: &'a [TelemetryEvent],
    pub timeline: &'a [PlayerSnapshot],
    pub phases: &'a [PhaseInfo],
}

/// Computes one category of metrics for a single match.
pub trait MetricExtractor: Send + Sync {
    fn category(&self) -> MetricCategory;

    fn extract(&self, context: &MatchContext<'_>) -> MetricMap;
}

/// `base` shifted by whole seconds, or `None` when the offset leaves chrono's range.
pub(crate) fn offset_by_secs(
    base: chrono::DateTime<chrono::Utc>,
    secs: i64,
) -> Option<chrono::DateTime<chrono::Utc>> {
    chrono::Duration::try_seconds(secs).and_then(|delta| base.checked_add_signed(delta))
}

pub(crate) fn seconds_between(from: chrono::DateTime<chrono::Utc>, to: chrono::DateTime<chrono::Utc>) -> f64 {
    (to - from).num_milliseconds() as f64 / 1000.0
}
