use super::super::{
    offset_by_secs, seconds_between, MatchContext, MetricCategory, MetricExtractor, MetricMap, PhaseInfo,
    PlayerSnapshot,
};
use crate::math::{clamp, distance, mean};

/// Per-phase positioning: how fast the player gets inside the zone, where
/// they sit relative to its centre, and how they move while it shrinks.
///
/// Phases without any snapshot in their window emit no keys.
pub struct PhaseMetricsExtractor;

impl Default for PhaseMetricsExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PhaseMetricsExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl MetricExtractor for PhaseMetricsExtractor {
    fn category(&self) -> MetricCategory {
        MetricCategory::Phase
    }

    fn extract(&self, context: &MatchContext<'_>) -> MetricMap {
        compute_phase_metrics(
            context.timeline,
            context.phases,
            context.meta.duration_seconds,
        )
    }
}

pub fn compute_phase_metrics(
    timeline: &[PlayerSnapshot],
    phases: &[PhaseInfo],
    match_duration_secs: i64,
) -> MetricMap {
    let mut metrics = MetricMap::new();
    let tail_secs = match_duration_secs / (phases.len().max(1) as i64);

    for (i, phase) in phases.iter().enumerate() {
        let start = phase.timestamp;
        let end = phases
            .get(i + 1)
            .map(|next| next.timestamp)
            .or_else(|| offset_by_secs(start, tail_secs))
            .unwrap_or(start);

        let in_window: Vec<PlayerSnapshot> = timeline
            .iter()
            .filter(|snap| snap.timestamp >= start && snap.timestamp < end)
            .copied()
            .collect();
        if in_window.is_empty() {
            continue;
        }

        let radius = phase.effective_radius();
        let to_center = |snap: &PlayerSnapshot| distance(snap.x, snap.y, phase.center_x, phase.center_y);
        let window_secs = seconds_between(start, end);

        let enter_delay = in_window
            .iter()
            .find(|&snap| to_center(snap) <= radius)
            .map(|snap| seconds_between(start, snap.timestamp))
            .unwrap_or(window_secs);

        let ratios: Vec<f64> = in_window.iter().map(|snap| to_center(snap) / radius).collect();
        let center_bias = clamp(mean(&ratios), 0.0, 2.0);

        let mut rotation_distance = 0.0;
        let mut blue_exposure = 0.0;
        let mut entered_with_vehicle: Option<bool> = None;
        for pair in in_window.windows(2) {
            let (prev, cur) = (&pair[0], &pair[1]);
            rotation_distance += distance(prev.x, prev.y, cur.x, cur.y);

            let prev_outside = to_center(prev) > radius;
            if prev_outside {
                blue_exposure += seconds_between(prev.timestamp, cur.timestamp);
                if entered_with_vehicle.is_none() && to_center(cur) <= radius {
                    entered_with_vehicle = Some(cur.in_vehicle);
                }
            }
        }

        let avg_speed = if window_secs > 0.0 {
            rotation_distance / window_secs
        } else {
            0.0
        };

        let prefix = format!("phase{}.", phase.phase_index);
        let mut put = |name: &str, value: f64| {
            metrics.insert(format!("{prefix}{name}"), value);
        };
        put("enter_delay_s", enter_delay);
        put("center_bias", center_bias);
        put("rotation_distance_m", rotation_distance);
        put("avg_speed_mps", avg_speed);
        put(
            "entered_with_vehicle",
            if entered_with_vehicle.unwrap_or(false) { 1.0 } else { 0.0 },
        );
        put("blue_exposure_s_phase", blue_exposure);
    }

    metrics
}
