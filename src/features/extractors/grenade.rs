use chrono::{DateTime, Utc};

use super::super::{
    seconds_between, thresholds, MatchContext, MetricCategory, MetricExtractor, MetricMap,
    PlayerSnapshot,
};
use crate::telemetry::{EventKind, TelemetryEvent};

/// Utility usage: throwable counts per ten minutes survived, how early the
/// first throw comes, and how often throws set up pushes and downs.
pub struct GrenadeMetricsExtractor;

impl Default for GrenadeMetricsExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl GrenadeMetricsExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl MetricExtractor for GrenadeMetricsExtractor {
    fn category(&self) -> MetricCategory {
        MetricCategory::Grenade
    }

    fn extract(&self, context: &MatchContext<'_>) -> MetricMap {
        compute_grenade_metrics(
            context.account_id,
            context.events,
            context.timeline,
            context.meta.duration_seconds,
        )
    }
}

#[derive(Debug, Default)]
struct ThrowCounts {
    frag: u32,
    smoke: u32,
    flash: u32,
    molotov: u32,
}

impl ThrowCounts {
    fn record(&mut self, sub_category: &str) {
        if sub_category.contains("Grenade") {
            self.frag += 1;
        } else if sub_category.contains("Smoke") {
            self.smoke += 1;
        } else if sub_category.contains("Flash") {
            self.flash += 1;
        } else if sub_category.contains("Molotov") {
            self.molotov += 1;
        }
    }
}

pub fn compute_grenade_metrics(
    account_id: &str,
    events: &[TelemetryEvent],
    timeline: &[PlayerSnapshot],
    match_duration_secs: i64,
) -> MetricMap {
    let mut counts = ThrowCounts::default();
    let mut throw_times: Vec<DateTime<Utc>> = Vec::new();
    let mut combat_times: Vec<DateTime<Utc>> = Vec::new();
    let mut grenade_hits = 0usize;
    let mut grenade_to_down = 0usize;

    for event in events {
        if event.kind() == EventKind::ItemThrow {
            if event.character().is_some_and(|c| c.is(account_id)) {
                throw_times.push(event.timestamp());
                counts.record(event.item_sub_category());
            }
            continue;
        }

        if !event.is_damage() {
            continue;
        }
        if event.attacker().is_some_and(|a| a.is(account_id)) {
            combat_times.push(event.timestamp());
        }
        if event
            .damage_type_category()
            .to_lowercase()
            .contains("grenade")
        {
            grenade_hits += 1;
            if down_follows(event.timestamp(), events) {
                grenade_to_down += 1;
            }
        }
    }

    let norm = normalization(match_duration_secs, timeline);

    let first_grenade_delay = match (combat_times.iter().min(), throw_times.iter().min()) {
        (Some(first_combat), Some(first_throw)) => seconds_between(*first_combat, *first_throw),
        _ => 0.0,
    };

    let pre_push = combat_times
        .iter()
        .filter(|combat| {
            throw_times.iter().any(|throw| {
                seconds_between(*throw, **combat).abs() <= thresholds::PRE_PUSH_WINDOW_SECS
            })
        })
        .count();

    let mut metrics = MetricMap::new();
    metrics.insert("frag_per_10m".to_string(), counts.frag as f64 / norm);
    metrics.insert("smoke_per_10m".to_string(), counts.smoke as f64 / norm);
    metrics.insert("flash_per_10m".to_string(), counts.flash as f64 / norm);
    metrics.insert("molotov_per_10m".to_string(), counts.molotov as f64 / norm);
    metrics.insert("first_grenade_delay_s".to_string(), first_grenade_delay);
    metrics.insert(
        "pre_push_grenade_rate".to_string(),
        ratio(pre_push, combat_times.len()),
    );
    metrics.insert(
        "nade_to_down_chain_rate".to_string(),
        ratio(grenade_to_down, grenade_hits),
    );
    metrics
}

/// Survived time in ten-minute units. Falls back to the timeline span when
/// the match duration is unknown, and never returns 0.
fn normalization(match_duration_secs: i64, timeline: &[PlayerSnapshot]) -> f64 {
    let survival_secs = if match_duration_secs > 0 {
        match_duration_secs as f64
    } else {
        match (timeline.first(), timeline.last()) {
            (Some(first), Some(last)) => (last.timestamp - first.timestamp).num_seconds() as f64,
            _ => 1.0,
        }
    };
    let norm = survival_secs / thresholds::NORMALIZATION_UNIT_SECS;
    if norm == 0.0 {
        1.0
    } else {
        norm
    }
}

fn down_follows(hit_time: DateTime<Utc>, events: &[TelemetryEvent]) -> bool {
    events.iter().any(|next| {
        if !next.type_contains("Down") {
            return false;
        }
        let gap = seconds_between(hit_time, next.timestamp());
        (0.0..=thresholds::GRENADE_TO_DOWN_WINDOW_SECS).contains(&gap)
    })
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}
