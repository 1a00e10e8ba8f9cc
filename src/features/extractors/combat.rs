use std::collections::BTreeMap;
use tracing::debug;

use super::super::{
    seconds_between, thresholds, CombatEvent, MatchContext, MetricCategory, MetricExtractor,
    MetricMap,
};
use crate::math::{distance, mean, std_dev};
use crate::telemetry::{EventKind, TelemetryEvent};

/// Engagement quality: groups combat records into engagements and measures
/// how the attackers spread, focus fire and convert downs.
pub struct CombatMetricsExtractor;

impl Default for CombatMetricsExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl CombatMetricsExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl MetricExtractor for CombatMetricsExtractor {
    fn category(&self) -> MetricCategory {
        MetricCategory::Combat
    }

    fn extract(&self, context: &MatchContext<'_>) -> MetricMap {
        let combats = collect_combat_events(context.events);
        let clusters = cluster_combats(combats);
        debug!(
            account_id = %context.account_id,
            clusters = clusters.len(),
            "Clustered combat events"
        );
        compute_combat_metrics(&clusters)
    }
}

/// Combat-tagged records in time order. Records with neither attacker nor
/// victim are self-reported and use their own `character` block as attacker.
pub fn collect_combat_events(events: &[TelemetryEvent]) -> Vec<CombatEvent> {
    let mut combats: Vec<CombatEvent> = events
        .iter()
        .filter(|event| event.kind() == EventKind::Combat)
        .map(|event| {
            let victim = event.victim();
            let attacker = match (event.attacker(), victim) {
                (None, None) => event.character(),
                (attacker, _) => attacker,
            };
            let (attacker_x, attacker_y) = attacker
                .and_then(|a| a.position(f64::NAN))
                .unwrap_or((f64::NAN, f64::NAN));
            let (victim_x, victim_y) = victim
                .and_then(|v| v.position(f64::NAN))
                .unwrap_or((f64::NAN, f64::NAN));

            CombatEvent {
                timestamp: event.timestamp(),
                event_type: event.event_type().unwrap_or_default().to_string(),
                attacker_name: attacker.and_then(|a| a.name()).map(str::to_string),
                victim_name: victim.and_then(|v| v.name()).map(str::to_string),
                attacker_x,
                attacker_y,
                victim_x,
                victim_y,
            }
        })
        .collect();

    combats.sort_by_key(|combat| combat.timestamp);
    combats
}

/// Greedy single-pass clustering of time-ordered events. An event joins the
/// open cluster when it is close to that cluster's last event in both time
/// and attacker position; otherwise it opens a new cluster.
pub fn cluster_combats(events: Vec<CombatEvent>) -> Vec<Vec<CombatEvent>> {
    let mut clusters: Vec<Vec<CombatEvent>> = Vec::new();
    let mut current: Vec<CombatEvent> = Vec::new();

    for event in events {
        let joins = current.last().is_some_and(|last| {
            let dt = seconds_between(last.timestamp, event.timestamp);
            let moved = distance(last.attacker_x, last.attacker_y, event.attacker_x, event.attacker_y);
            dt <= thresholds::CLUSTER_WINDOW_SECS && moved <= thresholds::CLUSTER_RADIUS_M
        });

        if !joins && !current.is_empty() {
            clusters.push(std::mem::take(&mut current));
        }
        current.push(event);
    }

    if !current.is_empty() {
        clusters.push(current);
    }
    clusters
}

pub fn compute_combat_metrics(clusters: &[Vec<CombatEvent>]) -> MetricMap {
    let mut angle_spreads = Vec::new();
    let mut position_spreads = Vec::new();
    let mut simul_rates = Vec::new();
    let mut first_shot_distances = Vec::new();
    let mut downs = 0usize;
    let mut converted_downs = 0usize;

    for cluster in clusters {
        let mut angles = Vec::new();
        let mut attacker_positions = Vec::new();
        let mut victim_hits: BTreeMap<&str, usize> = BTreeMap::new();
        let mut first_hits = Vec::new();

        for (index, event) in cluster.iter().enumerate() {
            if event.has_positions() {
                let dx = event.victim_x - event.attacker_x;
                let dy = event.victim_y - event.attacker_y;
                angles.push(dy.atan2(dx).to_degrees());
                attacker_positions.push((event.attacker_x, event.attacker_y));

                let victim = event.victim_name.as_deref().unwrap_or("unknown");
                let hits = victim_hits.entry(victim).or_insert(0);
                if *hits == 0 {
                    first_hits.push(distance(
                        event.attacker_x,
                        event.attacker_y,
                        event.victim_x,
                        event.victim_y,
                    ));
                }
                *hits += 1;
            }

            if event.is_down() {
                downs += 1;
                if converts_to_kill(event, &cluster[index + 1..]) {
                    converted_downs += 1;
                }
            }
        }

        if !angles.is_empty() {
            angle_spreads.push(std_dev(&angles));
        }
        if !attacker_positions.is_empty() {
            let xs: Vec<f64> = attacker_positions.iter().map(|p| p.0).collect();
            let ys: Vec<f64> = attacker_positions.iter().map(|p| p.1).collect();
            let (cx, cy) = (mean(&xs), mean(&ys));
            let offsets: Vec<f64> = attacker_positions
                .iter()
                .map(|(x, y)| distance(*x, *y, cx, cy))
                .collect();
            position_spreads.push(mean(&offsets));
        }
        if !victim_hits.is_empty() {
            let focused = victim_hits.values().filter(|hits| **hits >= 2).count();
            simul_rates.push(focused as f64 / victim_hits.len() as f64);
        }
        if !first_hits.is_empty() {
            first_shot_distances.push(mean(&first_hits));
        }
    }

    let mut metrics = MetricMap::new();
    metrics.insert("team_angle_var_deg".to_string(), mean(&angle_spreads));
    metrics.insert("team_spread_m".to_string(), mean(&position_spreads));
    metrics.insert("simul_fire_rate".to_string(), mean(&simul_rates));
    metrics.insert("first_shot_distance_m".to_string(), mean(&first_shot_distances));
    metrics.insert(
        "dtk_conv_rate".to_string(),
        if downs == 0 {
            0.0
        } else {
            converted_downs as f64 / downs as f64
        },
    );
    metrics
}

fn converts_to_kill(down: &CombatEvent, later: &[CombatEvent]) -> bool {
    let Some(victim) = down.victim_name.as_deref() else {
        return false;
    };
    later.iter().any(|next| {
        next.is_kill()
            && next.victim_name.as_deref() == Some(victim)
            && seconds_between(down.timestamp, next.timestamp) <= thresholds::DOWN_TO_KILL_WINDOW_SECS
    })
}
