use serde_json::Value;
use tracing::{debug, warn};

use super::{models::PhaseInfo, offset_by_secs, thresholds};
use crate::telemetry::{epoch, EventKind, MatchMeta, TelemetryEvent};

/// Safe-zone phases in time order.
///
/// When the telemetry carries no phase events, evenly spaced synthetic phases
/// centred on the origin are produced instead.
pub fn extract_phases(meta: &MatchMeta, events: &[TelemetryEvent]) -> Vec<PhaseInfo> {
    let mut phases: Vec<PhaseInfo> = events
        .iter()
        .filter(|event| event.kind() == EventKind::PhaseChange)
        .map(phase_from_event)
        .collect();

    if phases.is_empty() {
        debug!(match_id = %meta.match_id, "No phase events in telemetry, synthesizing phases");
        phases = synthetic_phases(meta.duration_seconds);
    }

    phases.sort_by_key(|phase| phase.timestamp);
    phases
}

fn phase_from_event(event: &TelemetryEvent) -> PhaseInfo {
    let center = event
        .field("safeZonePosition")
        .or_else(|| event.field("blueZonePosition"));
    let coord = |axis: &str| {
        center
            .and_then(|c| c.get(axis))
            .and_then(Value::as_f64)
            .unwrap_or(0.0)
    };
    let radius = event
        .number("safeZoneRadius")
        .or_else(|| event.number("radius"))
        .unwrap_or(0.0);

    PhaseInfo {
        phase_index: event
            .field("phase")
            .and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|f| f as i64)))
            .unwrap_or(0),
        timestamp: event.timestamp(),
        center_x: coord("x"),
        center_y: coord("y"),
        radius,
    }
}

fn synthetic_phases(duration_seconds: i64) -> Vec<PhaseInfo> {
    let count = thresholds::FALLBACK_PHASE_COUNT;
    let segment = duration_seconds / count;
    if offset_by_secs(epoch(), segment * (count - 1)).is_none() {
        warn!(duration_seconds, "Match duration out of range, synthetic phases start at epoch");
    }
    (0..count)
        .map(|i| PhaseInfo {
            phase_index: i + 1,
            timestamp: offset_by_secs(epoch(), segment * i).unwrap_or_else(epoch),
            center_x: 0.0,
            center_y: 0.0,
            radius: thresholds::FALLBACK_PHASE_RADIUS,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use serde_json::json;

    fn meta(duration: i64) -> MatchMeta {
        MatchMeta::new("match-1", "telemetry-1", "squad", duration)
    }

    #[test]
    fn reads_phase_events_sorted() {
        let events = vec![
            TelemetryEvent::new(json!({
                "_T": "LogPhaseChange",
                "_D": "2024-05-01T10:05:00Z",
                "phase": 2,
                "safeZonePosition": {"x": 100.0, "y": 200.0},
                "safeZoneRadius": 500.0
            })),
            TelemetryEvent::new(json!({
                "_T": "LogBlueZoneCustom",
                "_D": "2024-05-01T10:01:00Z",
                "phase": 1,
                "blueZonePosition": {"x": 10.0, "y": 20.0},
                "radius": 900.0
            })),
        ];

        let phases = extract_phases(&meta(1200), &events);
        assert_eq!(phases.len(), 2);
        assert_eq!(phases[0].phase_index, 1);
        assert_eq!((phases[0].center_x, phases[0].center_y, phases[0].radius), (10.0, 20.0, 900.0));
        assert_eq!(phases[1].phase_index, 2);
        assert_eq!((phases[1].center_x, phases[1].center_y, phases[1].radius), (100.0, 200.0, 500.0));
    }

    #[test]
    fn missing_phase_fields_take_defaults() {
        let events = vec![TelemetryEvent::new(json!({"_T": "LogPhaseChange"}))];

        let phases = extract_phases(&meta(600), &events);
        assert_eq!(phases.len(), 1);
        assert_eq!(phases[0].phase_index, 0);
        assert_eq!(phases[0].timestamp, epoch());
        assert_eq!((phases[0].center_x, phases[0].center_y, phases[0].radius), (0.0, 0.0, 0.0));
    }

    #[test]
    fn synthesizes_even_phases_without_zone_events() {
        let phases = extract_phases(&meta(1600), &[]);

        assert_eq!(phases.len(), 8);
        for (i, phase) in phases.iter().enumerate() {
            assert_eq!(phase.phase_index, i as i64 + 1);
            assert_eq!(phase.timestamp, epoch() + Duration::seconds(200 * i as i64));
            assert_eq!(phase.radius, 1000.0);
            assert_eq!((phase.center_x, phase.center_y), (0.0, 0.0));
        }
    }

    #[test]
    fn out_of_range_duration_falls_back_to_epoch() {
        let phases = extract_phases(&meta(9_000_000_000_000_000), &[]);

        assert_eq!(phases.len(), 8);
        assert!(phases.iter().all(|phase| phase.timestamp == epoch()));
    }

    #[test]
    fn output_is_sorted_for_out_of_order_input() {
        let events: Vec<TelemetryEvent> = ["10:09:00", "10:01:00", "10:05:00"]
            .iter()
            .map(|t| TelemetryEvent::new(json!({"_T": "LogPhaseChange", "_D": format!("2024-05-01T{t}Z")})))
            .collect();

        let phases = extract_phases(&meta(600), &events);
        assert!(phases.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    }
}
