use tracing::debug;

use super::models::PlayerSnapshot;
use crate::telemetry::TelemetryEvent;

/// Ordered position snapshots of `account_id`, taken from every event whose
/// `character` block belongs to the subject and carries a location.
pub fn build_timeline(account_id: &str, events: &[TelemetryEvent]) -> Vec<PlayerSnapshot> {
    let mut snapshots: Vec<PlayerSnapshot> = events
        .iter()
        .filter_map(|event| {
            let character = event.character()?;
            if !character.is(account_id) {
                return None;
            }
            let (x, y) = character.position(0.0)?;
            Some(PlayerSnapshot {
                timestamp: event.timestamp(),
                x,
                y,
                in_vehicle: character.is_in_vehicle(),
            })
        })
        .collect();

    snapshots.sort_by_key(|snapshot| snapshot.timestamp);
    debug!(account_id = %account_id, snapshots = snapshots.len(), "Built player timeline");
    snapshots
}
