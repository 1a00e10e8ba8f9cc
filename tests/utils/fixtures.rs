use chrono::{DateTime, Duration, Utc};
use serde_json::{json, Value};

use coachlens::{MatchMeta, TelemetryEvent};

// ============================================================================
// Telemetry Fixtures
// ============================================================================

fn match_start() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2024-05-01T10:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

fn at(secs: i64) -> String {
    (match_start() + Duration::seconds(secs)).to_rfc3339()
}

fn actor(account_id: &str, x: f64, y: f64) -> Value {
    json!({"accountId": account_id, "name": account_id, "location": {"x": x, "y": y}})
}

/// Builds one match's telemetry in order of the calls, with times given in
/// seconds from the match start.
pub struct TelemetryBuilder {
    events: Vec<Value>,
}

impl TelemetryBuilder {
    pub fn new() -> Self {
        Self { events: vec![] }
    }

    pub fn phase(mut self, phase: i64, secs: i64, radius: f64) -> Self {
        self.events.push(json!({
            "_T": "LogPhaseChange",
            "_D": at(secs),
            "phase": phase,
            "safeZonePosition": {"x": 0.0, "y": 0.0},
            "safeZoneRadius": radius
        }));
        self
    }

    pub fn position(mut self, account_id: &str, secs: i64, x: f64, y: f64) -> Self {
        self.events.push(json!({
            "_T": "LogPlayerPosition",
            "_D": at(secs),
            "character": actor(account_id, x, y)
        }));
        self
    }

    pub fn throw(mut self, account_id: &str, secs: i64, sub_category: &str) -> Self {
        self.events.push(json!({
            "_T": "LogItemThrow",
            "_D": at(secs),
            "character": actor(account_id, 0.0, 0.0),
            "item": {"subCategory": sub_category}
        }));
        self
    }

    pub fn attack(mut self, attacker: &str, victim: &str, secs: i64) -> Self {
        self.events.push(json!({
            "_T": "LogPlayerAttack",
            "_D": at(secs),
            "attacker": actor(attacker, 0.0, 0.0),
            "victim": actor(victim, 30.0, 40.0),
            "damageTypeCategory": "Damage_Gun"
        }));
        self
    }

    pub fn take_damage(mut self, attacker: &str, victim: &str, secs: i64) -> Self {
        self.events.push(json!({
            "_T": "LogPlayerTakeDamage",
            "_D": at(secs),
            "attacker": actor(attacker, 0.0, 0.0),
            "victim": actor(victim, 30.0, 40.0),
            "damageTypeCategory": "Damage_Gun"
        }));
        self
    }

    pub fn down(mut self, attacker: &str, victim: &str, secs: i64) -> Self {
        self.events.push(json!({
            "_T": "LogPlayerDown",
            "_D": at(secs),
            "attacker": actor(attacker, 0.0, 0.0),
            "victim": actor(victim, 30.0, 40.0)
        }));
        self
    }

    pub fn kill(mut self, attacker: &str, victim: &str, secs: i64) -> Self {
        self.events.push(json!({
            "_T": "LogPlayerKill",
            "_D": at(secs),
            "attacker": actor(attacker, 0.0, 0.0),
            "victim": actor(victim, 30.0, 40.0)
        }));
        self
    }

    pub fn build(self) -> Vec<TelemetryEvent> {
        self.events.into_iter().map(TelemetryEvent::new).collect()
    }
}

/// A ten-minute squad match.
pub fn squad_match(match_id: &str) -> MatchMeta {
    MatchMeta::new(match_id, format!("telemetry/{match_id}.json"), "squad", 600)
}

/// Enters the zone, fights once and throws `frags` grenades.
pub fn full_match(account_id: &str, frags: usize) -> Vec<TelemetryEvent> {
    let mut builder = TelemetryBuilder::new()
        .phase(1, 0, 500.0)
        .position(account_id, 10, 800.0, 0.0)
        .position(account_id, 40, 100.0, 0.0)
        .attack(account_id, "enemy.one", 60)
        .down(account_id, "enemy.one", 62)
        .kill(account_id, "enemy.one", 65);
    for i in 0..frags {
        builder = builder.throw(account_id, 100 + i as i64, "Throwable_Grenade");
    }
    builder.build()
}
