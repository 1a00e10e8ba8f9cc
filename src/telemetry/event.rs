use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum_macros::{AsRefStr, Display};

/// Type tags that announce a new safe zone.
pub const PHASE_CHANGE_TYPES: [&str; 2] = ["LogPhaseChange", "LogBlueZoneCustom"];
pub const ITEM_THROW_TYPE: &str = "LogItemThrow";

const COMBAT_MARKERS: [&str; 4] = ["Attack", "TakeDamage", "Kill", "Down"];
const DAMAGE_MARKERS: [&str; 2] = ["Attack", "TakeDamage"];

/// The instant substituted for missing or unparseable timestamps.
pub fn epoch() -> DateTime<Utc> {
    DateTime::<Utc>::default()
}

/// Coarse classification of a telemetry record, derived from its `_T` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum EventKind {
    PhaseChange,
    ItemThrow,
    Combat,
    Movement,
    Other,
}

/// One raw telemetry record.
///
/// Telemetry is loosely typed and every field may be missing, so the record
/// keeps the decoded JSON and exposes defensive accessors instead of a fixed
/// schema. Unknown tags are carried as-is and classify as [`EventKind::Other`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TelemetryEvent(Value);

impl TelemetryEvent {
    pub fn new(raw: Value) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> &Value {
        &self.0
    }

    /// The `_T` type tag, if present and a string.
    pub fn event_type(&self) -> Option<&str> {
        self.0.get("_T").and_then(Value::as_str)
    }

    /// The `_D` timestamp. Missing or malformed values map to the Unix epoch.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.0
            .get("_D")
            .and_then(Value::as_str)
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|ts| ts.with_timezone(&Utc))
            .unwrap_or_else(epoch)
    }

    pub fn kind(&self) -> EventKind {
        match self.event_type() {
            Some(t) if PHASE_CHANGE_TYPES.contains(&t) => EventKind::PhaseChange,
            Some(ITEM_THROW_TYPE) => EventKind::ItemThrow,
            Some(t) if COMBAT_MARKERS.iter().any(|m| t.contains(m)) => EventKind::Combat,
            _ if self.character().is_some() => EventKind::Movement,
            _ => EventKind::Other,
        }
    }

    /// True for attack and take-damage records, the subset of combat that carries damage.
    pub fn is_damage(&self) -> bool {
        self.event_type()
            .is_some_and(|t| DAMAGE_MARKERS.iter().any(|m| t.contains(m)))
    }

    pub fn type_contains(&self, marker: &str) -> bool {
        self.event_type().is_some_and(|t| t.contains(marker))
    }

    pub fn character(&self) -> Option<Actor<'_>> {
        self.actor("character")
    }

    pub fn attacker(&self) -> Option<Actor<'_>> {
        self.actor("attacker")
    }

    pub fn victim(&self) -> Option<Actor<'_>> {
        self.actor("victim")
    }

    /// `item.subCategory`, or an empty string.
    pub fn item_sub_category(&self) -> &str {
        self.0
            .get("item")
            .and_then(|item| item.get("subCategory"))
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    pub fn damage_type_category(&self) -> &str {
        self.0
            .get("damageTypeCategory")
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    pub fn field(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn number(&self, key: &str) -> Option<f64> {
        self.0.get(key).and_then(Value::as_f64)
    }

    fn actor(&self, key: &str) -> Option<Actor<'_>> {
        self.0.get(key).and_then(Value::as_object).map(Actor)
    }
}

impl From<Value> for TelemetryEvent {
    fn from(raw: Value) -> Self {
        Self::new(raw)
    }
}

/// Borrowed view over a `character`, `attacker` or `victim` block.
#[derive(Debug, Clone, Copy)]
pub struct Actor<'a>(&'a Map<String, Value>);

impl<'a> Actor<'a> {
    /// Identity used to match the subject: `accountId`, falling back to `name`.
    pub fn account_id(&self) -> Option<&'a str> {
        self.str_field("accountId").or_else(|| self.str_field("name"))
    }

    /// Display identity: `name`, falling back to `accountId`.
    pub fn name(&self) -> Option<&'a str> {
        self.str_field("name").or_else(|| self.str_field("accountId"))
    }

    pub fn is(&self, account_id: &str) -> bool {
        self.account_id() == Some(account_id)
    }

    pub fn has_location(&self) -> bool {
        self.0.get("location").is_some_and(Value::is_object)
    }

    /// `location.{x,y}` with `missing` substituted per absent coordinate.
    /// `None` when the block has no location at all.
    pub fn position(&self, missing: f64) -> Option<(f64, f64)> {
        let location = self.0.get("location")?.as_object()?;
        let coord = |axis: &str| location.get(axis).and_then(Value::as_f64).unwrap_or(missing);
        Some((coord("x"), coord("y")))
    }

    pub fn is_in_vehicle(&self) -> bool {
        self.0
            .get("isInVehicle")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    fn str_field(&self, key: &str) -> Option<&'a str> {
        self.0.get(key).and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_iso_timestamp() {
        let event = TelemetryEvent::new(json!({"_T": "LogPlayerPosition", "_D": "2024-05-01T10:00:05.500Z"}));
        assert_eq!(event.timestamp().timestamp_millis(), 1_714_557_605_500);
    }

    #[test]
    fn malformed_timestamp_falls_back_to_epoch() {
        let bad = TelemetryEvent::new(json!({"_T": "LogPlayerPosition", "_D": "yesterday"}));
        let missing = TelemetryEvent::new(json!({"_T": "LogPlayerPosition"}));
        let numeric = TelemetryEvent::new(json!({"_D": 12345}));

        assert_eq!(bad.timestamp(), epoch());
        assert_eq!(missing.timestamp(), epoch());
        assert_eq!(numeric.timestamp(), epoch());
    }

    #[test]
    fn classifies_known_tags() {
        let kind = |tag: &str| TelemetryEvent::new(json!({"_T": tag})).kind();

        assert_eq!(kind("LogPhaseChange"), EventKind::PhaseChange);
        assert_eq!(kind("LogBlueZoneCustom"), EventKind::PhaseChange);
        assert_eq!(kind("LogItemThrow"), EventKind::ItemThrow);
        assert_eq!(kind("LogPlayerAttack"), EventKind::Combat);
        assert_eq!(kind("LogPlayerTakeDamage"), EventKind::Combat);
        assert_eq!(kind("LogPlayerKillV2"), EventKind::Combat);
        assert_eq!(kind("LogPlayerMakeGroggy"), EventKind::Other);
        assert_eq!(kind("LogMatchStart"), EventKind::Other);
    }

    #[test]
    fn untagged_record_with_character_is_movement() {
        let event = TelemetryEvent::new(json!({"character": {"accountId": "a"}}));
        assert_eq!(event.kind(), EventKind::Movement);
        assert!(!event.is_damage());
    }

    #[test]
    fn actor_identity_prefers_account_id_for_matching() {
        let event = TelemetryEvent::new(json!({
            "character": {"accountId": "account.1", "name": "Nick"},
            "victim": {"name": "Other"}
        }));

        let character = event.character().unwrap();
        assert_eq!(character.account_id(), Some("account.1"));
        assert_eq!(character.name(), Some("Nick"));
        assert!(character.is("account.1"));

        let victim = event.victim().unwrap();
        assert_eq!(victim.account_id(), Some("Other"));
        assert!(event.attacker().is_none());
    }

    #[test]
    fn position_substitutes_missing_axes() {
        let event = TelemetryEvent::new(json!({
            "attacker": {"location": {"x": 10.0}},
            "victim": {"name": "v"}
        }));

        let (x, y) = event.attacker().unwrap().position(f64::NAN).unwrap();
        assert_eq!(x, 10.0);
        assert!(y.is_nan());
        assert!(event.victim().unwrap().position(0.0).is_none());
    }

    #[test]
    fn nested_fields_default_to_empty() {
        let event = TelemetryEvent::new(json!({"_T": "LogItemThrow"}));
        assert_eq!(event.item_sub_category(), "");
        assert_eq!(event.damage_type_category(), "");

        let thrown = TelemetryEvent::new(json!({"item": {"subCategory": "Throwable_Smoke"}}));
        assert_eq!(thrown.item_sub_category(), "Throwable_Smoke");
    }
}
