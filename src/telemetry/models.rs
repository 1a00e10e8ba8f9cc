use serde::{Deserialize, Serialize};

/// Metadata for one match, as handed over by the match source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchMeta {
    pub match_id: String,
    /// Opaque handle the match source resolves to the telemetry payload.
    pub telemetry_reference: String,
    #[serde(default = "default_game_mode")]
    pub game_mode: String,
    #[serde(default)]
    pub duration_seconds: i64,
}

fn default_game_mode() -> String {
    "squad".to_string()
}

impl MatchMeta {
    pub fn new(
        match_id: impl Into<String>,
        telemetry_reference: impl Into<String>,
        game_mode: impl Into<String>,
        duration_seconds: i64,
    ) -> Self {
        Self {
            match_id: match_id.into(),
            telemetry_reference: telemetry_reference.into(),
            game_mode: game_mode.into(),
            duration_seconds,
        }
    }
}
