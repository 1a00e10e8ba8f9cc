use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkRequest {
    /// Leaderboard game mode, e.g. `squad`.
    pub mode: String,
    #[serde(default)]
    pub leaderboard_size: Option<u32>,
    #[serde(default)]
    pub sample_per_player: Option<u32>,
}
