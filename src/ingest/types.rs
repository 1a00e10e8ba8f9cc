use serde::{Deserialize, Serialize};

use crate::features::FeatureAggregate;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestRequest {
    pub nickname: String,
    /// Falls back to the configured default when absent.
    #[serde(default)]
    pub match_count: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestResponse {
    pub account_id: String,
    /// Processed matches, in ingestion order.
    pub match_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub account_id: String,
    pub features: FeatureAggregate,
}
