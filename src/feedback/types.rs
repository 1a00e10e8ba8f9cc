use serde::{Deserialize, Serialize};

use crate::features::MetricCategory;

/// One scored metric with its coaching message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackCard {
    pub category: MetricCategory,
    pub metric_key: String,
    pub value: f64,
    pub percentile: f64,
    pub z_score: f64,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerFeedback {
    pub account_id: String,
    /// Highest percentile first.
    pub cards: Vec<FeedbackCard>,
    pub narrative: String,
}
