use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Reference statistics for one metric over the benchmark population.
/// One row per metric key; a refresh overwrites everything but the key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MetricDistribution {
    pub metric_key: String,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub mean: f64,
    pub std: f64,
    pub updated_at: DateTime<Utc>,
}
