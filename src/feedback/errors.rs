use thiserror::Error;

use crate::features::MetricCategory;
use crate::shared::RepositoryError;

#[derive(Debug, Error)]
pub enum FeedbackError {
    #[error("No cached features for account {0}, run ingest first")]
    ProfileNotFound(String),

    #[error("No metrics found for {0}")]
    NoMetrics(MetricCategory),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
