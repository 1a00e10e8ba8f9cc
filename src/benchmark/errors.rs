use thiserror::Error;

use crate::shared::RepositoryError;
use crate::telemetry::SourceError;

#[derive(Debug, Error)]
pub enum BenchmarkError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
