use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

use crate::benchmark::{repository::DistributionRepository, BenchmarkError};
use crate::config::AppConfig;
use crate::features::FeatureEngine;
use crate::feedback::FeedbackError;
use crate::ingest::{repository::ProfileRepository, IngestError};
use crate::telemetry::{MatchSource, SourceError};

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub profile_repository: Arc<dyn ProfileRepository>,
    pub distribution_repository: Arc<dyn DistributionRepository>,
    pub match_source: Arc<dyn MatchSource>,
    pub feature_engine: Arc<FeatureEngine>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(
        profile_repository: Arc<dyn ProfileRepository>,
        distribution_repository: Arc<dyn DistributionRepository>,
        match_source: Arc<dyn MatchSource>,
        config: AppConfig,
    ) -> Self {
        Self {
            profile_repository,
            distribution_repository,
            match_source,
            feature_engine: Arc::new(FeatureEngine::new()),
            config: Arc::new(config),
        }
    }
}

/// Failure of a backing store.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        RepositoryError::Database(err.to_string())
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unprocessable: {0}")]
    Unprocessable(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Unprocessable(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            AppError::Upstream(msg) => (StatusCode::BAD_GATEWAY, msg),
            AppError::DatabaseError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database error: {}", msg),
            ),
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Database(msg) => AppError::DatabaseError(msg),
        }
    }
}

impl From<SourceError> for AppError {
    fn from(err: SourceError) -> Self {
        match err {
            SourceError::PlayerNotFound(_) | SourceError::AccountNotFound(_) => {
                AppError::NotFound(err.to_string())
            }
            other => AppError::Upstream(other.to_string()),
        }
    }
}

impl From<IngestError> for AppError {
    fn from(err: IngestError) -> Self {
        match err {
            IngestError::Validation(msg) => AppError::Validation(msg),
            IngestError::Source(source) => source.into(),
            IngestError::Repository(repo) => repo.into(),
        }
    }
}

impl From<BenchmarkError> for AppError {
    fn from(err: BenchmarkError) -> Self {
        match err {
            BenchmarkError::Validation(msg) => AppError::Validation(msg),
            BenchmarkError::Source(source) => source.into(),
            BenchmarkError::Repository(repo) => repo.into(),
        }
    }
}

impl From<FeedbackError> for AppError {
    fn from(err: FeedbackError) -> Self {
        match err {
            FeedbackError::ProfileNotFound(_) => AppError::NotFound(err.to_string()),
            FeedbackError::NoMetrics(_) => AppError::Unprocessable(err.to_string()),
            FeedbackError::Repository(repo) => repo.into(),
        }
    }
}
