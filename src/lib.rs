// Library crate for the coachlens feedback server
// This file exposes the public API for the binary and integration tests

pub mod benchmark;
pub mod config;
pub mod features;
pub mod feedback;
pub mod ingest;
pub mod math;
pub mod shared;
pub mod telemetry;

use axum::{
    routing::{get, post},
    Router,
};

// Re-export commonly used types for easier access in tests
pub use benchmark::{repository::DistributionRepository, MetricDistribution};
pub use config::AppConfig;
pub use features::{FeatureAggregate, FeatureEngine, MetricCategory};
pub use feedback::{FeedbackCard, PlayerFeedback};
pub use ingest::repository::ProfileRepository;
pub use shared::{AppError, AppState};
pub use telemetry::{InMemoryMatchSource, MatchMeta, MatchSource, TelemetryEvent};

/// All HTTP routes, without middleware.
pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/v1/ingest", post(ingest::ingest))
        .route("/v1/players/:account_id/profile", get(ingest::get_profile))
        .route("/v1/players/:account_id/feedback", get(feedback::get_feedback))
        .route("/v1/benchmarks", get(benchmark::list_benchmarks))
        .route("/v1/benchmarks/refresh", post(benchmark::refresh_benchmarks))
        .with_state(app_state)
}
