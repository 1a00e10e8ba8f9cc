use axum::{extract::State, Json};
use std::sync::Arc;
use tracing::{info, instrument};

use super::{models::MetricDistribution, service::BenchmarkService, types::BenchmarkRequest};
use crate::shared::{AppError, AppState};

fn benchmark_service(state: &AppState) -> BenchmarkService {
    BenchmarkService::new(
        Arc::clone(&state.match_source),
        Arc::clone(&state.feature_engine),
        Arc::clone(&state.distribution_repository),
    )
    .with_defaults(state.config.leaderboard_size, state.config.sample_per_player)
}

/// HTTP handler for rebuilding reference distributions
///
/// POST /v1/benchmarks/refresh
#[instrument(name = "refresh_benchmarks", skip(state, request))]
pub async fn refresh_benchmarks(
    State(state): State<AppState>,
    Json(request): Json<BenchmarkRequest>,
) -> Result<Json<Vec<MetricDistribution>>, AppError> {
    info!(mode = %request.mode, "Benchmark refresh requested");

    let distributions = benchmark_service(&state).refresh(request).await?;

    info!(distributions = distributions.len(), "Benchmarks refreshed");
    Ok(Json(distributions))
}

/// GET /v1/benchmarks
#[instrument(name = "list_benchmarks", skip(state))]
pub async fn list_benchmarks(
    State(state): State<AppState>,
) -> Result<Json<Vec<MetricDistribution>>, AppError> {
    let distributions = benchmark_service(&state).list_distributions().await?;
    Ok(Json(distributions))
}
