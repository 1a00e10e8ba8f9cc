use chrono::Utc;
use futures::future::try_join_all;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use super::{
    distribution::{build_distribution, bucket_metrics},
    errors::BenchmarkError,
    models::MetricDistribution,
    repository::DistributionRepository,
    types::BenchmarkRequest,
};
use crate::config::limits;
use crate::features::{FeatureAggregate, FeatureEngine};
use crate::telemetry::{MatchSource, SourceError};

/// Rebuilds reference distributions from a leaderboard sample.
pub struct BenchmarkService {
    source: Arc<dyn MatchSource>,
    engine: Arc<FeatureEngine>,
    repository: Arc<dyn DistributionRepository>,
    default_leaderboard_size: u32,
    default_sample_per_player: u32,
}

impl BenchmarkService {
    pub fn new(
        source: Arc<dyn MatchSource>,
        engine: Arc<FeatureEngine>,
        repository: Arc<dyn DistributionRepository>,
    ) -> Self {
        Self {
            source,
            engine,
            repository,
            default_leaderboard_size: limits::DEFAULT_LEADERBOARD_SIZE,
            default_sample_per_player: limits::DEFAULT_SAMPLE_PER_PLAYER,
        }
    }

    pub fn with_defaults(mut self, leaderboard_size: u32, sample_per_player: u32) -> Self {
        self.default_leaderboard_size = leaderboard_size;
        self.default_sample_per_player = sample_per_player;
        self
    }

    /// Samples every leaderboard account, then upserts one distribution per
    /// observed metric key. Nothing is written if any fetch fails.
    #[instrument(skip(self, request), fields(mode = %request.mode))]
    pub async fn refresh(
        &self,
        request: BenchmarkRequest,
    ) -> Result<Vec<MetricDistribution>, BenchmarkError> {
        let mode = request.mode.trim();
        if mode.is_empty() {
            return Err(BenchmarkError::Validation(
                "mode must not be blank".to_string(),
            ));
        }
        let leaderboard_size = within(
            "leaderboard_size",
            request.leaderboard_size.unwrap_or(self.default_leaderboard_size),
            limits::MAX_LEADERBOARD_SIZE,
        )?;
        let sample_per_player = within(
            "sample_per_player",
            request
                .sample_per_player
                .unwrap_or(self.default_sample_per_player),
            limits::MAX_SAMPLE_PER_PLAYER,
        )?;

        let account_ids = self
            .source
            .fetch_leaderboard_account_ids(mode, leaderboard_size as usize)
            .await?;
        info!(accounts = account_ids.len(), "Sampling leaderboard accounts");

        let samples = try_join_all(
            account_ids
                .iter()
                .map(|account_id| self.sample_account(account_id, sample_per_player as usize)),
        )
        .await?;
        let aggregates: Vec<FeatureAggregate> = samples.into_iter().flatten().collect();

        let updated_at = Utc::now();
        let mut distributions = Vec::new();
        for (metric_key, values) in bucket_metrics(&aggregates) {
            let distribution = build_distribution(&metric_key, &values, updated_at);
            self.repository.upsert(&distribution).await?;
            distributions.push(distribution);
        }

        info!(
            matches = aggregates.len(),
            distributions = distributions.len(),
            "Benchmark refresh completed"
        );
        Ok(distributions)
    }

    #[instrument(skip(self))]
    pub async fn list_distributions(&self) -> Result<Vec<MetricDistribution>, BenchmarkError> {
        Ok(self.repository.list_all().await?)
    }

    async fn sample_account(
        &self,
        account_id: &str,
        sample_per_player: usize,
    ) -> Result<Vec<FeatureAggregate>, SourceError> {
        let metas = self
            .source
            .fetch_recent_matches(account_id, sample_per_player)
            .await?;

        let mut aggregates = Vec::with_capacity(metas.len());
        for meta in &metas {
            let events = self.source.fetch_telemetry(meta).await?;
            aggregates.push(self.engine.compute_features(account_id, meta, &events));
        }
        debug!(account_id = %account_id, matches = aggregates.len(), "Sampled account");
        Ok(aggregates)
    }
}

fn within(name: &str, value: u32, max: u32) -> Result<u32, BenchmarkError> {
    if (1..=max).contains(&value) {
        Ok(value)
    } else {
        Err(BenchmarkError::Validation(format!(
            "{name} must be between 1 and {max}, got {value}"
        )))
    }
}
