use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use super::models::MetricDistribution;
use crate::shared::RepositoryError;

/// Store of reference distributions keyed by metric name.
#[async_trait]
pub trait DistributionRepository: Send + Sync {
    async fn find_by_key(&self, metric_key: &str)
        -> Result<Option<MetricDistribution>, RepositoryError>;

    /// Creates the row for the key, or overwrites every field of the
    /// existing one. Atomic per key.
    async fn upsert(&self, distribution: &MetricDistribution) -> Result<(), RepositoryError>;

    /// All stored distributions ordered by metric key.
    async fn list_all(&self) -> Result<Vec<MetricDistribution>, RepositoryError>;
}

/// In-memory implementation of DistributionRepository for development and testing
pub struct InMemoryDistributionRepository {
    distributions: RwLock<HashMap<String, MetricDistribution>>,
}

impl Default for InMemoryDistributionRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryDistributionRepository {
    pub fn new() -> Self {
        Self {
            distributions: RwLock::new(HashMap::new()),
        }
    }

    pub async fn distribution_count(&self) -> usize {
        self.distributions.read().await.len()
    }
}

#[async_trait]
impl DistributionRepository for InMemoryDistributionRepository {
    #[instrument(skip(self))]
    async fn find_by_key(
        &self,
        metric_key: &str,
    ) -> Result<Option<MetricDistribution>, RepositoryError> {
        Ok(self.distributions.read().await.get(metric_key).cloned())
    }

    #[instrument(skip(self, distribution), fields(metric_key = %distribution.metric_key))]
    async fn upsert(&self, distribution: &MetricDistribution) -> Result<(), RepositoryError> {
        let mut distributions = self.distributions.write().await;
        let replaced = distributions
            .insert(distribution.metric_key.clone(), distribution.clone())
            .is_some();
        debug!(replaced, "Upserted distribution in memory");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_all(&self) -> Result<Vec<MetricDistribution>, RepositoryError> {
        let mut all: Vec<MetricDistribution> =
            self.distributions.read().await.values().cloned().collect();
        all.sort_by(|a, b| a.metric_key.cmp(&b.metric_key));
        Ok(all)
    }
}

/// PostgreSQL implementation of DistributionRepository
///
/// Expects the `metric_distributions` table from `migrations/`.
pub struct PostgresDistributionRepository {
    pool: PgPool,
}

impl PostgresDistributionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DistributionRepository for PostgresDistributionRepository {
    #[instrument(skip(self))]
    async fn find_by_key(
        &self,
        metric_key: &str,
    ) -> Result<Option<MetricDistribution>, RepositoryError> {
        sqlx::query_as::<_, MetricDistribution>(
            "SELECT metric_key, p25, p50, p75, mean, std, updated_at FROM metric_distributions WHERE metric_key = $1",
        )
        .bind(metric_key)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, metric_key = %metric_key, "Failed to fetch distribution from database");
            RepositoryError::from(e)
        })
    }

    #[instrument(skip(self, distribution), fields(metric_key = %distribution.metric_key))]
    async fn upsert(&self, distribution: &MetricDistribution) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO metric_distributions (metric_key, p25, p50, p75, mean, std, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             ON CONFLICT (metric_key) DO UPDATE SET \
             p25 = EXCLUDED.p25, p50 = EXCLUDED.p50, p75 = EXCLUDED.p75, \
             mean = EXCLUDED.mean, std = EXCLUDED.std, updated_at = EXCLUDED.updated_at",
        )
        .bind(&distribution.metric_key)
        .bind(distribution.p25)
        .bind(distribution.p50)
        .bind(distribution.p75)
        .bind(distribution.mean)
        .bind(distribution.std)
        .bind(distribution.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to upsert distribution in database");
            RepositoryError::from(e)
        })?;

        debug!("Distribution upserted in database");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_all(&self) -> Result<Vec<MetricDistribution>, RepositoryError> {
        sqlx::query_as::<_, MetricDistribution>(
            "SELECT metric_key, p25, p50, p75, mean, std, updated_at FROM metric_distributions ORDER BY metric_key",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to list distributions from database");
            RepositoryError::from(e)
        })
    }
}
