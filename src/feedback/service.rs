use std::sync::Arc;
use strum::IntoEnumIterator;
use tracing::{debug, info, instrument};

use super::{
    errors::FeedbackError,
    narrative::{build_narrative, card_message},
    scorer::score,
    types::{FeedbackCard, PlayerFeedback},
};
use crate::benchmark::repository::DistributionRepository;
use crate::features::MetricCategory;
use crate::ingest::repository::ProfileRepository;

/// Scores a stored profile against the reference distributions.
pub struct FeedbackService {
    profiles: Arc<dyn ProfileRepository>,
    distributions: Arc<dyn DistributionRepository>,
}

impl FeedbackService {
    pub fn new(
        profiles: Arc<dyn ProfileRepository>,
        distributions: Arc<dyn DistributionRepository>,
    ) -> Self {
        Self {
            profiles,
            distributions,
        }
    }

    /// One card per category, taken from the first metric key of that
    /// category in key order, ranked by percentile.
    #[instrument(skip(self))]
    pub async fn build_feedback(&self, account_id: &str) -> Result<PlayerFeedback, FeedbackError> {
        let profile = self
            .profiles
            .get(account_id)
            .await?
            .ok_or_else(|| FeedbackError::ProfileNotFound(account_id.to_string()))?;

        let mut cards = Vec::with_capacity(3);
        for category in MetricCategory::iter() {
            let (metric_key, value) = profile
                .metrics(category)
                .iter()
                .next()
                .ok_or(FeedbackError::NoMetrics(category))?;
            cards.push(self.score_card(category, metric_key, *value).await?);
        }

        cards.sort_by(|a, b| b.percentile.total_cmp(&a.percentile));
        let narrative = build_narrative(&cards);

        info!(account_id = %account_id, cards = cards.len(), "Feedback built");
        Ok(PlayerFeedback {
            account_id: account_id.to_string(),
            cards,
            narrative,
        })
    }

    async fn score_card(
        &self,
        category: MetricCategory,
        metric_key: &str,
        value: f64,
    ) -> Result<FeedbackCard, FeedbackError> {
        let distribution = self.distributions.find_by_key(metric_key).await?;
        let score = score(value, distribution.as_ref());
        debug!(
            metric_key = %metric_key,
            benchmarked = distribution.is_some(),
            percentile = score.percentile,
            "Scored metric"
        );

        Ok(FeedbackCard {
            category,
            metric_key: metric_key.to_string(),
            value,
            percentile: score.percentile,
            z_score: score.z_score,
            message: card_message(category, metric_key, score.percentile),
        })
    }
}
