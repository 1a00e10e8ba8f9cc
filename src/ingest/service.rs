use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

use super::{
    errors::IngestError,
    repository::ProfileRepository,
    types::{IngestRequest, IngestResponse},
};
use crate::config::limits;
use crate::features::{FeatureAggregate, FeatureEngine};
use crate::telemetry::MatchSource;

/// Pulls a player's recent matches, extracts features per match and folds
/// them into the stored profile.
pub struct IngestService {
    source: Arc<dyn MatchSource>,
    engine: Arc<FeatureEngine>,
    repository: Arc<dyn ProfileRepository>,
    default_match_count: u32,
}

impl IngestService {
    pub fn new(
        source: Arc<dyn MatchSource>,
        engine: Arc<FeatureEngine>,
        repository: Arc<dyn ProfileRepository>,
    ) -> Self {
        Self {
            source,
            engine,
            repository,
            default_match_count: limits::DEFAULT_MATCH_COUNT,
        }
    }

    pub fn with_default_match_count(mut self, count: u32) -> Self {
        self.default_match_count = count;
        self
    }

    /// All-or-nothing: if any match fails to fetch, the error is returned and
    /// the stored profile is left untouched.
    #[instrument(skip(self, request), fields(nickname = %request.nickname))]
    pub async fn ingest_recent_matches(
        &self,
        request: IngestRequest,
    ) -> Result<IngestResponse, IngestError> {
        let nickname = request.nickname.trim();
        if nickname.is_empty() {
            return Err(IngestError::Validation(
                "nickname must not be blank".to_string(),
            ));
        }
        let match_count = request.match_count.unwrap_or(self.default_match_count);
        if !(1..=limits::MAX_MATCH_COUNT).contains(&match_count) {
            return Err(IngestError::Validation(format!(
                "match_count must be between 1 and {}, got {}",
                limits::MAX_MATCH_COUNT,
                match_count
            )));
        }

        let account_id = self.source.find_account_id(nickname).await?;
        let metas = self
            .source
            .fetch_recent_matches(&account_id, match_count as usize)
            .await?;
        info!(account_id = %account_id, matches = metas.len(), "Found recent matches");

        let mut profile: Option<FeatureAggregate> = None;
        let mut match_ids = Vec::with_capacity(metas.len());
        for meta in &metas {
            let events = self.source.fetch_telemetry(meta).await.map_err(|e| {
                error!(
                    match_id = %meta.match_id,
                    reference = %meta.telemetry_reference,
                    error = %e,
                    "Telemetry fetch failed, aborting ingest"
                );
                e
            })?;

            let features = self.engine.compute_features(&account_id, meta, &events);
            profile = Some(match profile {
                Some(folded) => folded.merge(&features),
                None => features,
            });
            match_ids.push(meta.match_id.clone());
            debug!(match_id = %meta.match_id, "Processed match");
        }

        match profile {
            Some(profile) => self.repository.put(&account_id, profile).await?,
            None => warn!(account_id = %account_id, "No matches to ingest, profile unchanged"),
        }

        info!(
            account_id = %account_id,
            processed = match_ids.len(),
            "Ingest completed"
        );
        Ok(IngestResponse {
            account_id,
            match_ids,
        })
    }

    #[instrument(skip(self))]
    pub async fn get_profile(
        &self,
        account_id: &str,
    ) -> Result<Option<FeatureAggregate>, IngestError> {
        Ok(self.repository.get(account_id).await?)
    }
}
