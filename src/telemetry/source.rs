use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

use super::{errors::SourceError, event::TelemetryEvent, models::MatchMeta};

/// Upstream provider of accounts, match metadata and raw telemetry.
///
/// The remote API client (rate limiting, retries, payload caching) lives
/// outside this crate; everything here only depends on this contract.
#[async_trait]
pub trait MatchSource: Send + Sync {
    async fn find_account_id(&self, nickname: &str) -> Result<String, SourceError>;

    /// Most recent matches first, at most `count`.
    async fn fetch_recent_matches(
        &self,
        account_id: &str,
        count: usize,
    ) -> Result<Vec<MatchMeta>, SourceError>;

    async fn fetch_telemetry(&self, meta: &MatchMeta) -> Result<Vec<TelemetryEvent>, SourceError>;

    async fn fetch_leaderboard_account_ids(
        &self,
        mode: &str,
        size: usize,
    ) -> Result<Vec<String>, SourceError>;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Catalog {
    #[serde(default)]
    players: Vec<CatalogPlayer>,
    #[serde(default)]
    matches: Vec<MatchMeta>,
    #[serde(default)]
    leaderboards: HashMap<String, Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CatalogPlayer {
    nickname: String,
    account_id: String,
    #[serde(default)]
    match_ids: Vec<String>,
}

/// Match source backed by data held in memory, optionally loaded from a
/// JSON catalog on disk. Used for offline runs and tests.
///
/// Telemetry registered directly is served from memory; otherwise the
/// match's telemetry reference is read as a file relative to the catalog.
#[derive(Debug, Default)]
pub struct InMemoryMatchSource {
    accounts_by_nickname: HashMap<String, String>,
    matches_by_account: HashMap<String, Vec<String>>,
    matches: HashMap<String, MatchMeta>,
    telemetry: HashMap<String, Vec<TelemetryEvent>>,
    leaderboards: HashMap<String, Vec<String>>,
    base_dir: Option<PathBuf>,
}

impl InMemoryMatchSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_player(mut self, nickname: &str, account_id: &str) -> Self {
        self.accounts_by_nickname
            .insert(nickname.to_string(), account_id.to_string());
        self.matches_by_account
            .entry(account_id.to_string())
            .or_default();
        self
    }

    /// Registers a match for an account. Recent-match queries return matches
    /// in registration order.
    pub fn with_match(
        mut self,
        account_id: &str,
        meta: MatchMeta,
        events: Vec<TelemetryEvent>,
    ) -> Self {
        self.matches_by_account
            .entry(account_id.to_string())
            .or_default()
            .push(meta.match_id.clone());
        self.telemetry
            .insert(meta.telemetry_reference.clone(), events);
        self.matches.insert(meta.match_id.clone(), meta);
        self
    }

    /// Registers a match whose telemetry cannot be fetched.
    pub fn with_missing_telemetry(mut self, account_id: &str, meta: MatchMeta) -> Self {
        self.matches_by_account
            .entry(account_id.to_string())
            .or_default()
            .push(meta.match_id.clone());
        self.matches.insert(meta.match_id.clone(), meta);
        self
    }

    pub fn with_leaderboard(mut self, mode: &str, account_ids: Vec<String>) -> Self {
        self.leaderboards.insert(mode.to_string(), account_ids);
        self
    }

    /// Loads a catalog file. Telemetry references resolve against the
    /// catalog's directory and are read lazily on fetch.
    #[instrument]
    pub async fn from_catalog_file(path: &Path) -> Result<Self, SourceError> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| SourceError::Catalog(format!("{}: {}", path.display(), e)))?;
        let catalog: Catalog =
            serde_json::from_str(&raw).map_err(|e| SourceError::Catalog(e.to_string()))?;

        let mut source = Self {
            base_dir: path.parent().map(Path::to_path_buf),
            leaderboards: catalog.leaderboards,
            ..Self::default()
        };
        for meta in catalog.matches {
            source.matches.insert(meta.match_id.clone(), meta);
        }
        for player in catalog.players {
            source
                .accounts_by_nickname
                .insert(player.nickname, player.account_id.clone());
            source
                .matches_by_account
                .insert(player.account_id, player.match_ids);
        }

        info!(
            players = source.accounts_by_nickname.len(),
            matches = source.matches.len(),
            "Loaded match catalog"
        );
        Ok(source)
    }

    async fn read_telemetry_file(
        &self,
        base_dir: &Path,
        reference: &str,
    ) -> Result<Vec<TelemetryEvent>, SourceError> {
        let telemetry_error = |reason: String| SourceError::Telemetry {
            reference: reference.to_string(),
            reason,
        };
        let raw = tokio::fs::read_to_string(base_dir.join(reference))
            .await
            .map_err(|e| telemetry_error(e.to_string()))?;
        serde_json::from_str(&raw).map_err(|e| telemetry_error(e.to_string()))
    }
}

#[async_trait]
impl MatchSource for InMemoryMatchSource {
    #[instrument(skip(self))]
    async fn find_account_id(&self, nickname: &str) -> Result<String, SourceError> {
        self.accounts_by_nickname
            .get(nickname)
            .cloned()
            .ok_or_else(|| SourceError::PlayerNotFound(nickname.to_string()))
    }

    #[instrument(skip(self))]
    async fn fetch_recent_matches(
        &self,
        account_id: &str,
        count: usize,
    ) -> Result<Vec<MatchMeta>, SourceError> {
        let match_ids = self
            .matches_by_account
            .get(account_id)
            .ok_or_else(|| SourceError::AccountNotFound(account_id.to_string()))?;

        let metas = match_ids
            .iter()
            .take(count)
            .map(|match_id| {
                self.matches
                    .get(match_id)
                    .cloned()
                    .ok_or_else(|| SourceError::MatchNotFound(match_id.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!(account_id = %account_id, found = metas.len(), "Resolved recent matches");
        Ok(metas)
    }

    #[instrument(skip(self, meta), fields(match_id = %meta.match_id))]
    async fn fetch_telemetry(&self, meta: &MatchMeta) -> Result<Vec<TelemetryEvent>, SourceError> {
        if let Some(events) = self.telemetry.get(&meta.telemetry_reference) {
            return Ok(events.clone());
        }
        match &self.base_dir {
            Some(base_dir) => {
                self.read_telemetry_file(base_dir, &meta.telemetry_reference)
                    .await
            }
            None => Err(SourceError::Telemetry {
                reference: meta.telemetry_reference.clone(),
                reason: "telemetry not available".to_string(),
            }),
        }
    }

    #[instrument(skip(self))]
    async fn fetch_leaderboard_account_ids(
        &self,
        mode: &str,
        size: usize,
    ) -> Result<Vec<String>, SourceError> {
        match self.leaderboards.get(mode) {
            Some(accounts) => Ok(accounts.iter().take(size).cloned().collect()),
            None => {
                warn!(mode = %mode, "No leaderboard registered for mode");
                Ok(Vec::new())
            }
        }
    }
}
