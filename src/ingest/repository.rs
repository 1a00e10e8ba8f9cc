use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use crate::features::FeatureAggregate;
use crate::shared::RepositoryError;

/// Per-account profile store. A `put` replaces the whole profile.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn put(&self, account_id: &str, profile: FeatureAggregate) -> Result<(), RepositoryError>;
    async fn get(&self, account_id: &str) -> Result<Option<FeatureAggregate>, RepositoryError>;
}

/// In-memory implementation of ProfileRepository
///
/// Profiles are process-local and lost on restart.
pub struct InMemoryProfileRepository {
    profiles: RwLock<HashMap<String, FeatureAggregate>>,
}

impl Default for InMemoryProfileRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryProfileRepository {
    pub fn new() -> Self {
        Self {
            profiles: RwLock::new(HashMap::new()),
        }
    }

    pub async fn profile_count(&self) -> usize {
        self.profiles.read().await.len()
    }
}

#[async_trait]
impl ProfileRepository for InMemoryProfileRepository {
    #[instrument(skip(self, profile))]
    async fn put(&self, account_id: &str, profile: FeatureAggregate) -> Result<(), RepositoryError> {
        let mut profiles = self.profiles.write().await;
        profiles.insert(account_id.to_string(), profile);
        debug!(account_id = %account_id, total_profiles = profiles.len(), "Stored profile");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get(&self, account_id: &str) -> Result<Option<FeatureAggregate>, RepositoryError> {
        let profile = self.profiles.read().await.get(account_id).cloned();
        debug!(account_id = %account_id, found = profile.is_some(), "Looked up profile");
        Ok(profile)
    }
}
