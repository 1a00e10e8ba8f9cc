use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt; // for `oneshot`

use coachlens::{
    benchmark::repository::InMemoryDistributionRepository,
    ingest::repository::InMemoryProfileRepository, router, AppConfig, AppState,
    InMemoryMatchSource, MatchMeta, TelemetryEvent,
};

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub struct PipelineSetup {
    pub app: Router,
    pub profiles: Arc<InMemoryProfileRepository>,
    pub distributions: Arc<InMemoryDistributionRepository>,
}

impl PipelineSetup {
    pub async fn post_json(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    pub async fn get_json(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap_or(Value::Null)
        };
        (status, json)
    }
}

pub struct PipelineSetupBuilder {
    source: InMemoryMatchSource,
}

impl PipelineSetupBuilder {
    pub fn new() -> Self {
        Self {
            source: InMemoryMatchSource::new(),
        }
    }

    pub fn with_player(mut self, nickname: &str, account_id: &str) -> Self {
        self.source = self.source.with_player(nickname, account_id);
        self
    }

    pub fn with_match(
        mut self,
        account_id: &str,
        meta: MatchMeta,
        events: Vec<TelemetryEvent>,
    ) -> Self {
        self.source = self.source.with_match(account_id, meta, events);
        self
    }

    pub fn with_missing_telemetry(mut self, account_id: &str, meta: MatchMeta) -> Self {
        self.source = self.source.with_missing_telemetry(account_id, meta);
        self
    }

    pub fn with_leaderboard(mut self, mode: &str, account_ids: Vec<&str>) -> Self {
        self.source = self.source.with_leaderboard(
            mode,
            account_ids.into_iter().map(|s| s.to_string()).collect(),
        );
        self
    }

    pub fn build(self) -> PipelineSetup {
        let profiles = Arc::new(InMemoryProfileRepository::new());
        let distributions = Arc::new(InMemoryDistributionRepository::new());
        let app_state = AppState::new(
            profiles.clone(),
            distributions.clone(),
            Arc::new(self.source),
            AppConfig::default(),
        );

        PipelineSetup {
            app: router(app_state),
            profiles,
            distributions,
        }
    }
}
