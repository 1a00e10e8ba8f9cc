use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;
use tracing::{info, instrument};

use super::{
    service::IngestService,
    types::{IngestRequest, IngestResponse, ProfileResponse},
};
use crate::shared::{AppError, AppState};

fn ingest_service(state: &AppState) -> IngestService {
    IngestService::new(
        Arc::clone(&state.match_source),
        Arc::clone(&state.feature_engine),
        Arc::clone(&state.profile_repository),
    )
    .with_default_match_count(state.config.default_match_count)
}

/// HTTP handler for ingesting a player's recent matches
///
/// POST /v1/ingest
#[instrument(name = "ingest", skip(state, request))]
pub async fn ingest(
    State(state): State<AppState>,
    Json(request): Json<IngestRequest>,
) -> Result<Json<IngestResponse>, AppError> {
    info!(nickname = %request.nickname, match_count = ?request.match_count, "Ingest requested");

    let response = ingest_service(&state).ingest_recent_matches(request).await?;

    info!(
        account_id = %response.account_id,
        matches = response.match_ids.len(),
        "Ingest finished"
    );
    Ok(Json(response))
}

/// HTTP handler returning the stored feature profile
///
/// GET /v1/players/:account_id/profile
#[instrument(name = "get_profile", skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    Path(account_id): Path<String>,
) -> Result<Json<ProfileResponse>, AppError> {
    let features = ingest_service(&state)
        .get_profile(&account_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No profile for account {account_id}")))?;

    Ok(Json(ProfileResponse {
        account_id,
        features,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_utils::AppStateBuilder;
    use crate::telemetry::{InMemoryMatchSource, MatchMeta, TelemetryEvent};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        routing::{get, post},
        Router,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt; // for `oneshot`

    fn app(source: InMemoryMatchSource) -> Router {
        let app_state = AppStateBuilder::new()
            .with_match_source(Arc::new(source))
            .build();

        Router::new()
            .route("/v1/ingest", post(ingest))
            .route("/v1/players/:account_id/profile", get(get_profile))
            .with_state(app_state)
    }

    fn one_match_source() -> InMemoryMatchSource {
        let throw = TelemetryEvent::new(json!({
            "_T": "LogItemThrow",
            "_D": "2024-05-01T10:00:05Z",
            "character": {"accountId": "account.bob", "location": {"x": 1.0, "y": 1.0}},
            "item": {"subCategory": "Throwable_SmokeBomb"}
        }));
        InMemoryMatchSource::new()
            .with_player("bob", "account.bob")
            .with_match("account.bob", MatchMeta::new("m1", "t1", "squad", 600), vec![throw])
    }

    fn ingest_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/v1/ingest")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_ingest_handler_returns_processed_matches() {
        let app = app(one_match_source());

        let response = app
            .oneshot(ingest_request(r#"{"nickname": "bob", "matchCount": 3}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let ingest_response: IngestResponse =
            serde_json::from_value(json_body(response).await).unwrap();
        assert_eq!(ingest_response.account_id, "account.bob");
        assert_eq!(ingest_response.match_ids, vec!["m1"]);
    }

    #[tokio::test]
    async fn test_ingest_handler_unknown_player_is_404() {
        let app = app(InMemoryMatchSource::new());

        let response = app
            .oneshot(ingest_request(r#"{"nickname": "nobody"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = json_body(response).await;
        assert!(body["error"].as_str().unwrap().contains("nobody"));
    }

    #[tokio::test]
    async fn test_ingest_handler_rejects_bad_match_count() {
        let app = app(one_match_source());

        let response = app
            .oneshot(ingest_request(r#"{"nickname": "bob", "matchCount": 99}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_profile_handler_after_ingest() {
        let app = app(one_match_source());

        let response = app
            .clone()
            .oneshot(ingest_request(r#"{"nickname": "bob"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let request = Request::builder()
            .uri("/v1/players/account.bob/profile")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["accountId"], "account.bob");
        assert_eq!(body["features"]["grenadeMetrics"]["smoke_per_10m"], 1.0);
    }

    #[tokio::test]
    async fn test_profile_handler_missing_profile_is_404() {
        let app = app(InMemoryMatchSource::new());

        let request = Request::builder()
            .uri("/v1/players/account.none/profile")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
