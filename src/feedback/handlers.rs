use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;
use tracing::{info, instrument};

use super::{service::FeedbackService, types::PlayerFeedback};
use crate::shared::{AppError, AppState};

/// HTTP handler for percentile-ranked coaching feedback
///
/// GET /v1/players/:account_id/feedback
/// Requires a prior ingest for the account
#[instrument(name = "get_feedback", skip(state))]
pub async fn get_feedback(
    State(state): State<AppState>,
    Path(account_id): Path<String>,
) -> Result<Json<PlayerFeedback>, AppError> {
    let service = FeedbackService::new(
        Arc::clone(&state.profile_repository),
        Arc::clone(&state.distribution_repository),
    );
    let feedback = service.build_feedback(&account_id).await?;

    info!(account_id = %account_id, cards = feedback.cards.len(), "Feedback served");
    Ok(Json(feedback))
}
