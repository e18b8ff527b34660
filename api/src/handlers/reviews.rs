//! Review handlers

use axum::{
    extract::{Path, State},
    response::Redirect,
    Extension, Json,
};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::app::{ReviewAnswer, ReviewOutcome};
use crate::domain::entities::{Actor, PeerReviewId};
use crate::error::AppError;
use crate::AppState;

/// Request to submit a peer review
#[derive(Debug, Deserialize)]
pub struct SubmitReviewRequest {
    /// One answer per course criterion. Checkbox answers are comma-separated
    /// 1-based option indices.
    pub answers: Vec<ReviewAnswer>,
}

/// POST /reviews/:id
///
/// Submit rubric answers for an assigned review, then redirect to the
/// project's review list.
pub async fn submit_review(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(actor): Extension<Actor>,
    Json(request): Json<SubmitReviewRequest>,
) -> Result<Redirect, AppError> {
    let outcome = state
        .review_service
        .submit_review(&PeerReviewId(id), &actor.user_id, request.answers, Utc::now())
        .await?;

    if let ReviewOutcome::NotAccepting(_) = outcome {
        tracing::debug!(review_id = %id, "Review not accepted, redirecting");
    }

    Ok(Redirect::to(&format!(
        "/projects/{}/reviews",
        outcome.project_id()
    )))
}
