//! Project handlers
//!
//! Student-facing endpoints: viewing a project, submitting work, and listing
//! the peer reviews the student has to write.

use axum::{
    extract::{Path, State},
    response::Redirect,
    Extension, Form, Json,
};
use chrono::Utc;
use uuid::Uuid;

use crate::app::{ProjectView, ReviewAssignments, SubmissionOutcome};
use crate::domain::entities::{Actor, ProjectId, SubmissionForm};
use crate::error::AppError;
use crate::AppState;

/// Where every submission attempt lands
pub fn project_page(project_id: &ProjectId) -> String {
    format!("/projects/{}", project_id)
}

/// GET /projects/:id
///
/// Project details, whether submissions are open, and the caller's own
/// submission when signed in.
pub async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    actor: Option<Extension<Actor>>,
) -> Result<Json<ProjectView>, AppError> {
    let student_id = actor.as_ref().map(|Extension(a)| a.user_id);
    let view = state
        .submission_service
        .project_view(&ProjectId(id), student_id.as_ref(), Utc::now())
        .await?;

    Ok(Json(view))
}

/// POST /projects/:id/submissions
///
/// Submit or re-submit a project. Always redirects back to the project page;
/// outside the submission window the request is dropped without a write.
pub async fn submit_project(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(actor): Extension<Actor>,
    Form(form): Form<SubmissionForm>,
) -> Result<Redirect, AppError> {
    let project_id = ProjectId(id);
    let outcome = state
        .submission_service
        .submit(&project_id, &actor.user_id, form, Utc::now())
        .await?;

    if let SubmissionOutcome::NotAccepting = outcome {
        tracing::debug!(
            project_id = %project_id,
            user_id = %actor.user_id,
            "Submission not accepted, redirecting"
        );
    }

    Ok(Redirect::to(&project_page(&project_id)))
}

/// GET /projects/:id/reviews
///
/// The rubric and the anonymous review tasks assigned to the caller.
pub async fn get_reviews(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<ReviewAssignments>, AppError> {
    let assignments = state
        .review_service
        .reviews_for_student(&ProjectId(id), &actor.user_id)
        .await?;

    Ok(Json(assignments))
}
