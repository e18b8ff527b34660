//! Administrative handlers
//!
//! Instructor-only endpoints. Authorization against the course happens in
//! the project service; these handlers only translate HTTP.

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::app::{AssignmentReport, ScoringReport};
use crate::domain::entities::{
    Actor, CourseId, NewProject, NewReviewCriteria, Project, ProjectId, ReviewCriteria,
    ReviewCriteriaType, ScoringDirection,
};
use crate::error::AppError;
use crate::AppState;

/// Request to create a project in a course
#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub submission_due_date: DateTime<Utc>,
    pub peer_review_due_date: DateTime<Utc>,
    #[serde(default)]
    pub points_for_peer_review: f64,
}

/// Request to add a criterion to a course rubric
#[derive(Debug, Deserialize)]
pub struct CreateCriteriaRequest {
    pub description: String,
    pub review_criteria_type: ReviewCriteriaType,
    pub options: Vec<String>,
    #[serde(default)]
    pub direction: ScoringDirection,
}

/// GET /admin/projects
///
/// Projects of every course the caller manages.
pub async fn list_projects(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<Vec<Project>>, AppError> {
    let projects = state.project_service.managed_projects(&actor).await?;
    Ok(Json(projects))
}

/// POST /admin/courses/:id/projects
pub async fn create_project(
    State(state): State<AppState>,
    Path(course_id): Path<Uuid>,
    Extension(actor): Extension<Actor>,
    Json(request): Json<CreateProjectRequest>,
) -> Result<Json<Project>, AppError> {
    let project = state
        .project_service
        .create_project(
            &actor,
            NewProject {
                course_id: CourseId(course_id),
                slug: request.slug,
                title: request.title,
                description: request.description,
                submission_due_date: request.submission_due_date,
                peer_review_due_date: request.peer_review_due_date,
                points_for_peer_review: request.points_for_peer_review,
            },
        )
        .await?;

    Ok(Json(project))
}

/// POST /admin/courses/:id/criteria
pub async fn add_criteria(
    State(state): State<AppState>,
    Path(course_id): Path<Uuid>,
    Extension(actor): Extension<Actor>,
    Json(request): Json<CreateCriteriaRequest>,
) -> Result<Json<ReviewCriteria>, AppError> {
    let criteria = state
        .project_service
        .add_criteria(
            &actor,
            NewReviewCriteria {
                course_id: CourseId(course_id),
                description: request.description,
                review_criteria_type: request.review_criteria_type,
                options: request.options,
                direction: request.direction,
            },
        )
        .await?;

    Ok(Json(criteria))
}

/// POST /admin/projects/:id/assign
///
/// Pair every submission with its reviewers and start peer review.
pub async fn assign_reviews(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<AssignmentReport>, AppError> {
    let mut rng = state.rng.lock().await;
    let report = state
        .project_service
        .assign_reviews(&actor, &ProjectId(id), &mut *rng)
        .await?;

    Ok(Json(report))
}

/// POST /admin/projects/:id/score
///
/// Score submitted reviews and complete the project.
pub async fn score_project(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<ScoringReport>, AppError> {
    let report = state
        .project_service
        .score(&actor, &ProjectId(id))
        .await?;

    Ok(Json(report))
}

/// POST /admin/projects/:id/close
pub async fn close_project(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<Project>, AppError> {
    let project = state
        .project_service
        .close_project(&actor, &ProjectId(id))
        .await?;

    Ok(Json(project))
}
