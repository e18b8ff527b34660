//! Unified error types for the Coursekit API
//!
//! This module defines error types for each layer:
//! - `DomainError`: Core business logic errors, including the peer-review
//!   batch failures (insufficient submissions, already assigned, invalid state)
//! - `AppError`: Application layer errors (wraps domain errors for HTTP responses)
//!
//! Malformed stored answers are not in this taxonomy: they surface as
//! [`crate::domain::entities::AnswerError`], which scoring logs and zeroes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::domain::entities::{ProjectId, ProjectState};
use crate::domain::lifecycle::ProjectOperation;

/// Domain layer errors - pure business logic errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Entity already exists: {0}")]
    AlreadyExists(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Project {project_id} has {found} submission(s); at least 2 are needed for peer review")]
    InsufficientSubmissions { project_id: ProjectId, found: usize },

    #[error("Peer reviews are already assigned for project {0}")]
    AlreadyAssigned(ProjectId),

    #[error("Cannot {operation} project {project_id} while it is {state}")]
    InvalidState {
        project_id: ProjectId,
        state: ProjectState,
        operation: ProjectOperation,
    },

    #[error("Deadline for {operation} has passed for project {project_id}")]
    DeadlinePassed {
        project_id: ProjectId,
        operation: ProjectOperation,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    /// Errors an end-user flow answers with a silent redirect rather than an error page
    pub fn is_outside_window(&self) -> bool {
        matches!(
            self,
            DomainError::InvalidState { .. } | DomainError::DeadlinePassed { .. }
        )
    }
}

/// Application layer errors - used by HTTP handlers
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("Unauthorized")]
    Unauthorized,
}

/// Error response body for JSON responses
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::Domain(DomainError::NotFound(msg)) => {
                (StatusCode::NOT_FOUND, "Not found", Some(msg.clone()))
            }
            AppError::Domain(DomainError::AlreadyExists(msg)) => {
                (StatusCode::CONFLICT, "Already exists", Some(msg.clone()))
            }
            AppError::Domain(DomainError::Validation(msg)) => (
                StatusCode::BAD_REQUEST,
                "Validation error",
                Some(msg.clone()),
            ),
            AppError::Domain(DomainError::Forbidden(msg)) => {
                (StatusCode::FORBIDDEN, "Forbidden", Some(msg.clone()))
            }
            AppError::Domain(DomainError::Conflict(msg)) => {
                (StatusCode::CONFLICT, "Conflict", Some(msg.clone()))
            }
            AppError::Domain(e @ DomainError::InsufficientSubmissions { .. }) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Insufficient submissions",
                Some(e.to_string()),
            ),
            AppError::Domain(e @ DomainError::AlreadyAssigned(_)) => {
                (StatusCode::CONFLICT, "Already assigned", Some(e.to_string()))
            }
            AppError::Domain(e @ DomainError::InvalidState { .. }) => {
                (StatusCode::CONFLICT, "Invalid state", Some(e.to_string()))
            }
            AppError::Domain(e @ DomainError::DeadlinePassed { .. }) => {
                (StatusCode::CONFLICT, "Deadline passed", Some(e.to_string()))
            }
            AppError::Domain(DomainError::Database(msg)) => {
                tracing::error!("Database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error",
                    None,
                )
            }
            AppError::Domain(DomainError::Internal(msg)) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error",
                    None,
                )
            }
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized", None),
        };

        let body = Json(ErrorResponse {
            error: error.to_string(),
            details,
        });

        (status, body).into_response()
    }
}
