//! Project lifecycle state machine
//!
//! ```text
//! CollectingSubmissions ──assign──▶ PeerReviewing ──score──▶ Completed
//!          │                              │                      │
//!          └──────────────close───────────┴──────────────────────┴──▶ Closed
//! ```
//!
//! Transitions only move forward. The machine does not own timers: callers pass
//! `now`, and only end-user operations (submit, review) are gated on deadlines.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::{Project, ProjectState};
use crate::error::DomainError;

/// An operation requested against a project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectOperation {
    /// Student submits or re-submits their project
    Submit,
    /// Reviewer submits rubric answers
    Review,
    /// Administrative: create peer review pairings
    AssignReviews,
    /// Administrative: aggregate submitted reviews into scores
    Score,
    /// Administrative override
    Close,
}

impl std::fmt::Display for ProjectOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProjectOperation::Submit => write!(f, "submit"),
            ProjectOperation::Review => write!(f, "review"),
            ProjectOperation::AssignReviews => write!(f, "assign_reviews"),
            ProjectOperation::Score => write!(f, "score"),
            ProjectOperation::Close => write!(f, "close"),
        }
    }
}

impl ProjectOperation {
    /// State the operation requires the project to be in, if it is state-bound
    pub fn required_state(&self) -> Option<ProjectState> {
        match self {
            ProjectOperation::Submit | ProjectOperation::AssignReviews => {
                Some(ProjectState::CollectingSubmissions)
            }
            ProjectOperation::Review | ProjectOperation::Score => {
                Some(ProjectState::PeerReviewing)
            }
            ProjectOperation::Close => None,
        }
    }

    /// State the project moves to when the operation succeeds
    pub fn target_state(&self) -> Option<ProjectState> {
        match self {
            ProjectOperation::AssignReviews => Some(ProjectState::PeerReviewing),
            ProjectOperation::Score => Some(ProjectState::Completed),
            ProjectOperation::Close => Some(ProjectState::Closed),
            ProjectOperation::Submit | ProjectOperation::Review => None,
        }
    }
}

/// Check whether `from -> to` is a legal transition
pub fn can_transition(from: ProjectState, to: ProjectState) -> bool {
    use ProjectState::*;

    match (from, to) {
        (CollectingSubmissions, PeerReviewing) => true,
        (PeerReviewing, Completed) => true,
        (Closed, Closed) => false,
        (_, Closed) => true,
        (CollectingSubmissions, _) | (PeerReviewing, _) | (Completed, _) | (Closed, _) => false,
    }
}

/// Validate that `operation` is legal for `project` at `now`.
///
/// Wrong state yields `InvalidState`; an end-user operation after its deadline
/// yields `DeadlinePassed`.
pub fn check(
    project: &Project,
    operation: ProjectOperation,
    now: DateTime<Utc>,
) -> Result<(), DomainError> {
    let invalid = || DomainError::InvalidState {
        project_id: project.id,
        state: project.state,
        operation,
    };

    match operation.required_state() {
        Some(required) if project.state != required => return Err(invalid()),
        Some(_) => {}
        None => {
            if let Some(target) = operation.target_state() {
                if !can_transition(project.state, target) {
                    return Err(invalid());
                }
            }
        }
    }

    let deadline_passed = match operation {
        ProjectOperation::Submit => project.submission_deadline_passed(now),
        ProjectOperation::Review => project.peer_review_deadline_passed(now),
        ProjectOperation::AssignReviews | ProjectOperation::Score | ProjectOperation::Close => {
            false
        }
    };

    if deadline_passed {
        return Err(DomainError::DeadlinePassed {
            project_id: project.id,
            operation,
        });
    }

    Ok(())
}

/// Whether the project view should accept a new or updated submission
pub fn accepting_submissions(project: &Project, now: DateTime<Utc>) -> bool {
    check(project, ProjectOperation::Submit, now).is_ok()
}
