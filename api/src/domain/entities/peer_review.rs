//! Peer review domain entity
//!
//! Pairs a reviewer submission with a reviewee submission inside one project.
//! Rows are created by the assignment engine and completed by the reviewer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::project::ProjectId;
use super::submission::SubmissionId;

/// Unique identifier for a peer review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PeerReviewId(pub Uuid);

impl PeerReviewId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PeerReviewId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for PeerReviewId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for PeerReviewId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Completion state of a peer review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeerReviewState {
    Assigned,
    Submitted,
}

impl PeerReviewState {
    pub fn code(&self) -> &'static str {
        match self {
            PeerReviewState::Assigned => "AS",
            PeerReviewState::Submitted => "SU",
        }
    }
}

impl std::fmt::Display for PeerReviewState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PeerReviewState::Assigned => write!(f, "assigned"),
            PeerReviewState::Submitted => write!(f, "submitted"),
        }
    }
}

impl std::str::FromStr for PeerReviewState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "as" | "assigned" => Ok(PeerReviewState::Assigned),
            "su" | "submitted" => Ok(PeerReviewState::Submitted),
            _ => Err(format!("Unknown peer review state: {}", s)),
        }
    }
}

/// An anonymous review of one submission by the owner of another
#[derive(Debug, Clone, Serialize)]
pub struct PeerReview {
    pub id: PeerReviewId,
    pub project_id: ProjectId,
    pub reviewer: SubmissionId,
    pub reviewee: SubmissionId,
    pub state: PeerReviewState,
    pub submitted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl PeerReview {
    pub fn is_submitted(&self) -> bool {
        self.state == PeerReviewState::Submitted
    }

    /// Check if this would be a self-review (invalid)
    pub fn is_self_review(&self) -> bool {
        self.reviewer == self.reviewee
    }
}

/// Data needed to create a new peer review
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewPeerReview {
    pub project_id: ProjectId,
    pub reviewer: SubmissionId,
    pub reviewee: SubmissionId,
}

impl NewPeerReview {
    /// Check if this would be a self-review (invalid)
    pub fn is_self_review(&self) -> bool {
        self.reviewer == self.reviewee
    }
}
