//! Project domain entity
//!
//! A course project is submitted by students and scored through peer review.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::course::CourseId;

/// Unique identifier for a project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectId(pub Uuid);

impl ProjectId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ProjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for ProjectId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ProjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle state of a project.
///
/// Persisted as a two-letter code. Transitions are validated by
/// [`crate::domain::lifecycle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectState {
    CollectingSubmissions,
    PeerReviewing,
    Completed,
    Closed,
}

impl ProjectState {
    /// Two-letter storage code
    pub fn code(&self) -> &'static str {
        match self {
            ProjectState::CollectingSubmissions => "CS",
            ProjectState::PeerReviewing => "PR",
            ProjectState::Completed => "CO",
            ProjectState::Closed => "CL",
        }
    }
}

impl std::fmt::Display for ProjectState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProjectState::CollectingSubmissions => write!(f, "collecting_submissions"),
            ProjectState::PeerReviewing => write!(f, "peer_reviewing"),
            ProjectState::Completed => write!(f, "completed"),
            ProjectState::Closed => write!(f, "closed"),
        }
    }
}

impl std::str::FromStr for ProjectState {
    type Err = String;

    /// Accepts both the storage code and the long name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cs" | "collecting_submissions" => Ok(ProjectState::CollectingSubmissions),
            "pr" | "peer_reviewing" => Ok(ProjectState::PeerReviewing),
            "co" | "completed" => Ok(ProjectState::Completed),
            "cl" | "closed" => Ok(ProjectState::Closed),
            _ => Err(format!("Unknown project state: {}", s)),
        }
    }
}

/// A course project
#[derive(Debug, Clone, Serialize)]
pub struct Project {
    pub id: ProjectId,
    pub course_id: CourseId,
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub submission_due_date: DateTime<Utc>,
    pub peer_review_due_date: DateTime<Utc>,
    pub state: ProjectState,
    /// Maximum score a submission can receive from peer review
    pub points_for_peer_review: f64,
    pub created_at: DateTime<Utc>,
}

impl Project {
    /// Submission deadline has passed
    pub fn submission_deadline_passed(&self, now: DateTime<Utc>) -> bool {
        now >= self.submission_due_date
    }

    /// Peer review deadline has passed
    pub fn peer_review_deadline_passed(&self, now: DateTime<Utc>) -> bool {
        now >= self.peer_review_due_date
    }
}

/// Data needed to create a new project
#[derive(Debug, Clone)]
pub struct NewProject {
    pub course_id: CourseId,
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub submission_due_date: DateTime<Utc>,
    pub peer_review_due_date: DateTime<Utc>,
    pub points_for_peer_review: f64,
}
