//! Project submission domain entity
//!
//! One submission per (project, student). Re-submitting updates the existing
//! row in place. The peer-review score fields are written by the scoring engine.

use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::course::{EnrollmentId, UserId};
use super::project::ProjectId;
use crate::error::DomainError;

/// Unique identifier for a project submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubmissionId(pub Uuid);

impl SubmissionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SubmissionId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for SubmissionId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A student's submission for a project
#[derive(Debug, Clone, Serialize)]
pub struct ProjectSubmission {
    pub id: SubmissionId,
    pub project_id: ProjectId,
    pub student_id: UserId,
    pub enrollment_id: EnrollmentId,
    pub github_link: String,
    pub commit_id: String,
    /// Hours the student reports spending on the project
    pub time_spent: Option<f64>,
    pub problems_comments: Option<String>,
    pub faq_contribution: Option<String>,
    pub submitted_at: DateTime<Utc>,
    /// Null until scored, and stays null when no review was submitted
    pub peer_review_score: Option<f64>,
    pub needs_manual_review: bool,
    /// Reviews this submission's owner completed as a reviewer
    pub reviews_completed: i32,
}

/// Fields a student fills in when submitting a project
#[derive(Debug, Clone, Deserialize)]
pub struct SubmissionForm {
    pub github_link: String,
    pub commit_id: String,
    #[serde(default)]
    pub time_spent: Option<f64>,
    #[serde(default)]
    pub problems_comments: Option<String>,
    #[serde(default)]
    pub faq_contribution: Option<String>,
}

fn github_link_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^https://github\.com/[A-Za-z0-9_.-]+/[A-Za-z0-9_.-]+(/.*)?$")
            .expect("github link pattern is valid")
    })
}

fn commit_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[0-9a-fA-F]{7,40}$").expect("commit pattern is valid"))
}

impl SubmissionForm {
    /// Validate the form, trimming whitespace from the text fields
    pub fn validated(self) -> Result<Self, DomainError> {
        let github_link = self.github_link.trim().to_string();
        if !github_link_pattern().is_match(&github_link) {
            return Err(DomainError::Validation(format!(
                "Not a GitHub repository link: {}",
                github_link
            )));
        }

        let commit_id = self.commit_id.trim().to_string();
        if !commit_id_pattern().is_match(&commit_id) {
            return Err(DomainError::Validation(format!(
                "Commit id must be 7-40 hex characters: {}",
                commit_id
            )));
        }

        if let Some(hours) = self.time_spent {
            if !hours.is_finite() || hours < 0.0 {
                return Err(DomainError::Validation(
                    "Time spent must be a non-negative number".to_string(),
                ));
            }
        }

        Ok(Self {
            github_link,
            commit_id,
            time_spent: self.time_spent,
            problems_comments: non_blank(self.problems_comments),
            faq_contribution: non_blank(self.faq_contribution),
        })
    }
}

fn non_blank(text: Option<String>) -> Option<String> {
    text.map(|t| t.trim().to_string()).filter(|t| !t.is_empty())
}

/// Data needed to create a new submission
#[derive(Debug, Clone)]
pub struct NewProjectSubmission {
    pub project_id: ProjectId,
    pub student_id: UserId,
    pub enrollment_id: EnrollmentId,
    pub form: SubmissionForm,
}

/// Score written back onto a submission by the scoring engine
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SubmissionScore {
    pub submission_id: SubmissionId,
    pub peer_review_score: Option<f64>,
    pub reviews_received: usize,
    pub reviews_completed: i32,
    pub needs_manual_review: bool,
}
