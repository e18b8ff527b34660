//! Peer review assignment service
//!
//! Pairs every submission of a project with a fixed number of anonymous
//! reviewers drawn from the other submissions, then moves the project into
//! peer review.
//!
//! The pairing is a shuffled ring: submissions are put in random order and
//! each one is reviewed by the next `k` submissions around the ring. Every
//! submission therefore receives exactly `k` distinct reviewers and writes
//! exactly `k` reviews, and nobody reviews themselves.

use std::sync::Arc;

use chrono::Utc;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::app::review_config::MIN_SUBMISSIONS_FOR_REVIEW;
use crate::domain::entities::{NewPeerReview, ProjectId, ProjectState, SubmissionId};
use crate::domain::lifecycle::{self, ProjectOperation};
use crate::domain::ports::{PeerReviewRepository, ProjectRepository, SubmissionRepository};
use crate::error::{AppError, DomainError};

/// Reviewer/reviewee pairs chosen for a project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentPlan {
    /// Reviewers per submission actually used
    pub reviews_per_submission: usize,
    /// True when the pool was too small for the requested count
    pub degraded: bool,
    /// `(reviewer, reviewee)` pairs
    pub pairs: Vec<(SubmissionId, SubmissionId)>,
}

/// Plan review pairings over a pool of at least two submissions.
///
/// The requested count is reduced to `pool - 1` when the pool is too small.
/// The pool is sorted before shuffling so the plan depends only on the
/// submissions and the RNG state, not on the order storage returned them in.
pub fn plan_assignments<R: Rng + ?Sized>(
    submissions: &[SubmissionId],
    requested: usize,
    rng: &mut R,
) -> AssignmentPlan {
    let mut ring = submissions.to_vec();
    ring.sort();
    ring.dedup();

    let n = ring.len();
    if n < MIN_SUBMISSIONS_FOR_REVIEW {
        return AssignmentPlan {
            reviews_per_submission: 0,
            degraded: requested > 0,
            pairs: Vec::new(),
        };
    }

    let k = requested.clamp(1, n - 1);
    ring.shuffle(rng);

    let mut pairs = Vec::with_capacity(n * k);
    for (position, reviewee) in ring.iter().enumerate() {
        for offset in 1..=k {
            let reviewer = ring[(position + offset) % n];
            pairs.push((reviewer, *reviewee));
        }
    }

    AssignmentPlan {
        reviews_per_submission: k,
        degraded: k < requested,
        pairs,
    }
}

/// Outcome of assigning reviews for a project
#[derive(Debug, Clone, Serialize)]
pub struct AssignmentReport {
    pub project_id: ProjectId,
    pub submissions: usize,
    pub reviews_per_submission: usize,
    pub reviews_created: usize,
    pub degraded: bool,
}

/// Service that creates peer review pairings
pub struct AssignmentService<PR, SR, PRR>
where
    PR: ProjectRepository,
    SR: SubmissionRepository,
    PRR: PeerReviewRepository,
{
    projects: Arc<PR>,
    submissions: Arc<SR>,
    reviews: Arc<PRR>,
    reviews_per_submission: usize,
}

impl<PR, SR, PRR> AssignmentService<PR, SR, PRR>
where
    PR: ProjectRepository,
    SR: SubmissionRepository,
    PRR: PeerReviewRepository,
{
    pub fn new(
        projects: Arc<PR>,
        submissions: Arc<SR>,
        reviews: Arc<PRR>,
        reviews_per_submission: usize,
    ) -> Self {
        Self {
            projects,
            submissions,
            reviews,
            reviews_per_submission,
        }
    }

    /// Assign peer reviews for every submission of a project and move it to
    /// `PeerReviewing`.
    ///
    /// Fails with `AlreadyAssigned` if the project has any review rows, with
    /// `InvalidState` outside `CollectingSubmissions`, and with
    /// `InsufficientSubmissions` below two submissions. None of these change
    /// anything.
    pub async fn assign_peer_reviews_for_project<R: Rng + Send + ?Sized>(
        &self,
        project_id: &ProjectId,
        rng: &mut R,
    ) -> Result<AssignmentReport, AppError> {
        let project = self
            .projects
            .find_by_id(project_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Project not found: {}", project_id)))?;

        if self.reviews.count_by_project(project_id).await? > 0 {
            return Err(DomainError::AlreadyAssigned(*project_id).into());
        }

        lifecycle::check(&project, ProjectOperation::AssignReviews, Utc::now())?;

        // Claim before reading the pool: once the project leaves
        // CollectingSubmissions no submission can land without reviewers
        let claimed = self
            .projects
            .transition_state(
                project_id,
                ProjectState::CollectingSubmissions,
                ProjectState::PeerReviewing,
            )
            .await?;
        if !claimed {
            return Err(DomainError::Conflict(format!(
                "Project {} changed state while assigning reviews",
                project_id
            ))
            .into());
        }

        match self.assign_claimed(project_id, rng).await {
            Ok(report) => Ok(report),
            Err(e) => {
                self.release(project_id).await;
                Err(e)
            }
        }
    }

    async fn assign_claimed<R: Rng + Send + ?Sized>(
        &self,
        project_id: &ProjectId,
        rng: &mut R,
    ) -> Result<AssignmentReport, AppError> {
        let submissions = self.submissions.find_by_project(project_id).await?;
        if submissions.len() < MIN_SUBMISSIONS_FOR_REVIEW {
            return Err(DomainError::InsufficientSubmissions {
                project_id: *project_id,
                found: submissions.len(),
            }
            .into());
        }

        let ids: Vec<SubmissionId> = submissions.iter().map(|s| s.id).collect();
        let plan = plan_assignments(&ids, self.reviews_per_submission, rng);

        if plan.degraded {
            tracing::warn!(
                project_id = %project_id,
                submissions = ids.len(),
                requested = self.reviews_per_submission,
                used = plan.reviews_per_submission,
                "Too few submissions for requested reviewer count, reducing"
            );
        }

        let new_reviews: Vec<NewPeerReview> = plan
            .pairs
            .iter()
            .map(|(reviewer, reviewee)| NewPeerReview {
                project_id: *project_id,
                reviewer: *reviewer,
                reviewee: *reviewee,
            })
            .collect();

        let created = self.reviews.create_many(&new_reviews).await?;

        tracing::info!(
            project_id = %project_id,
            submissions = ids.len(),
            reviews_per_submission = plan.reviews_per_submission,
            reviews_created = created.len(),
            "Peer reviews assigned"
        );

        Ok(AssignmentReport {
            project_id: *project_id,
            submissions: ids.len(),
            reviews_per_submission: plan.reviews_per_submission,
            reviews_created: created.len(),
            degraded: plan.degraded,
        })
    }

    /// Undo the claim so assignment can be retried
    async fn release(&self, project_id: &ProjectId) {
        if let Err(e) = self
            .projects
            .transition_state(
                project_id,
                ProjectState::PeerReviewing,
                ProjectState::CollectingSubmissions,
            )
            .await
        {
            tracing::error!(
                project_id = %project_id,
                error = %e,
                "Failed to release project after assignment failed"
            );
        }
    }
}
