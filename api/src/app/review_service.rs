//! Peer review service
//!
//! Lets a student see the reviews they owe and submit rubric answers for them.
//! Reviews stay anonymous: a task exposes the reviewee's repository link and
//! commit, never the reviewee's identity.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::{
    Answer, CriteriaId, NewCriteriaResponse, PeerReview, PeerReviewId, PeerReviewState, ProjectId,
    ReviewCriteria, UserId,
};
use crate::domain::lifecycle::{self, ProjectOperation};
use crate::domain::ports::{
    CriteriaResponseRepository, PeerReviewRepository, ProjectRepository,
    ReviewCriteriaRepository, SubmissionRepository,
};
use crate::error::{AppError, DomainError};

/// A review a student has to write
#[derive(Debug, Clone, Serialize)]
pub struct ReviewTask {
    pub review_id: PeerReviewId,
    pub state: PeerReviewState,
    pub submitted_at: Option<DateTime<Utc>>,
    pub github_link: String,
    pub commit_id: String,
}

/// Everything a student needs to write their reviews for a project
#[derive(Debug, Clone, Serialize)]
pub struct ReviewAssignments {
    pub project_id: ProjectId,
    pub rubric: Vec<ReviewCriteria>,
    pub tasks: Vec<ReviewTask>,
}

/// Raw answer to one criterion, as sent by the reviewer
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewAnswer {
    pub criteria_id: CriteriaId,
    pub answer: String,
}

/// Result of a review submission
#[derive(Debug)]
pub enum ReviewOutcome {
    Submitted(PeerReview),
    /// Outside the review window; nothing was written
    NotAccepting(ProjectId),
}

impl ReviewOutcome {
    /// Project the review belongs to
    pub fn project_id(&self) -> ProjectId {
        match self {
            ReviewOutcome::Submitted(review) => review.project_id,
            ReviewOutcome::NotAccepting(project_id) => *project_id,
        }
    }
}

/// Service for writing peer reviews
pub struct ReviewService<PR, SR, RCR, PRR, CRR>
where
    PR: ProjectRepository,
    SR: SubmissionRepository,
    RCR: ReviewCriteriaRepository,
    PRR: PeerReviewRepository,
    CRR: CriteriaResponseRepository,
{
    projects: Arc<PR>,
    submissions: Arc<SR>,
    criteria: Arc<RCR>,
    reviews: Arc<PRR>,
    responses: Arc<CRR>,
}

impl<PR, SR, RCR, PRR, CRR> ReviewService<PR, SR, RCR, PRR, CRR>
where
    PR: ProjectRepository,
    SR: SubmissionRepository,
    RCR: ReviewCriteriaRepository,
    PRR: PeerReviewRepository,
    CRR: CriteriaResponseRepository,
{
    pub fn new(
        projects: Arc<PR>,
        submissions: Arc<SR>,
        criteria: Arc<RCR>,
        reviews: Arc<PRR>,
        responses: Arc<CRR>,
    ) -> Self {
        Self {
            projects,
            submissions,
            criteria,
            reviews,
            responses,
        }
    }

    /// Reviews a student owes for a project.
    ///
    /// A student without a submission has no reviews to write.
    pub async fn reviews_for_student(
        &self,
        project_id: &ProjectId,
        student_id: &UserId,
    ) -> Result<ReviewAssignments, AppError> {
        let project = self
            .projects
            .find_by_id(project_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Project not found: {}", project_id)))?;

        let rubric = self.criteria.find_by_course(&project.course_id).await?;

        let Some(own) = self
            .submissions
            .find_by_project_and_student(project_id, student_id)
            .await?
        else {
            return Ok(ReviewAssignments {
                project_id: *project_id,
                rubric,
                tasks: Vec::new(),
            });
        };

        let mut tasks = Vec::new();
        for review in self.reviews.find_by_reviewer(&own.id).await? {
            let reviewee = self
                .submissions
                .find_by_id(&review.reviewee)
                .await?
                .ok_or_else(|| {
                    DomainError::Internal(format!(
                        "Review {} points at missing submission {}",
                        review.id, review.reviewee
                    ))
                })?;

            tasks.push(ReviewTask {
                review_id: review.id,
                state: review.state,
                submitted_at: review.submitted_at,
                github_link: reviewee.github_link,
                commit_id: reviewee.commit_id,
            });
        }

        Ok(ReviewAssignments {
            project_id: *project_id,
            rubric,
            tasks,
        })
    }

    /// Submit (or resubmit) the answers of a review.
    ///
    /// Only the owner of the reviewer submission may submit. Every criterion of
    /// the course must be answered exactly once with a decodable answer; the
    /// canonical encoding is stored and replaces any earlier answers.
    pub async fn submit_review(
        &self,
        review_id: &PeerReviewId,
        student_id: &UserId,
        answers: Vec<ReviewAnswer>,
        now: DateTime<Utc>,
    ) -> Result<ReviewOutcome, AppError> {
        let review = self
            .reviews
            .find_by_id(review_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Review not found: {}", review_id)))?;

        let reviewer = self
            .submissions
            .find_by_id(&review.reviewer)
            .await?
            .ok_or_else(|| {
                DomainError::Internal(format!(
                    "Review {} has missing reviewer submission {}",
                    review.id, review.reviewer
                ))
            })?;
        if reviewer.student_id != *student_id {
            return Err(DomainError::Forbidden(format!(
                "Review {} is not assigned to this user",
                review_id
            ))
            .into());
        }

        let project = self
            .projects
            .find_by_id(&review.project_id)
            .await?
            .ok_or_else(|| {
                DomainError::NotFound(format!("Project not found: {}", review.project_id))
            })?;

        if let Err(e) = lifecycle::check(&project, ProjectOperation::Review, now) {
            if e.is_outside_window() {
                tracing::debug!(
                    review_id = %review_id,
                    reason = %e,
                    "Review outside window ignored"
                );
                return Ok(ReviewOutcome::NotAccepting(project.id));
            }
            return Err(e.into());
        }

        let rubric = self.criteria.find_by_course(&project.course_id).await?;
        let responses = encode_answers(review_id, &rubric, answers)?;

        self.responses
            .replace_for_review(review_id, &responses)
            .await?;
        let review = self.reviews.mark_submitted(review_id, now).await?;

        tracing::info!(
            review_id = %review.id,
            project_id = %review.project_id,
            answers = responses.len(),
            "Peer review submitted"
        );

        Ok(ReviewOutcome::Submitted(review))
    }
}

/// Check a set of answers against the rubric and canonicalize them
fn encode_answers(
    review_id: &PeerReviewId,
    rubric: &[ReviewCriteria],
    answers: Vec<ReviewAnswer>,
) -> Result<Vec<NewCriteriaResponse>, DomainError> {
    let by_id: HashMap<CriteriaId, &ReviewCriteria> = rubric.iter().map(|c| (c.id, c)).collect();
    let mut seen = HashSet::new();
    let mut responses = Vec::with_capacity(answers.len());

    for answer in answers {
        let criteria = by_id.get(&answer.criteria_id).ok_or_else(|| {
            DomainError::Validation(format!("Unknown criterion: {}", answer.criteria_id))
        })?;
        if !seen.insert(answer.criteria_id) {
            return Err(DomainError::Validation(format!(
                "Criterion answered twice: {}",
                answer.criteria_id
            )));
        }

        let decoded = Answer::decode(
            &answer.answer,
            criteria.review_criteria_type,
            criteria.option_count(),
        )
        .map_err(|e| {
            DomainError::Validation(format!("Answer to {}: {}", criteria.description, e))
        })?;

        responses.push(NewCriteriaResponse {
            review_id: *review_id,
            criteria_id: criteria.id,
            answer: decoded.encode(),
        });
    }

    if let Some(missing) = rubric.iter().find(|c| !seen.contains(&c.id)) {
        return Err(DomainError::Validation(format!(
            "Criterion not answered: {}",
            missing.description
        )));
    }

    Ok(responses)
}
