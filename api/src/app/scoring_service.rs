//! Peer review scoring service
//!
//! Turns the submitted reviews of a project into a score per submission and
//! completes the project.
//!
//! Only `Submitted` reviews count. Reviews left `Assigned` are dropped without
//! penalty or imputation. A submission that received no submitted review keeps
//! a null score and is flagged for manual follow-up.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;

use crate::app::rubric;
use crate::domain::entities::{
    CriteriaId, PeerReview, PeerReviewId, Project, ProjectId, ProjectState, ReviewCriteria,
    SubmissionId, SubmissionScore,
};
use crate::domain::lifecycle::{self, ProjectOperation};
use crate::domain::ports::{
    CriteriaResponseRepository, PeerReviewRepository, ProjectRepository,
    ReviewCriteriaRepository, SubmissionRepository,
};
use crate::error::{AppError, DomainError};

/// Outcome of scoring a project
#[derive(Debug, Clone, Serialize)]
pub struct ScoringReport {
    pub project_id: ProjectId,
    pub scores: Vec<SubmissionScore>,
    /// Submissions without any submitted review
    pub flagged: Vec<SubmissionId>,
    pub reviews_counted: usize,
    pub reviews_skipped: usize,
    /// Stored answers that could not be decoded and were scored as zero
    pub malformed_answers: usize,
}

/// Service that scores projects from their peer reviews
pub struct ScoringService<PR, SR, RCR, PRR, CRR>
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

impl<PR, SR, RCR, PRR, CRR> ScoringService<PR, SR, RCR, PRR, CRR>
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

    /// Score every submission of a project and move it to `Completed`.
    ///
    /// Fails with `InvalidState` unless the project is `PeerReviewing`, and with
    /// a validation error when the course has no review criteria. Malformed
    /// answers never fail the batch.
    pub async fn score_project(&self, project_id: &ProjectId) -> Result<ScoringReport, AppError> {
        let project = self
            .projects
            .find_by_id(project_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Project not found: {}", project_id)))?;

        lifecycle::check(&project, ProjectOperation::Score, Utc::now())?;

        let rubric = self.criteria.find_by_course(&project.course_id).await?;
        if rubric.is_empty() {
            return Err(DomainError::Validation(format!(
                "Course {} has no review criteria to score against",
                project.course_id
            ))
            .into());
        }

        // Claim before reading reviews: once the project leaves PeerReviewing
        // no review can be submitted that this batch would miss
        let claimed = self
            .projects
            .transition_state(
                project_id,
                ProjectState::PeerReviewing,
                ProjectState::Completed,
            )
            .await?;
        if !claimed {
            return Err(DomainError::Conflict(format!(
                "Project {} changed state while scoring",
                project_id
            ))
            .into());
        }

        match self.score_claimed(&project, &rubric).await {
            Ok(report) => Ok(report),
            Err(e) => {
                self.release(project_id).await;
                Err(e)
            }
        }
    }

    async fn score_claimed(
        &self,
        project: &Project,
        rubric: &[ReviewCriteria],
    ) -> Result<ScoringReport, AppError> {
        let project_id = &project.id;
        let submissions = self.submissions.find_by_project(project_id).await?;
        let reviews = self.reviews.find_by_project(project_id).await?;

        let (submitted, skipped): (Vec<&PeerReview>, Vec<&PeerReview>) =
            reviews.iter().partition(|r| r.is_submitted());

        let submitted_ids: Vec<PeerReviewId> = submitted.iter().map(|r| r.id).collect();
        let responses = self.responses.find_by_reviews(&submitted_ids).await?;

        let mut answers_by_review: HashMap<PeerReviewId, HashMap<CriteriaId, &str>> =
            HashMap::new();
        for response in &responses {
            answers_by_review
                .entry(response.review_id)
                .or_default()
                .insert(response.criteria_id, response.answer.as_str());
        }

        let no_answers = HashMap::new();
        let mut values_by_reviewee: HashMap<SubmissionId, Vec<f64>> = HashMap::new();
        let mut completed_by_reviewer: HashMap<SubmissionId, i32> = HashMap::new();
        let mut malformed_answers = 0;

        for review in &submitted {
            let answers = answers_by_review.get(&review.id).unwrap_or(&no_answers);
            let score = rubric::score_review(&review.id, rubric, answers);
            malformed_answers += score.malformed;

            values_by_reviewee
                .entry(review.reviewee)
                .or_default()
                .push(score.value);
            *completed_by_reviewer.entry(review.reviewer).or_insert(0) += 1;
        }

        let mut scores = Vec::with_capacity(submissions.len());
        let mut flagged = Vec::new();
        for submission in &submissions {
            let values = values_by_reviewee
                .get(&submission.id)
                .map(Vec::as_slice)
                .unwrap_or(&[]);
            let peer_review_score = rubric::final_score(values, project.points_for_peer_review);

            if peer_review_score.is_none() {
                flagged.push(submission.id);
                tracing::warn!(
                    project_id = %project_id,
                    submission_id = %submission.id,
                    "No submitted reviews, flagged for manual review"
                );
            }

            scores.push(SubmissionScore {
                submission_id: submission.id,
                peer_review_score,
                reviews_received: values.len(),
                reviews_completed: completed_by_reviewer
                    .get(&submission.id)
                    .copied()
                    .unwrap_or(0),
                needs_manual_review: peer_review_score.is_none(),
            });
        }

        self.submissions.record_scores(&scores).await?;

        tracing::info!(
            project_id = %project_id,
            submissions = scores.len(),
            reviews_counted = submitted.len(),
            reviews_skipped = skipped.len(),
            flagged = flagged.len(),
            malformed_answers,
            "Project scored"
        );

        Ok(ScoringReport {
            project_id: *project_id,
            scores,
            flagged,
            reviews_counted: submitted.len(),
            reviews_skipped: skipped.len(),
            malformed_answers,
        })
    }

    /// Reopen scoring so the batch can be rerun
    async fn release(&self, project_id: &ProjectId) {
        if let Err(e) = self
            .projects
            .transition_state(
                project_id,
                ProjectState::Completed,
                ProjectState::PeerReviewing,
            )
            .await
        {
            tracing::error!(
                project_id = %project_id,
                error = %e,
                "Failed to release project after scoring failed"
            );
        }
    }
}
