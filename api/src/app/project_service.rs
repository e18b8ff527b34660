//! Project administration service
//!
//! Instructor-facing operations on projects: creating them, running the
//! assignment and scoring batches, and closing them. Every operation checks
//! that the actor manages the project's course.
//!
//! `advance_due_projects` is the deadline sweeper. It runs without an actor and
//! triggers assignment or scoring for projects whose deadline has passed.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;

use crate::app::assignment_service::{AssignmentReport, AssignmentService};
use crate::app::scoring_service::{ScoringReport, ScoringService};
use crate::domain::entities::{
    Actor, Course, CourseId, NewProject, NewReviewCriteria, Project, ProjectId, ProjectState,
    ReviewCriteria,
};
use crate::domain::lifecycle::{self, ProjectOperation};
use crate::domain::ports::{
    CourseRepository, CriteriaResponseRepository, PeerReviewRepository, ProjectRepository,
    ReviewCriteriaRepository, SubmissionRepository,
};
use crate::error::{AppError, DomainError};

/// Outcome of one deadline sweep
#[derive(Debug, Clone, Default, Serialize)]
pub struct SweepReport {
    pub assigned: Vec<ProjectId>,
    pub scored: Vec<ProjectId>,
    /// Projects whose batch failed and will be retried on the next sweep
    pub failed: Vec<ProjectId>,
}

/// Service for administrative project operations
pub struct ProjectService<CR, PR, SR, RCR, PRR, CRR>
where
    CR: CourseRepository,
    PR: ProjectRepository,
    SR: SubmissionRepository,
    RCR: ReviewCriteriaRepository,
    PRR: PeerReviewRepository,
    CRR: CriteriaResponseRepository,
{
    courses: Arc<CR>,
    projects: Arc<PR>,
    criteria: Arc<RCR>,
    assignment: AssignmentService<PR, SR, PRR>,
    scoring: ScoringService<PR, SR, RCR, PRR, CRR>,
}

impl<CR, PR, SR, RCR, PRR, CRR> ProjectService<CR, PR, SR, RCR, PRR, CRR>
where
    CR: CourseRepository,
    PR: ProjectRepository,
    SR: SubmissionRepository,
    RCR: ReviewCriteriaRepository,
    PRR: PeerReviewRepository,
    CRR: CriteriaResponseRepository,
{
    pub fn new(
        courses: Arc<CR>,
        projects: Arc<PR>,
        submissions: Arc<SR>,
        criteria: Arc<RCR>,
        reviews: Arc<PRR>,
        responses: Arc<CRR>,
        reviews_per_submission: usize,
    ) -> Self {
        let assignment = AssignmentService::new(
            projects.clone(),
            submissions.clone(),
            reviews.clone(),
            reviews_per_submission,
        );
        let scoring = ScoringService::new(
            projects.clone(),
            submissions,
            criteria.clone(),
            reviews,
            responses,
        );

        Self {
            courses,
            projects,
            criteria,
            assignment,
            scoring,
        }
    }

    async fn managed_course(&self, actor: &Actor, course_id: &CourseId) -> Result<Course, AppError> {
        let course = self
            .courses
            .find_by_id(course_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Course not found: {}", course_id)))?;

        if !actor.can_manage(&course) {
            return Err(DomainError::Forbidden(format!(
                "User {} does not manage course {}",
                actor.user_id, course.slug
            ))
            .into());
        }

        Ok(course)
    }

    async fn managed_project(
        &self,
        actor: &Actor,
        project_id: &ProjectId,
    ) -> Result<Project, AppError> {
        let project = self
            .projects
            .find_by_id(project_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Project not found: {}", project_id)))?;

        self.managed_course(actor, &project.course_id).await?;
        Ok(project)
    }

    /// Projects of every course the actor manages
    pub async fn managed_projects(&self, actor: &Actor) -> Result<Vec<Project>, AppError> {
        let courses = if actor.is_superuser {
            self.courses.find_all().await?
        } else {
            self.courses.find_by_instructor(&actor.user_id).await?
        };

        let mut projects = Vec::new();
        for course in &courses {
            projects.extend(self.projects.find_by_course(&course.id).await?);
        }
        Ok(projects)
    }

    /// Create a project in `CollectingSubmissions`
    pub async fn create_project(
        &self,
        actor: &Actor,
        project: NewProject,
    ) -> Result<Project, AppError> {
        self.managed_course(actor, &project.course_id).await?;

        if project.slug.trim().is_empty() || project.title.trim().is_empty() {
            return Err(DomainError::Validation("Slug and title are required".to_string()).into());
        }
        if project.peer_review_due_date <= project.submission_due_date {
            return Err(DomainError::Validation(
                "Peer review deadline must be after the submission deadline".to_string(),
            )
            .into());
        }
        if !project.points_for_peer_review.is_finite() || project.points_for_peer_review < 0.0 {
            return Err(DomainError::Validation(
                "Peer review points must be a non-negative number".to_string(),
            )
            .into());
        }

        let created = self.projects.create(&project).await?;
        tracing::info!(
            project_id = %created.id,
            course_id = %created.course_id,
            slug = %created.slug,
            "Project created"
        );
        Ok(created)
    }

    /// Add a criterion to a course rubric
    pub async fn add_criteria(
        &self,
        actor: &Actor,
        criteria: NewReviewCriteria,
    ) -> Result<ReviewCriteria, AppError> {
        self.managed_course(actor, &criteria.course_id).await?;

        if criteria.options.is_empty() {
            return Err(
                DomainError::Validation("A criterion needs at least one option".to_string()).into(),
            );
        }
        if criteria.options.iter().any(|o| o.trim().is_empty()) {
            return Err(DomainError::Validation("Option labels cannot be blank".to_string()).into());
        }

        Ok(self.criteria.create(&criteria).await?)
    }

    /// Assign peer reviews for a project (instructor trigger)
    pub async fn assign_reviews<R: Rng + Send + ?Sized>(
        &self,
        actor: &Actor,
        project_id: &ProjectId,
        rng: &mut R,
    ) -> Result<AssignmentReport, AppError> {
        self.managed_project(actor, project_id).await?;
        self.assignment
            .assign_peer_reviews_for_project(project_id, rng)
            .await
    }

    /// Score a project (instructor trigger)
    pub async fn score(
        &self,
        actor: &Actor,
        project_id: &ProjectId,
    ) -> Result<ScoringReport, AppError> {
        self.managed_project(actor, project_id).await?;
        self.scoring.score_project(project_id).await
    }

    /// Move a project to `Closed` from any other state
    pub async fn close_project(
        &self,
        actor: &Actor,
        project_id: &ProjectId,
    ) -> Result<Project, AppError> {
        let mut project = self.managed_project(actor, project_id).await?;
        lifecycle::check(&project, ProjectOperation::Close, Utc::now())?;

        let claimed = self
            .projects
            .transition_state(project_id, project.state, ProjectState::Closed)
            .await?;
        if !claimed {
            return Err(DomainError::Conflict(format!(
                "Project {} changed state while closing",
                project_id
            ))
            .into());
        }

        tracing::info!(
            project_id = %project_id,
            from = %project.state,
            "Project closed"
        );
        project.state = ProjectState::Closed;
        Ok(project)
    }

    /// Run the batch due for every project whose deadline has passed.
    ///
    /// A failing project is logged and left in place for the next sweep.
    pub async fn advance_due_projects<R: Rng + Send + ?Sized>(
        &self,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Result<SweepReport, AppError> {
        let mut report = SweepReport::default();

        let collecting = self
            .projects
            .find_by_state(ProjectState::CollectingSubmissions)
            .await?;
        for project in collecting
            .iter()
            .filter(|p| p.submission_deadline_passed(now))
        {
            match self
                .assignment
                .assign_peer_reviews_for_project(&project.id, rng)
                .await
            {
                Ok(_) => report.assigned.push(project.id),
                Err(e) => {
                    tracing::warn!(
                        project_id = %project.id,
                        error = %e,
                        "Scheduled review assignment failed"
                    );
                    report.failed.push(project.id);
                }
            }
        }

        let reviewing = self
            .projects
            .find_by_state(ProjectState::PeerReviewing)
            .await?;
        for project in reviewing
            .iter()
            .filter(|p| p.peer_review_deadline_passed(now))
        {
            match self.scoring.score_project(&project.id).await {
                Ok(_) => report.scored.push(project.id),
                Err(e) => {
                    tracing::warn!(
                        project_id = %project.id,
                        error = %e,
                        "Scheduled scoring failed"
                    );
                    report.failed.push(project.id);
                }
            }
        }

        if !report.assigned.is_empty() || !report.scored.is_empty() || !report.failed.is_empty() {
            tracing::info!(
                assigned = report.assigned.len(),
                scored = report.scored.len(),
                failed = report.failed.len(),
                "Deadline sweep finished"
            );
        }

        Ok(report)
    }
}
