//! Project submission service
//!
//! Accepts project submissions from students. Enrollment in the course is
//! created on the first submission, and a re-submission updates the existing
//! row. Outside the submission window the request is quietly turned away.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::{
    NewEnrollment, NewProjectSubmission, Project, ProjectId, ProjectSubmission, SubmissionForm,
    UserId,
};
use crate::domain::lifecycle::{self, ProjectOperation};
use crate::domain::ports::{EnrollmentRepository, ProjectRepository, SubmissionRepository};
use crate::error::{AppError, DomainError};

/// Result of a submission attempt
#[derive(Debug)]
pub enum SubmissionOutcome {
    Created(ProjectSubmission),
    Updated(ProjectSubmission),
    /// Outside the submission window; nothing was written
    NotAccepting,
}

/// What a student sees on a project page
#[derive(Debug, Clone, Serialize)]
pub struct ProjectView {
    pub project: Project,
    pub submission: Option<ProjectSubmission>,
    pub accepting_submissions: bool,
    /// Form is read-only
    pub disabled: bool,
}

/// Service for student project submissions
pub struct SubmissionService<PR, ER, SR>
where
    PR: ProjectRepository,
    ER: EnrollmentRepository,
    SR: SubmissionRepository,
{
    projects: Arc<PR>,
    enrollments: Arc<ER>,
    submissions: Arc<SR>,
}

impl<PR, ER, SR> SubmissionService<PR, ER, SR>
where
    PR: ProjectRepository,
    ER: EnrollmentRepository,
    SR: SubmissionRepository,
{
    pub fn new(projects: Arc<PR>, enrollments: Arc<ER>, submissions: Arc<SR>) -> Self {
        Self {
            projects,
            enrollments,
            submissions,
        }
    }

    async fn load_project(&self, project_id: &ProjectId) -> Result<Project, AppError> {
        Ok(self
            .projects
            .find_by_id(project_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Project not found: {}", project_id)))?)
    }

    /// Build the project page for a (possibly anonymous) student
    pub async fn project_view(
        &self,
        project_id: &ProjectId,
        student_id: Option<&UserId>,
        now: DateTime<Utc>,
    ) -> Result<ProjectView, AppError> {
        let project = self.load_project(project_id).await?;

        let submission = match student_id {
            Some(student_id) => {
                self.submissions
                    .find_by_project_and_student(project_id, student_id)
                    .await?
            }
            None => None,
        };

        let accepting_submissions = lifecycle::accepting_submissions(&project, now);

        Ok(ProjectView {
            project,
            submission,
            accepting_submissions,
            disabled: !accepting_submissions,
        })
    }

    /// Submit or re-submit a project
    pub async fn submit(
        &self,
        project_id: &ProjectId,
        student_id: &UserId,
        form: SubmissionForm,
        now: DateTime<Utc>,
    ) -> Result<SubmissionOutcome, AppError> {
        let project = self.load_project(project_id).await?;

        if let Err(e) = lifecycle::check(&project, ProjectOperation::Submit, now) {
            if e.is_outside_window() {
                tracing::debug!(
                    project_id = %project_id,
                    student_id = %student_id,
                    reason = %e,
                    "Submission outside window ignored"
                );
                return Ok(SubmissionOutcome::NotAccepting);
            }
            return Err(e.into());
        }

        let form = form.validated()?;

        let (enrollment, enrolled_now) = self
            .enrollments
            .get_or_create(&NewEnrollment {
                course_id: project.course_id,
                student_id: *student_id,
            })
            .await?;
        if enrolled_now {
            tracing::info!(
                course_id = %project.course_id,
                student_id = %student_id,
                "Enrolled student on first submission"
            );
        }

        let (submission, created) = self
            .submissions
            .get_or_create(&NewProjectSubmission {
                project_id: *project_id,
                student_id: *student_id,
                enrollment_id: enrollment.id,
                form: form.clone(),
            })
            .await?;

        if created {
            tracing::info!(
                project_id = %project_id,
                submission_id = %submission.id,
                "Project submitted"
            );
            return Ok(SubmissionOutcome::Created(submission));
        }

        let updated = self.submissions.update_form(&submission.id, &form).await?;
        tracing::info!(
            project_id = %project_id,
            submission_id = %updated.id,
            "Project submission updated"
        );
        Ok(SubmissionOutcome::Updated(updated))
    }
}
