//! PostgreSQL adapter for SubmissionRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::domain::entities::{
    EnrollmentId, NewProjectSubmission, ProjectId, ProjectSubmission, SubmissionForm,
    SubmissionId, SubmissionScore, UserId,
};
use crate::domain::ports::SubmissionRepository;
use crate::entity::project_submissions;
use crate::error::DomainError;

/// PostgreSQL implementation of SubmissionRepository
pub struct PostgresSubmissionRepository {
    db: DatabaseConnection,
}

impl PostgresSubmissionRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SubmissionRepository for PostgresSubmissionRepository {
    async fn find_by_id(
        &self,
        id: &SubmissionId,
    ) -> Result<Option<ProjectSubmission>, DomainError> {
        let result = project_submissions::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn find_by_project(
        &self,
        project_id: &ProjectId,
    ) -> Result<Vec<ProjectSubmission>, DomainError> {
        let results = project_submissions::Entity::find()
            .filter(project_submissions::Column::ProjectId.eq(project_id.0))
            .order_by_asc(project_submissions::Column::SubmittedAt)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn find_by_project_and_student(
        &self,
        project_id: &ProjectId,
        student_id: &UserId,
    ) -> Result<Option<ProjectSubmission>, DomainError> {
        let result = project_submissions::Entity::find()
            .filter(project_submissions::Column::ProjectId.eq(project_id.0))
            .filter(project_submissions::Column::StudentId.eq(student_id.0))
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn get_or_create(
        &self,
        submission: &NewProjectSubmission,
    ) -> Result<(ProjectSubmission, bool), DomainError> {
        let form = &submission.form;
        let model = project_submissions::ActiveModel {
            id: Set(Uuid::new_v4()),
            project_id: Set(submission.project_id.0),
            student_id: Set(submission.student_id.0),
            enrollment_id: Set(submission.enrollment_id.0),
            github_link: Set(form.github_link.clone()),
            commit_id: Set(form.commit_id.clone()),
            time_spent: Set(form.time_spent),
            problems_comments: Set(form.problems_comments.clone()),
            faq_contribution: Set(form.faq_contribution.clone()),
            submitted_at: Set(Utc::now().fixed_offset()),
            peer_review_score: Set(None),
            needs_manual_review: Set(false),
            reviews_completed: Set(0),
        };

        let inserted = project_submissions::Entity::insert(model)
            .on_conflict(
                OnConflict::columns([
                    project_submissions::Column::ProjectId,
                    project_submissions::Column::StudentId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        let existing = self
            .find_by_project_and_student(&submission.project_id, &submission.student_id)
            .await?
            .ok_or_else(|| {
                DomainError::Internal("Submission missing after insert".to_string())
            })?;

        Ok((existing, inserted == 1))
    }

    async fn update_form(
        &self,
        id: &SubmissionId,
        form: &SubmissionForm,
    ) -> Result<ProjectSubmission, DomainError> {
        let result = project_submissions::ActiveModel {
            id: Set(id.0),
            github_link: Set(form.github_link.clone()),
            commit_id: Set(form.commit_id.clone()),
            time_spent: Set(form.time_spent),
            problems_comments: Set(form.problems_comments.clone()),
            faq_contribution: Set(form.faq_contribution.clone()),
            submitted_at: Set(Utc::now().fixed_offset()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(|e| match e {
            DbErr::RecordNotUpdated => {
                DomainError::NotFound(format!("Submission not found: {}", id))
            }
            other => DomainError::Database(other.to_string()),
        })?;

        Ok(result.into())
    }

    async fn record_scores(&self, scores: &[SubmissionScore]) -> Result<(), DomainError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        for score in scores {
            project_submissions::ActiveModel {
                id: Set(score.submission_id.0),
                peer_review_score: Set(score.peer_review_score),
                needs_manual_review: Set(score.needs_manual_review),
                reviews_completed: Set(score.reviews_completed),
                ..Default::default()
            }
            .update(&txn)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;
        }

        txn.commit()
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(())
    }
}

/// Convert SeaORM model to domain entity
impl From<project_submissions::Model> for ProjectSubmission {
    fn from(model: project_submissions::Model) -> Self {
        ProjectSubmission {
            id: SubmissionId(model.id),
            project_id: ProjectId(model.project_id),
            student_id: UserId(model.student_id),
            enrollment_id: EnrollmentId(model.enrollment_id),
            github_link: model.github_link,
            commit_id: model.commit_id,
            time_spent: model.time_spent,
            problems_comments: model.problems_comments,
            faq_contribution: model.faq_contribution,
            submitted_at: model.submitted_at.with_timezone(&Utc),
            peer_review_score: model.peer_review_score,
            needs_manual_review: model.needs_manual_review,
            reviews_completed: model.reviews_completed,
        }
    }
}
