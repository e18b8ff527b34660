//! PostgreSQL adapter for ProjectRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    SqlErr,
};
use uuid::Uuid;

use crate::domain::entities::{CourseId, NewProject, Project, ProjectId, ProjectState};
use crate::domain::ports::ProjectRepository;
use crate::entity::projects;
use crate::error::DomainError;

/// PostgreSQL implementation of ProjectRepository
pub struct PostgresProjectRepository {
    db: DatabaseConnection,
}

impl PostgresProjectRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProjectRepository for PostgresProjectRepository {
    async fn find_by_id(&self, id: &ProjectId) -> Result<Option<Project>, DomainError> {
        let result = projects::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn find_by_course(&self, course_id: &CourseId) -> Result<Vec<Project>, DomainError> {
        let results = projects::Entity::find()
            .filter(projects::Column::CourseId.eq(course_id.0))
            .order_by_asc(projects::Column::SubmissionDueDate)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn find_by_state(&self, state: ProjectState) -> Result<Vec<Project>, DomainError> {
        let results = projects::Entity::find()
            .filter(projects::Column::State.eq(state.code()))
            .order_by_asc(projects::Column::SubmissionDueDate)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn create(&self, project: &NewProject) -> Result<Project, DomainError> {
        let model = projects::ActiveModel {
            id: Set(Uuid::new_v4()),
            course_id: Set(project.course_id.0),
            slug: Set(project.slug.clone()),
            title: Set(project.title.clone()),
            description: Set(project.description.clone()),
            submission_due_date: Set(project.submission_due_date.fixed_offset()),
            peer_review_due_date: Set(project.peer_review_due_date.fixed_offset()),
            state: Set(ProjectState::CollectingSubmissions.code().to_string()),
            points_for_peer_review: Set(project.points_for_peer_review),
            created_at: Set(Utc::now().fixed_offset()),
        };

        let result = model.insert(&self.db).await.map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => DomainError::AlreadyExists(format!(
                "Project slug already used in course: {}",
                project.slug
            )),
            _ => DomainError::Database(e.to_string()),
        })?;

        Ok(result.into())
    }

    async fn transition_state(
        &self,
        id: &ProjectId,
        from: ProjectState,
        to: ProjectState,
    ) -> Result<bool, DomainError> {
        let result = projects::Entity::update_many()
            .col_expr(projects::Column::State, Expr::value(to.code()))
            .filter(projects::Column::Id.eq(id.0))
            .filter(projects::Column::State.eq(from.code()))
            .exec(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.rows_affected == 1)
    }
}

/// Convert SeaORM model to domain entity
impl From<projects::Model> for Project {
    fn from(model: projects::Model) -> Self {
        Project {
            id: ProjectId(model.id),
            course_id: CourseId(model.course_id),
            slug: model.slug,
            title: model.title,
            description: model.description,
            submission_due_date: model.submission_due_date.with_timezone(&Utc),
            peer_review_due_date: model.peer_review_due_date.with_timezone(&Utc),
            // Unknown codes are treated as closed
            state: model.state.parse().unwrap_or(ProjectState::Closed),
            points_for_peer_review: model.points_for_peer_review,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}
