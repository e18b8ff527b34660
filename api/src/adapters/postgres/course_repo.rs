//! PostgreSQL adapter for CourseRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

use crate::domain::entities::{Course, CourseId, UserId};
use crate::domain::ports::CourseRepository;
use crate::entity::courses;
use crate::error::DomainError;

/// PostgreSQL implementation of CourseRepository
pub struct PostgresCourseRepository {
    db: DatabaseConnection,
}

impl PostgresCourseRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CourseRepository for PostgresCourseRepository {
    async fn find_by_id(&self, id: &CourseId) -> Result<Option<Course>, DomainError> {
        let result = courses::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn find_all(&self) -> Result<Vec<Course>, DomainError> {
        let results = courses::Entity::find()
            .order_by_asc(courses::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn find_by_instructor(
        &self,
        instructor_id: &UserId,
    ) -> Result<Vec<Course>, DomainError> {
        let results = courses::Entity::find()
            .filter(courses::Column::InstructorId.eq(instructor_id.0))
            .order_by_asc(courses::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }
}

/// Convert SeaORM model to domain entity
impl From<courses::Model> for Course {
    fn from(model: courses::Model) -> Self {
        Course {
            id: CourseId(model.id),
            slug: model.slug,
            title: model.title,
            description: model.description,
            instructor_id: UserId(model.instructor_id),
            finished: model.finished,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}
