//! PostgreSQL adapter for EnrollmentRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::domain::entities::{CourseId, Enrollment, EnrollmentId, NewEnrollment, UserId};
use crate::domain::ports::EnrollmentRepository;
use crate::entity::enrollments;
use crate::error::DomainError;

/// PostgreSQL implementation of EnrollmentRepository
pub struct PostgresEnrollmentRepository {
    db: DatabaseConnection,
}

impl PostgresEnrollmentRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl EnrollmentRepository for PostgresEnrollmentRepository {
    async fn find(
        &self,
        course_id: &CourseId,
        student_id: &UserId,
    ) -> Result<Option<Enrollment>, DomainError> {
        let result = enrollments::Entity::find()
            .filter(enrollments::Column::CourseId.eq(course_id.0))
            .filter(enrollments::Column::StudentId.eq(student_id.0))
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn get_or_create(
        &self,
        enrollment: &NewEnrollment,
    ) -> Result<(Enrollment, bool), DomainError> {
        let model = enrollments::ActiveModel {
            id: Set(Uuid::new_v4()),
            course_id: Set(enrollment.course_id.0),
            student_id: Set(enrollment.student_id.0),
            enrollment_date: Set(Utc::now().fixed_offset()),
        };

        // The unique (course_id, student_id) index arbitrates concurrent inserts
        let inserted = enrollments::Entity::insert(model)
            .on_conflict(
                OnConflict::columns([
                    enrollments::Column::CourseId,
                    enrollments::Column::StudentId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        let existing = self
            .find(&enrollment.course_id, &enrollment.student_id)
            .await?
            .ok_or_else(|| {
                DomainError::Internal("Enrollment missing after insert".to_string())
            })?;

        Ok((existing, inserted == 1))
    }
}

/// Convert SeaORM model to domain entity
impl From<enrollments::Model> for Enrollment {
    fn from(model: enrollments::Model) -> Self {
        Enrollment {
            id: EnrollmentId(model.id),
            course_id: CourseId(model.course_id),
            student_id: UserId(model.student_id),
            enrollment_date: model.enrollment_date.with_timezone(&Utc),
        }
    }
}
