//! PostgreSQL adapter for ReviewCriteriaRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::domain::entities::{
    CourseId, CriteriaId, NewReviewCriteria, ReviewCriteria, ReviewCriteriaType,
    ScoringDirection,
};
use crate::domain::ports::ReviewCriteriaRepository;
use crate::entity::review_criteria;
use crate::error::DomainError;

/// PostgreSQL implementation of ReviewCriteriaRepository
pub struct PostgresReviewCriteriaRepository {
    db: DatabaseConnection,
}

impl PostgresReviewCriteriaRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ReviewCriteriaRepository for PostgresReviewCriteriaRepository {
    async fn find_by_course(
        &self,
        course_id: &CourseId,
    ) -> Result<Vec<ReviewCriteria>, DomainError> {
        let results = review_criteria::Entity::find()
            .filter(review_criteria::Column::CourseId.eq(course_id.0))
            .order_by_asc(review_criteria::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn create(&self, criteria: &NewReviewCriteria) -> Result<ReviewCriteria, DomainError> {
        let model = review_criteria::ActiveModel {
            id: Set(Uuid::new_v4()),
            course_id: Set(criteria.course_id.0),
            description: Set(criteria.description.clone()),
            review_criteria_type: Set(criteria.review_criteria_type.code().to_string()),
            options: Set(serde_json::json!(criteria.options)),
            direction: Set(criteria.direction.to_string()),
            created_at: Set(Utc::now().fixed_offset()),
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.into())
    }
}

/// Convert SeaORM model to domain entity.
///
/// Corrupt type, option or direction columns fall back to defaults with a
/// warning, since answers stored against the criterion will not decode.
impl From<review_criteria::Model> for ReviewCriteria {
    fn from(model: review_criteria::Model) -> Self {
        let review_criteria_type = match model.review_criteria_type.parse() {
            Ok(kind) => kind,
            Err(_) => {
                tracing::warn!(
                    criteria_id = %model.id,
                    code = %model.review_criteria_type,
                    "Unknown criteria type code, treating as radio buttons"
                );
                ReviewCriteriaType::RadioButtons
            }
        };

        let options = match serde_json::from_value::<Vec<String>>(model.options) {
            Ok(options) => options,
            Err(e) => {
                tracing::warn!(
                    criteria_id = %model.id,
                    error = %e,
                    "Criteria options are not a list of labels, using no options"
                );
                Vec::new()
            }
        };

        let direction = match model.direction.parse() {
            Ok(direction) => direction,
            Err(_) => {
                tracing::warn!(
                    criteria_id = %model.id,
                    direction = %model.direction,
                    "Unknown scoring direction, using the default"
                );
                ScoringDirection::default()
            }
        };

        ReviewCriteria {
            id: CriteriaId(model.id),
            course_id: CourseId(model.course_id),
            description: model.description,
            review_criteria_type,
            options,
            direction,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(kind: &str, options: serde_json::Value, direction: &str) -> review_criteria::Model {
        review_criteria::Model {
            id: Uuid::new_v4(),
            course_id: Uuid::new_v4(),
            description: "Best practices".to_string(),
            review_criteria_type: kind.to_string(),
            options,
            direction: direction.to_string(),
            created_at: Utc::now().fixed_offset(),
        }
    }

    #[test]
    fn stored_row_converts() {
        let criteria: ReviewCriteria = model(
            "CB",
            serde_json::json!(["Tests", "Linter"]),
            "lower_is_better",
        )
        .into();

        assert_eq!(criteria.review_criteria_type, ReviewCriteriaType::Checkboxes);
        assert_eq!(criteria.options, vec!["Tests", "Linter"]);
        assert_eq!(criteria.direction, ScoringDirection::LowerIsBetter);
    }

    #[test]
    fn corrupt_columns_fall_back() {
        let criteria: ReviewCriteria =
            model("XX", serde_json::json!({ "not": "a list" }), "sideways").into();

        assert_eq!(criteria.review_criteria_type, ReviewCriteriaType::RadioButtons);
        assert!(criteria.options.is_empty());
        assert_eq!(criteria.direction, ScoringDirection::HigherIsBetter);
    }
}
