//! PostgreSQL adapter for CriteriaResponseRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use uuid::Uuid;

use crate::domain::entities::{
    CriteriaId, CriteriaResponse, CriteriaResponseId, NewCriteriaResponse, PeerReviewId,
};
use crate::domain::ports::CriteriaResponseRepository;
use crate::entity::criteria_responses;
use crate::error::DomainError;

/// PostgreSQL implementation of CriteriaResponseRepository
pub struct PostgresCriteriaResponseRepository {
    db: DatabaseConnection,
}

impl PostgresCriteriaResponseRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CriteriaResponseRepository for PostgresCriteriaResponseRepository {
    async fn find_by_reviews(
        &self,
        review_ids: &[PeerReviewId],
    ) -> Result<Vec<CriteriaResponse>, DomainError> {
        if review_ids.is_empty() {
            return Ok(Vec::new());
        }

        let results = criteria_responses::Entity::find()
            .filter(criteria_responses::Column::ReviewId.is_in(review_ids.iter().map(|id| id.0)))
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn replace_for_review(
        &self,
        review_id: &PeerReviewId,
        responses: &[NewCriteriaResponse],
    ) -> Result<Vec<CriteriaResponse>, DomainError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        criteria_responses::Entity::delete_many()
            .filter(criteria_responses::Column::ReviewId.eq(review_id.0))
            .exec(&txn)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        let mut created = Vec::with_capacity(responses.len());
        for response in responses {
            let result = criteria_responses::ActiveModel {
                id: Set(Uuid::new_v4()),
                review_id: Set(review_id.0),
                criteria_id: Set(response.criteria_id.0),
                answer: Set(response.answer.clone()),
            }
            .insert(&txn)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;
            created.push(result.into());
        }

        txn.commit()
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(created)
    }
}

/// Convert SeaORM model to domain entity
impl From<criteria_responses::Model> for CriteriaResponse {
    fn from(model: criteria_responses::Model) -> Self {
        CriteriaResponse {
            id: CriteriaResponseId(model.id),
            review_id: PeerReviewId(model.review_id),
            criteria_id: CriteriaId(model.criteria_id),
            answer: model.answer,
        }
    }
}
