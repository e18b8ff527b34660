//! PostgreSQL adapter for PeerReviewRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, SqlErr, TransactionTrait,
};
use uuid::Uuid;

use crate::domain::entities::{
    NewPeerReview, PeerReview, PeerReviewId, PeerReviewState, ProjectId, SubmissionId,
};
use crate::domain::ports::PeerReviewRepository;
use crate::entity::peer_reviews;
use crate::error::DomainError;

/// PostgreSQL implementation of PeerReviewRepository
pub struct PostgresPeerReviewRepository {
    db: DatabaseConnection,
}

impl PostgresPeerReviewRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PeerReviewRepository for PostgresPeerReviewRepository {
    async fn find_by_id(&self, id: &PeerReviewId) -> Result<Option<PeerReview>, DomainError> {
        let result = peer_reviews::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn find_by_project(
        &self,
        project_id: &ProjectId,
    ) -> Result<Vec<PeerReview>, DomainError> {
        let results = peer_reviews::Entity::find()
            .filter(peer_reviews::Column::ProjectId.eq(project_id.0))
            .order_by_asc(peer_reviews::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn find_by_reviewer(
        &self,
        reviewer: &SubmissionId,
    ) -> Result<Vec<PeerReview>, DomainError> {
        let results = peer_reviews::Entity::find()
            .filter(peer_reviews::Column::ReviewerId.eq(reviewer.0))
            .order_by_asc(peer_reviews::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn count_by_project(&self, project_id: &ProjectId) -> Result<u64, DomainError> {
        peer_reviews::Entity::find()
            .filter(peer_reviews::Column::ProjectId.eq(project_id.0))
            .count(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))
    }

    async fn create_many(&self, reviews: &[NewPeerReview]) -> Result<Vec<PeerReview>, DomainError> {
        if let Some(review) = reviews.iter().find(|r| r.is_self_review()) {
            return Err(DomainError::Validation(format!(
                "Submission {} cannot review itself",
                review.reviewer
            )));
        }
        if reviews.is_empty() {
            return Ok(Vec::new());
        }

        let now = Utc::now().fixed_offset();
        let models: Vec<peer_reviews::ActiveModel> = reviews
            .iter()
            .map(|review| peer_reviews::ActiveModel {
                id: Set(Uuid::new_v4()),
                project_id: Set(review.project_id.0),
                reviewer_id: Set(review.reviewer.0),
                reviewee_id: Set(review.reviewee.0),
                state: Set(PeerReviewState::Assigned.code().to_string()),
                submitted_at: Set(None),
                created_at: Set(now),
            })
            .collect();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        let mut created = Vec::with_capacity(models.len());
        for model in models {
            let result = model.insert(&txn).await.map_err(|e| match e.sql_err() {
                // Unique (reviewer, reviewee) violation
                Some(SqlErr::UniqueConstraintViolation(detail)) => {
                    DomainError::Conflict(format!("Peer review already exists: {}", detail))
                }
                _ => DomainError::Database(e.to_string()),
            })?;
            created.push(result.into());
        }

        txn.commit()
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(created)
    }

    async fn mark_submitted(
        &self,
        id: &PeerReviewId,
        submitted_at: DateTime<Utc>,
    ) -> Result<PeerReview, DomainError> {
        let result = peer_reviews::ActiveModel {
            id: Set(id.0),
            state: Set(PeerReviewState::Submitted.code().to_string()),
            submitted_at: Set(Some(submitted_at.fixed_offset())),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(|e| match e {
            DbErr::RecordNotUpdated => DomainError::NotFound(format!("Review not found: {}", id)),
            other => DomainError::Database(other.to_string()),
        })?;

        Ok(result.into())
    }
}

/// Convert SeaORM model to domain entity
impl From<peer_reviews::Model> for PeerReview {
    fn from(model: peer_reviews::Model) -> Self {
        PeerReview {
            id: PeerReviewId(model.id),
            project_id: ProjectId(model.project_id),
            reviewer: SubmissionId(model.reviewer_id),
            reviewee: SubmissionId(model.reviewee_id),
            state: model.state.parse().unwrap_or(PeerReviewState::Assigned),
            submitted_at: model.submitted_at.map(|dt| dt.with_timezone(&Utc)),
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}
