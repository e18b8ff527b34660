use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "criteria_responses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub review_id: Uuid,
    pub criteria_id: Uuid,
    pub answer: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::peer_reviews::Entity",
        from = "Column::ReviewId",
        to = "super::peer_reviews::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    PeerReview,
}

impl Related<super::peer_reviews::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PeerReview.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
