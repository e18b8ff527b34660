use sea_orm::entity::prelude::*;

/// Unique on (reviewer_id, reviewee_id). `state` holds AS or SU.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "peer_reviews")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub project_id: Uuid,
    pub reviewer_id: Uuid,
    pub reviewee_id: Uuid,
    pub state: String,
    pub submitted_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::projects::Entity",
        from = "Column::ProjectId",
        to = "super::projects::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Project,
    #[sea_orm(has_many = "super::criteria_responses::Entity")]
    CriteriaResponses,
}

impl Related<super::projects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Project.def()
    }
}

impl Related<super::criteria_responses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CriteriaResponses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
