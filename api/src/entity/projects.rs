use sea_orm::entity::prelude::*;

/// `state` holds the two-letter lifecycle code (CS, PR, CO, CL)
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "projects")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub course_id: Uuid,
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub submission_due_date: DateTimeWithTimeZone,
    pub peer_review_due_date: DateTimeWithTimeZone,
    pub state: String,
    pub points_for_peer_review: f64,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::courses::Entity",
        from = "Column::CourseId",
        to = "super::courses::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Course,
    #[sea_orm(has_many = "super::project_submissions::Entity")]
    ProjectSubmissions,
    #[sea_orm(has_many = "super::peer_reviews::Entity")]
    PeerReviews,
}

impl Related<super::courses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl Related<super::project_submissions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProjectSubmissions.def()
    }
}

impl Related<super::peer_reviews::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PeerReviews.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
