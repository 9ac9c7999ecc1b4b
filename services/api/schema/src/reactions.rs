use sea_orm::entity::prelude::*;

/// Typed engagement on an ink. Unique per (ink, user, kind).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "reactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub ink_id: Uuid,
    pub user_id: Uuid,
    /// Stored `inkwell_domain::reaction::ReactionKind` column value.
    pub kind: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::inks::Entity",
        from = "Column::InkId",
        to = "super::inks::Column::Id"
    )]
    Ink,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
}

impl Related<super::inks::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ink.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
