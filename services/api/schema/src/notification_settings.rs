use sea_orm::entity::prelude::*;

/// Per-user notification preferences. At most one row per user.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "notification_settings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub user_id: Uuid,
    pub push_enabled: bool,
    pub new_follower: bool,
    pub new_reaction: bool,
    pub trending_inks: bool,
    pub followed_user_inks: bool,
    pub most_reacted: bool,
    pub suggestions: bool,
    pub editors_pick: bool,
    /// Stored `inkwell_domain::settings::PermissionStatus` column value.
    pub permission_status: String,
    pub last_updated: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
