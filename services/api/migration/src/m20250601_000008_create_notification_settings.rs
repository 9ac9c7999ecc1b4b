use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(NotificationSettings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(NotificationSettings::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(NotificationSettings::UserId)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(bool_col(NotificationSettings::PushEnabled, false))
                    .col(bool_col(NotificationSettings::NewFollower, true))
                    .col(bool_col(NotificationSettings::NewReaction, true))
                    .col(bool_col(NotificationSettings::TrendingInks, true))
                    .col(bool_col(NotificationSettings::FollowedUserInks, true))
                    .col(bool_col(NotificationSettings::MostReacted, false))
                    .col(bool_col(NotificationSettings::Suggestions, true))
                    .col(bool_col(NotificationSettings::EditorsPick, false))
                    .col(
                        ColumnDef::new(NotificationSettings::PermissionStatus)
                            .string()
                            .not_null()
                            .default("default"),
                    )
                    .col(
                        ColumnDef::new(NotificationSettings::LastUpdated)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(NotificationSettings::Table, NotificationSettings::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(NotificationSettings::Table).to_owned())
            .await
    }
}

fn bool_col(name: NotificationSettings, default: bool) -> ColumnDef {
    let mut col = ColumnDef::new(name);
    col.boolean().not_null().default(default);
    col
}

#[derive(Iden)]
enum NotificationSettings {
    Table,
    Id,
    UserId,
    PushEnabled,
    NewFollower,
    NewReaction,
    TrendingInks,
    FollowedUserInks,
    MostReacted,
    Suggestions,
    EditorsPick,
    PermissionStatus,
    LastUpdated,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
