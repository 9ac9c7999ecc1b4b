use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .table(Inks::Table)
                    .col(Inks::AuthorId)
                    .name("idx_inks_author_id")
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(Inks::Table)
                    .col(Inks::CreatedAt)
                    .name("idx_inks_created_at")
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(Reactions::Table)
                    .col(Reactions::InkId)
                    .name("idx_reactions_ink_id")
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(Sessions::Table)
                    .col(Sessions::UserId)
                    .name("idx_sessions_user_id")
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(Follows::Table)
                    .col(Follows::FollowingId)
                    .name("idx_follows_following_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_follows_following_id").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_sessions_user_id").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_reactions_ink_id").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_inks_created_at").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_inks_author_id").to_owned())
            .await
    }
}

#[derive(Iden)]
enum Inks {
    Table,
    AuthorId,
    CreatedAt,
}

#[derive(Iden)]
enum Reactions {
    Table,
    InkId,
}

#[derive(Iden)]
enum Sessions {
    Table,
    UserId,
}

#[derive(Iden)]
enum Follows {
    Table,
    FollowingId,
}
