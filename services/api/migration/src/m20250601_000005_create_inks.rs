use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Inks::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Inks::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Inks::Content).text().not_null())
                    .col(ColumnDef::new(Inks::AuthorId).uuid().not_null())
                    .col(
                        ColumnDef::new(Inks::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Inks::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Inks::ReadingTime)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Inks::Views).integer().not_null().default(0))
                    .col(ColumnDef::new(Inks::Kind).string().not_null())
                    .col(ColumnDef::new(Inks::Theme).string().not_null())
                    .col(
                        ColumnDef::new(Inks::Visibility)
                            .string()
                            .not_null()
                            .default("public"),
                    )
                    .col(
                        ColumnDef::new(Inks::IsPinned)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Inks::Table, Inks::AuthorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Inks::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Inks {
    Table,
    Id,
    Content,
    AuthorId,
    CreatedAt,
    UpdatedAt,
    ReadingTime,
    Views,
    Kind,
    Theme,
    Visibility,
    IsPinned,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
