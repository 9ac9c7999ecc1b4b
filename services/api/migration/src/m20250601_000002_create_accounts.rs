use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Accounts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Accounts::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Accounts::UserId).uuid().not_null())
                    .col(ColumnDef::new(Accounts::Kind).string().not_null())
                    .col(ColumnDef::new(Accounts::Provider).string().not_null())
                    .col(
                        ColumnDef::new(Accounts::ProviderAccountId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Accounts::RefreshToken).text())
                    .col(ColumnDef::new(Accounts::AccessToken).text())
                    .col(ColumnDef::new(Accounts::ExpiresAt).big_integer())
                    .col(ColumnDef::new(Accounts::TokenType).string())
                    .col(ColumnDef::new(Accounts::Scope).string())
                    .col(ColumnDef::new(Accounts::IdToken).text())
                    .col(ColumnDef::new(Accounts::SessionState).string())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Accounts::Table, Accounts::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(Accounts::Table)
                    .col(Accounts::Provider)
                    .col(Accounts::ProviderAccountId)
                    .unique()
                    .name("uq_accounts_provider_provider_account_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Accounts::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Accounts {
    Table,
    Id,
    UserId,
    Kind,
    Provider,
    ProviderAccountId,
    RefreshToken,
    AccessToken,
    ExpiresAt,
    TokenType,
    Scope,
    IdToken,
    SessionState,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
