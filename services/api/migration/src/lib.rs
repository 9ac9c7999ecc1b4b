use sea_orm_migration::prelude::*;

mod m20250601_000001_create_users;
mod m20250601_000002_create_accounts;
mod m20250601_000003_create_sessions;
mod m20250601_000004_create_verification_tokens;
mod m20250601_000005_create_inks;
mod m20250601_000006_create_reactions;
mod m20250601_000007_create_follows;
mod m20250601_000008_create_notification_settings;
mod m20250601_000009_create_onboarding_profiles;
mod m20250601_000010_add_lookup_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250601_000001_create_users::Migration),
            Box::new(m20250601_000002_create_accounts::Migration),
            Box::new(m20250601_000003_create_sessions::Migration),
            Box::new(m20250601_000004_create_verification_tokens::Migration),
            Box::new(m20250601_000005_create_inks::Migration),
            Box::new(m20250601_000006_create_reactions::Migration),
            Box::new(m20250601_000007_create_follows::Migration),
            Box::new(m20250601_000008_create_notification_settings::Migration),
            Box::new(m20250601_000009_create_onboarding_profiles::Migration),
            Box::new(m20250601_000010_add_lookup_indexes::Migration),
        ]
    }
}
