//! SeaORM entities for the Inkwell relational schema.

pub mod accounts;
pub mod follows;
pub mod inks;
pub mod notification_settings;
pub mod onboarding_profiles;
pub mod reactions;
pub mod sessions;
pub mod users;
pub mod verification_tokens;
