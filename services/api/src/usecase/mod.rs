pub mod auth;
pub mod follow;
pub mod ink;
pub mod onboarding;
pub mod reaction;
pub mod settings;
pub mod user;
