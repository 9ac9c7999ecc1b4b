use sea_orm::DatabaseConnection;

use crate::infra::db::{
    DbAccountRepository, DbFollowRepository, DbInkRepository, DbNotificationSettingsRepository,
    DbOnboardingRepository, DbReactionRepository, DbSessionRepository, DbSignInPort,
    DbUserRepository, DbVerificationTokenRepository,
};

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
}

impl AppState {
    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn account_repo(&self) -> DbAccountRepository {
        DbAccountRepository {
            db: self.db.clone(),
        }
    }

    pub fn session_repo(&self) -> DbSessionRepository {
        DbSessionRepository {
            db: self.db.clone(),
        }
    }

    pub fn verification_token_repo(&self) -> DbVerificationTokenRepository {
        DbVerificationTokenRepository {
            db: self.db.clone(),
        }
    }

    pub fn sign_in_port(&self) -> DbSignInPort {
        DbSignInPort {
            db: self.db.clone(),
        }
    }

    pub fn ink_repo(&self) -> DbInkRepository {
        DbInkRepository {
            db: self.db.clone(),
        }
    }

    pub fn reaction_repo(&self) -> DbReactionRepository {
        DbReactionRepository {
            db: self.db.clone(),
        }
    }

    pub fn follow_repo(&self) -> DbFollowRepository {
        DbFollowRepository {
            db: self.db.clone(),
        }
    }

    pub fn settings_repo(&self) -> DbNotificationSettingsRepository {
        DbNotificationSettingsRepository {
            db: self.db.clone(),
        }
    }

    pub fn onboarding_repo(&self) -> DbOnboardingRepository {
        DbOnboardingRepository {
            db: self.db.clone(),
        }
    }
}
