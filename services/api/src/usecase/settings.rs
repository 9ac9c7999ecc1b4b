use chrono::Utc;
use uuid::Uuid;

use inkwell_domain::settings::PermissionStatus;

use crate::domain::repository::NotificationSettingsRepository;
use crate::domain::types::{NotificationFlagsPatch, NotificationSettings};
use crate::error::ApiError;

// ── GetSettings ──────────────────────────────────────────────────────────────

pub struct GetSettingsUseCase<N: NotificationSettingsRepository> {
    pub settings: N,
}

impl<N: NotificationSettingsRepository> GetSettingsUseCase<N> {
    /// Users without a stored row get the defaults, unpersisted.
    pub async fn execute(&self, user_id: Uuid) -> Result<NotificationSettings, ApiError> {
        match self.settings.find_by_user(user_id).await? {
            Some(settings) => Ok(settings),
            None => Ok(NotificationSettings::defaults_for(user_id, Utc::now())),
        }
    }
}

// ── PutSettings ──────────────────────────────────────────────────────────────

pub struct PutSettingsInput {
    pub push_enabled: bool,
    pub new_follower: bool,
    pub new_reaction: bool,
    pub trending_inks: bool,
    pub followed_user_inks: bool,
    pub most_reacted: bool,
    pub suggestions: bool,
    pub editors_pick: bool,
    pub permission_status: PermissionStatus,
}

pub struct PutSettingsUseCase<N: NotificationSettingsRepository> {
    pub settings: N,
}

impl<N: NotificationSettingsRepository> PutSettingsUseCase<N> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        input: PutSettingsInput,
    ) -> Result<NotificationSettings, ApiError> {
        let settings = NotificationSettings {
            id: Uuid::now_v7(),
            user_id,
            push_enabled: input.push_enabled,
            new_follower: input.new_follower,
            new_reaction: input.new_reaction,
            trending_inks: input.trending_inks,
            followed_user_inks: input.followed_user_inks,
            most_reacted: input.most_reacted,
            suggestions: input.suggestions,
            editors_pick: input.editors_pick,
            permission_status: input.permission_status,
            last_updated: Utc::now(),
        };
        self.settings.upsert(&settings).await?;
        Ok(settings)
    }
}

// ── PatchSettings ────────────────────────────────────────────────────────────

pub struct PatchSettingsUseCase<N: NotificationSettingsRepository> {
    pub settings: N,
}

impl<N: NotificationSettingsRepository> PatchSettingsUseCase<N> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        patch: NotificationFlagsPatch,
    ) -> Result<(), ApiError> {
        if patch.is_empty() {
            return Err(ApiError::MissingData);
        }
        self.settings
            .update_flags(user_id, &patch, Utc::now())
            .await
    }
}
