use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use inkwell_core::identity::Identity;
use inkwell_domain::settings::PermissionStatus;

use crate::domain::types::{NotificationFlagsPatch, NotificationSettings};
use crate::error::ApiError;
use crate::state::AppState;
use crate::usecase::settings::{
    GetSettingsUseCase, PatchSettingsUseCase, PutSettingsInput, PutSettingsUseCase,
};

// ── Response type ────────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct SettingsResponse {
    pub push_enabled: bool,
    pub new_follower: bool,
    pub new_reaction: bool,
    pub trending_inks: bool,
    pub followed_user_inks: bool,
    pub most_reacted: bool,
    pub suggestions: bool,
    pub editors_pick: bool,
    pub permission_status: PermissionStatus,
    #[serde(serialize_with = "inkwell_core::serde::to_rfc3339_ms")]
    pub last_updated: chrono::DateTime<chrono::Utc>,
}

impl From<NotificationSettings> for SettingsResponse {
    fn from(s: NotificationSettings) -> Self {
        Self {
            push_enabled: s.push_enabled,
            new_follower: s.new_follower,
            new_reaction: s.new_reaction,
            trending_inks: s.trending_inks,
            followed_user_inks: s.followed_user_inks,
            most_reacted: s.most_reacted,
            suggestions: s.suggestions,
            editors_pick: s.editors_pick,
            permission_status: s.permission_status,
            last_updated: s.last_updated,
        }
    }
}

// ── GET /users/@me/notification-settings ─────────────────────────────────────

pub async fn get_settings(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<Json<SettingsResponse>, ApiError> {
    let usecase = GetSettingsUseCase {
        settings: state.settings_repo(),
    };
    let settings = usecase.execute(identity.user_id).await?;
    Ok(Json(settings.into()))
}

// ── PUT /users/@me/notification-settings ─────────────────────────────────────

#[derive(Deserialize)]
pub struct PutSettingsRequest {
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

pub async fn put_settings(
    identity: Identity,
    State(state): State<AppState>,
    Json(body): Json<PutSettingsRequest>,
) -> Result<Json<SettingsResponse>, ApiError> {
    let usecase = PutSettingsUseCase {
        settings: state.settings_repo(),
    };
    let settings = usecase
        .execute(
            identity.user_id,
            PutSettingsInput {
                push_enabled: body.push_enabled,
                new_follower: body.new_follower,
                new_reaction: body.new_reaction,
                trending_inks: body.trending_inks,
                followed_user_inks: body.followed_user_inks,
                most_reacted: body.most_reacted,
                suggestions: body.suggestions,
                editors_pick: body.editors_pick,
                permission_status: body.permission_status,
            },
        )
        .await?;
    Ok(Json(settings.into()))
}

// ── PATCH /users/@me/notification-settings ───────────────────────────────────

#[derive(Deserialize, Default)]
pub struct PatchSettingsRequest {
    pub push_enabled: Option<bool>,
    pub new_follower: Option<bool>,
    pub new_reaction: Option<bool>,
    pub trending_inks: Option<bool>,
    pub followed_user_inks: Option<bool>,
    pub most_reacted: Option<bool>,
    pub suggestions: Option<bool>,
    pub editors_pick: Option<bool>,
    pub permission_status: Option<PermissionStatus>,
}

pub async fn patch_settings(
    identity: Identity,
    State(state): State<AppState>,
    Json(body): Json<PatchSettingsRequest>,
) -> Result<StatusCode, ApiError> {
    let usecase = PatchSettingsUseCase {
        settings: state.settings_repo(),
    };
    usecase
        .execute(
            identity.user_id,
            NotificationFlagsPatch {
                push_enabled: body.push_enabled,
                new_follower: body.new_follower,
                new_reaction: body.new_reaction,
                trending_inks: body.trending_inks,
                followed_user_inks: body.followed_user_inks,
                most_reacted: body.most_reacted,
                suggestions: body.suggestions,
                editors_pick: body.editors_pick,
                permission_status: body.permission_status,
            },
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
