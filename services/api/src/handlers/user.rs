use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use inkwell_core::identity::Identity;

use crate::domain::types::{User, UserProfilePatch};
use crate::error::ApiError;
use crate::handlers::ink::InkResponse;
use crate::state::AppState;
use crate::usecase::user::{
    DeleteUserUseCase, GetProfileUseCase, GetUserUseCase, SuggestUsersUseCase,
    UpdateProfileUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

/// Full view of a user, only ever returned to the user themselves.
#[derive(Serialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub username: Option<String>,
    pub name: Option<String>,
    pub image: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    #[serde(serialize_with = "inkwell_core::serde::opt_to_rfc3339_ms")]
    pub email_verified: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(serialize_with = "inkwell_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "inkwell_core::serde::opt_to_rfc3339_ms")]
    pub last_login_at: Option<chrono::DateTime<chrono::Utc>>,
    pub login_count: i32,
    pub onboarding_completed: bool,
    pub onboarding_step: Option<String>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email,
            username: user.username,
            name: user.name,
            image: user.image,
            bio: user.bio,
            location: user.location,
            email_verified: user.email_verified,
            created_at: user.created_at,
            last_login_at: user.last_login_at,
            login_count: user.login_count,
            onboarding_completed: user.onboarding_completed,
            onboarding_step: user.onboarding_step,
        }
    }
}

/// Public view of a user, embedded in profiles, follow lists, and reactor lists.
#[derive(Serialize)]
pub struct UserSummaryResponse {
    pub id: String,
    pub username: Option<String>,
    pub name: Option<String>,
    pub image: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    #[serde(serialize_with = "inkwell_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<User> for UserSummaryResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username,
            name: user.name,
            image: user.image,
            bio: user.bio,
            location: user.location,
            created_at: user.created_at,
        }
    }
}

// ── GET /users/@me ───────────────────────────────────────────────────────────

pub async fn get_me(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<Json<UserResponse>, ApiError> {
    let usecase = GetUserUseCase {
        users: state.user_repo(),
    };
    let user = usecase.execute(identity.user_id).await?;
    Ok(Json(user.into()))
}

// ── PATCH /users/@me ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateProfileRequest {
    pub username: Option<String>,
    pub name: Option<String>,
    pub image: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
}

pub async fn update_me(
    identity: Identity,
    State(state): State<AppState>,
    Json(body): Json<UpdateProfileRequest>,
) -> Result<StatusCode, ApiError> {
    let usecase = UpdateProfileUseCase {
        users: state.user_repo(),
    };
    usecase
        .execute(
            identity.user_id,
            UserProfilePatch {
                username: body.username,
                name: body.name,
                image: body.image,
                bio: body.bio,
                location: body.location,
            },
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── DELETE /users/@me ────────────────────────────────────────────────────────

pub async fn delete_me(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    let usecase = DeleteUserUseCase {
        users: state.user_repo(),
    };
    usecase.execute(identity.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── GET /users/{username} ────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct ProfileResponse {
    #[serde(flatten)]
    pub user: UserSummaryResponse,
    pub ink_count: u64,
    pub follower_count: u64,
    pub following_count: u64,
    pub latest_ink: Option<InkResponse>,
}

pub async fn get_profile(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let usecase = GetProfileUseCase {
        users: state.user_repo(),
        inks: state.ink_repo(),
        follows: state.follow_repo(),
    };
    let profile = usecase.execute(&username).await?;
    Ok(Json(ProfileResponse {
        user: profile.user.into(),
        ink_count: profile.ink_count,
        follower_count: profile.follower_count,
        following_count: profile.following_count,
        latest_ink: profile.latest_ink.map(Into::into),
    }))
}

// ── GET /users/@me/suggestions ───────────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct SuggestionsQuery {
    pub limit: Option<u32>,
}

pub async fn get_suggestions(
    identity: Identity,
    State(state): State<AppState>,
    Query(query): Query<SuggestionsQuery>,
) -> Result<Json<Vec<UserSummaryResponse>>, ApiError> {
    let usecase = SuggestUsersUseCase {
        users: state.user_repo(),
    };
    let users = usecase
        .execute(identity.user_id, query.limit.unwrap_or(10))
        .await?;
    Ok(Json(users.into_iter().map(Into::into).collect()))
}
