use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use inkwell_core::identity::Identity;
use inkwell_domain::pagination::PageRequest;

use crate::error::ApiError;
use crate::handlers::user::UserSummaryResponse;
use crate::state::AppState;
use crate::usecase::follow::{
    FollowManyUsersUseCase, FollowUserUseCase, ListFollowersUseCase, ListFollowingUseCase,
    UnfollowUserUseCase,
};

#[derive(Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct FollowListQuery {
    pub per_page: Option<u32>,
    pub page: Option<u32>,
}

impl FollowListQuery {
    fn page_request(&self) -> PageRequest {
        PageRequest {
            per_page: self.per_page.unwrap_or(20),
            page: self.page.unwrap_or(1),
        }
    }
}

// ── POST /users/@me/follows ──────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct FollowRequest {
    pub user_id: Uuid,
}

pub async fn follow_user(
    identity: Identity,
    State(state): State<AppState>,
    Json(body): Json<FollowRequest>,
) -> Result<StatusCode, ApiError> {
    let usecase = FollowUserUseCase {
        users: state.user_repo(),
        follows: state.follow_repo(),
    };
    usecase.execute(identity.user_id, body.user_id).await?;
    Ok(StatusCode::CREATED)
}

// ── POST /users/@me/follows/batch ────────────────────────────────────────────

#[derive(Deserialize)]
pub struct FollowBatchRequest {
    pub user_ids: Vec<Uuid>,
}

#[derive(Serialize)]
pub struct FollowBatchResponse {
    pub created: u64,
}

pub async fn follow_many(
    identity: Identity,
    State(state): State<AppState>,
    Json(body): Json<FollowBatchRequest>,
) -> Result<Json<FollowBatchResponse>, ApiError> {
    let usecase = FollowManyUsersUseCase {
        follows: state.follow_repo(),
    };
    let created = usecase.execute(identity.user_id, &body.user_ids).await?;
    Ok(Json(FollowBatchResponse { created }))
}

// ── DELETE /users/@me/follows/{user_id} ──────────────────────────────────────

pub async fn unfollow_user(
    identity: Identity,
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let usecase = UnfollowUserUseCase {
        follows: state.follow_repo(),
    };
    usecase.execute(identity.user_id, user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── GET /users/@me/follows ───────────────────────────────────────────────────

pub async fn get_following(
    identity: Identity,
    State(state): State<AppState>,
    Query(query): Query<FollowListQuery>,
) -> Result<Json<Vec<UserSummaryResponse>>, ApiError> {
    let usecase = ListFollowingUseCase {
        follows: state.follow_repo(),
        users: state.user_repo(),
    };
    let users = usecase
        .execute(identity.user_id, query.page_request())
        .await?;
    Ok(Json(users.into_iter().map(Into::into).collect()))
}

// ── GET /users/@me/followers ─────────────────────────────────────────────────

pub async fn get_followers(
    identity: Identity,
    State(state): State<AppState>,
    Query(query): Query<FollowListQuery>,
) -> Result<Json<Vec<UserSummaryResponse>>, ApiError> {
    let usecase = ListFollowersUseCase {
        follows: state.follow_repo(),
        users: state.user_repo(),
    };
    let users = usecase
        .execute(identity.user_id, query.page_request())
        .await?;
    Ok(Json(users.into_iter().map(Into::into).collect()))
}
