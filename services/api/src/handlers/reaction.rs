use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Serialize;
use uuid::Uuid;

use inkwell_core::identity::Identity;
use inkwell_domain::reaction::ReactionKind;

use crate::error::ApiError;
use crate::handlers::user::UserSummaryResponse;
use crate::state::AppState;
use crate::usecase::reaction::{
    InkReactionsUseCase, ListReactorsUseCase, ReactUseCase, UnreactUseCase,
};

fn parse_kind(value: &str) -> Result<ReactionKind, ApiError> {
    ReactionKind::from_str(value).ok_or(ApiError::InvalidReactionKind)
}

// ── PUT /inks/{id}/reactions/{kind} ──────────────────────────────────────────

pub async fn set_reaction(
    identity: Identity,
    State(state): State<AppState>,
    Path((ink_id, kind)): Path<(Uuid, String)>,
) -> Result<StatusCode, ApiError> {
    let kind = parse_kind(&kind)?;
    let usecase = ReactUseCase {
        inks: state.ink_repo(),
        reactions: state.reaction_repo(),
    };
    let created = usecase.execute(ink_id, identity.user_id, kind).await?;
    // Repeating the same reaction is a no-op, not an error.
    Ok(if created {
        StatusCode::CREATED
    } else {
        StatusCode::NO_CONTENT
    })
}

// ── DELETE /inks/{id}/reactions/{kind} ───────────────────────────────────────

pub async fn unset_reaction(
    identity: Identity,
    State(state): State<AppState>,
    Path((ink_id, kind)): Path<(Uuid, String)>,
) -> Result<StatusCode, ApiError> {
    let kind = parse_kind(&kind)?;
    let usecase = UnreactUseCase {
        reactions: state.reaction_repo(),
    };
    usecase.execute(ink_id, identity.user_id, kind).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── GET /inks/{id}/reactions ─────────────────────────────────────────────────

#[derive(Serialize)]
pub struct ReactionCountResponse {
    pub kind: ReactionKind,
    pub count: u64,
}

#[derive(Serialize)]
pub struct InkReactionsResponse {
    pub counts: Vec<ReactionCountResponse>,
    pub viewer_kinds: Vec<ReactionKind>,
}

pub async fn get_reactions(
    identity: Option<Identity>,
    State(state): State<AppState>,
    Path(ink_id): Path<Uuid>,
) -> Result<Json<InkReactionsResponse>, ApiError> {
    let usecase = InkReactionsUseCase {
        inks: state.ink_repo(),
        reactions: state.reaction_repo(),
    };
    let output = usecase
        .execute(ink_id, identity.map(|i| i.user_id))
        .await?;
    Ok(Json(InkReactionsResponse {
        counts: output
            .counts
            .into_iter()
            .map(|c| ReactionCountResponse {
                kind: c.kind,
                count: c.count,
            })
            .collect(),
        viewer_kinds: output.viewer_kinds,
    }))
}

// ── GET /inks/{id}/reactors ──────────────────────────────────────────────────

pub async fn get_reactors(
    State(state): State<AppState>,
    Path(ink_id): Path<Uuid>,
) -> Result<Json<Vec<UserSummaryResponse>>, ApiError> {
    let usecase = ListReactorsUseCase {
        users: state.user_repo(),
        reactions: state.reaction_repo(),
    };
    let users = usecase.execute(ink_id).await?;
    Ok(Json(users.into_iter().map(Into::into).collect()))
}
