use axum::{
    Json,
    extract::{Path, Query, RawQuery, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use inkwell_core::identity::Identity;
use inkwell_domain::ink::Visibility;
use inkwell_domain::pagination::{CursorRequest, PageRequest};

use crate::domain::types::{Ink, InkPatch, InkSortBy, TrendingInk};
use crate::error::ApiError;
use crate::state::AppState;
use crate::usecase::ink::{
    AuthorStatsUseCase, ComposeInkInput, ComposeInkUseCase, DeleteInkUseCase, FeedUseCase,
    GetInkUseCase, ListAuthorInksUseCase, PinInkUseCase, RecordViewUseCase, TrendingUseCase,
    UpdateInkUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct InkResponse {
    pub id: String,
    pub content: String,
    pub author_id: String,
    #[serde(serialize_with = "inkwell_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "inkwell_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
    pub reading_time: i32,
    pub views: i32,
    pub kind: String,
    pub theme: String,
    pub visibility: Visibility,
    pub is_pinned: bool,
}

impl From<Ink> for InkResponse {
    fn from(ink: Ink) -> Self {
        Self {
            id: ink.id.to_string(),
            content: ink.content,
            author_id: ink.author_id.to_string(),
            created_at: ink.created_at,
            updated_at: ink.updated_at,
            reading_time: ink.reading_time,
            views: ink.views,
            kind: ink.kind,
            theme: ink.theme,
            visibility: ink.visibility,
            is_pinned: ink.is_pinned,
        }
    }
}

fn parse_visibility(value: &str) -> Result<Visibility, ApiError> {
    Visibility::from_str(value).ok_or(ApiError::InvalidVisibility)
}

// ── POST /inks ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ComposeInkRequest {
    pub content: String,
    pub kind: String,
    pub theme: String,
    pub visibility: Option<String>,
}

pub async fn compose_ink(
    identity: Identity,
    State(state): State<AppState>,
    Json(body): Json<ComposeInkRequest>,
) -> Result<(StatusCode, Json<InkResponse>), ApiError> {
    let visibility = match body.visibility.as_deref() {
        Some(value) => parse_visibility(value)?,
        None => Visibility::default(),
    };
    let usecase = ComposeInkUseCase {
        inks: state.ink_repo(),
    };
    let ink = usecase
        .execute(
            identity.user_id,
            ComposeInkInput {
                content: body.content,
                kind: body.kind,
                theme: body.theme,
                visibility,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(ink.into())))
}

// ── GET /inks ────────────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct FeedQuery {
    pub after: Option<Uuid>,
    pub limit: Option<u32>,
}

#[derive(Serialize)]
pub struct FeedResponse {
    pub items: Vec<InkResponse>,
    pub next: Option<String>,
}

pub async fn get_feed(
    State(state): State<AppState>,
    Query(query): Query<FeedQuery>,
) -> Result<Json<FeedResponse>, ApiError> {
    let usecase = FeedUseCase {
        inks: state.ink_repo(),
    };
    let page = usecase
        .execute(CursorRequest {
            after: query.after,
            limit: query.limit.unwrap_or(20),
        })
        .await?;
    Ok(Json(FeedResponse {
        items: page.items.into_iter().map(Into::into).collect(),
        next: page.next.map(|id| id.to_string()),
    }))
}

// ── GET /inks/trending ───────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct TrendingQuery {
    pub limit: Option<u32>,
}

#[derive(Serialize)]
pub struct TrendingInkResponse {
    #[serde(flatten)]
    pub ink: InkResponse,
    pub reaction_count: i64,
}

impl From<TrendingInk> for TrendingInkResponse {
    fn from(trending: TrendingInk) -> Self {
        Self {
            ink: trending.ink.into(),
            reaction_count: trending.reaction_count,
        }
    }
}

pub async fn get_trending(
    State(state): State<AppState>,
    Query(query): Query<TrendingQuery>,
) -> Result<Json<Vec<TrendingInkResponse>>, ApiError> {
    let usecase = TrendingUseCase {
        inks: state.ink_repo(),
    };
    let inks = usecase.execute(query.limit.unwrap_or(10)).await?;
    Ok(Json(inks.into_iter().map(Into::into).collect()))
}

// ── GET /inks/{id} ───────────────────────────────────────────────────────────

pub async fn get_ink(
    identity: Option<Identity>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<InkResponse>, ApiError> {
    let usecase = GetInkUseCase {
        inks: state.ink_repo(),
        follows: state.follow_repo(),
    };
    let ink = usecase
        .execute(id, identity.map(|i| i.user_id))
        .await?;
    Ok(Json(ink.into()))
}

// ── PATCH /inks/{id} ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateInkRequest {
    pub content: Option<String>,
    pub kind: Option<String>,
    pub theme: Option<String>,
    pub visibility: Option<String>,
}

pub async fn update_ink(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateInkRequest>,
) -> Result<StatusCode, ApiError> {
    let visibility = body.visibility.as_deref().map(parse_visibility).transpose()?;
    let usecase = UpdateInkUseCase {
        inks: state.ink_repo(),
    };
    usecase
        .execute(
            id,
            identity.user_id,
            InkPatch {
                content: body.content,
                kind: body.kind,
                theme: body.theme,
                visibility,
                reading_time: None,
            },
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── DELETE /inks/{id} ────────────────────────────────────────────────────────

pub async fn delete_ink(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let usecase = DeleteInkUseCase {
        inks: state.ink_repo(),
    };
    usecase.execute(id, identity.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── POST /inks/{id}/views ────────────────────────────────────────────────────

pub async fn record_view(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let usecase = RecordViewUseCase {
        inks: state.ink_repo(),
    };
    usecase.execute(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── PUT /inks/{id}/pin / DELETE /inks/{id}/pin ───────────────────────────────

pub async fn pin_ink(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let usecase = PinInkUseCase {
        inks: state.ink_repo(),
    };
    usecase.execute(id, identity.user_id, true).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn unpin_ink(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let usecase = PinInkUseCase {
        inks: state.ink_repo(),
    };
    usecase.execute(id, identity.user_id, false).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── GET /users/{username}/inks ───────────────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct AuthorInksQuery {
    pub per_page: Option<u32>,
    pub page: Option<u32>,
    pub sort_by: Option<String>,
}

pub async fn get_author_inks(
    identity: Option<Identity>,
    State(state): State<AppState>,
    Path(username): Path<String>,
    RawQuery(raw): RawQuery,
) -> Result<Json<Vec<InkResponse>>, ApiError> {
    let query: AuthorInksQuery = raw
        .as_deref()
        .map(serde_qs::from_str)
        .transpose()
        .map_err(|_| ApiError::MissingData)?
        .unwrap_or_default();

    let sort_by = query
        .sort_by
        .as_deref()
        .map(InkSortBy::from_kebab_case)
        .unwrap_or(Some(InkSortBy::default()))
        .unwrap_or_default();
    let page = PageRequest {
        per_page: query.per_page.unwrap_or(20),
        page: query.page.unwrap_or(1),
    };

    let usecase = ListAuthorInksUseCase {
        users: state.user_repo(),
        inks: state.ink_repo(),
    };
    let inks = usecase
        .execute(&username, identity.map(|i| i.user_id), sort_by, page)
        .await?;
    Ok(Json(inks.into_iter().map(Into::into).collect()))
}

// ── GET /users/@me/inks/stats ────────────────────────────────────────────────

#[derive(Serialize)]
pub struct AuthorStatsResponse {
    pub ink_count: u64,
    pub total_views: i64,
    pub avg_views: f64,
    pub min_views: i32,
    pub max_views: i32,
    pub total_reading_time: i64,
    pub reactions_received: u64,
}

pub async fn get_my_ink_stats(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<Json<AuthorStatsResponse>, ApiError> {
    let usecase = AuthorStatsUseCase {
        inks: state.ink_repo(),
        reactions: state.reaction_repo(),
    };
    let output = usecase.execute(identity.user_id).await?;
    Ok(Json(AuthorStatsResponse {
        ink_count: output.stats.ink_count,
        total_views: output.stats.total_views,
        avg_views: output.stats.avg_views,
        min_views: output.stats.min_views,
        max_views: output.stats.max_views,
        total_reading_time: output.stats.total_reading_time,
        reactions_received: output.reactions_received,
    }))
}
