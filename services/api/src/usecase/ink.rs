use chrono::{Duration, Utc};
use uuid::Uuid;

use inkwell_domain::ink::Visibility;
use inkwell_domain::pagination::{CursorPage, CursorRequest, PageRequest};

use crate::domain::repository::{
    FollowRepository, InkRepository, ReactionRepository, UserRepository,
};
use crate::domain::types::{
    Ink, InkPatch, InkSortBy, InkStats, TrendingInk, estimate_reading_time,
};
use crate::error::ApiError;

pub const TRENDING_WINDOW_DAYS: i64 = 7;
pub const TRENDING_MIN_REACTIONS: i64 = 3;

// ── ComposeInk ───────────────────────────────────────────────────────────────

pub struct ComposeInkInput {
    pub content: String,
    pub kind: String,
    pub theme: String,
    pub visibility: Visibility,
}

pub struct ComposeInkUseCase<I: InkRepository> {
    pub inks: I,
}

impl<I: InkRepository> ComposeInkUseCase<I> {
    pub async fn execute(&self, author_id: Uuid, input: ComposeInkInput) -> Result<Ink, ApiError> {
        if input.content.trim().is_empty() {
            return Err(ApiError::MissingData);
        }
        let now = Utc::now();
        let ink = Ink {
            id: Uuid::now_v7(),
            reading_time: estimate_reading_time(&input.content),
            content: input.content,
            author_id,
            created_at: now,
            updated_at: now,
            views: 0,
            kind: input.kind,
            theme: input.theme,
            visibility: input.visibility,
            is_pinned: false,
        };
        self.inks.create(&ink).await?;
        Ok(ink)
    }
}

// ── GetInk ───────────────────────────────────────────────────────────────────

pub struct GetInkUseCase<I: InkRepository, F: FollowRepository> {
    pub inks: I,
    pub follows: F,
}

impl<I: InkRepository, F: FollowRepository> GetInkUseCase<I, F> {
    /// `viewer` is `None` for anonymous reads.
    pub async fn execute(&self, ink_id: Uuid, viewer: Option<Uuid>) -> Result<Ink, ApiError> {
        let ink = self
            .inks
            .find_by_id(ink_id)
            .await?
            .ok_or(ApiError::InkNotFound)?;
        match ink.visibility {
            Visibility::Public => Ok(ink),
            Visibility::Private => {
                if viewer == Some(ink.author_id) {
                    Ok(ink)
                } else {
                    Err(ApiError::Forbidden)
                }
            }
            Visibility::Followers => {
                let Some(viewer) = viewer else {
                    return Err(ApiError::Forbidden);
                };
                if viewer == ink.author_id
                    || self.follows.is_following(viewer, ink.author_id).await?
                {
                    Ok(ink)
                } else {
                    Err(ApiError::Forbidden)
                }
            }
        }
    }
}

// ── Feed ─────────────────────────────────────────────────────────────────────

pub struct FeedUseCase<I: InkRepository> {
    pub inks: I,
}

impl<I: InkRepository> FeedUseCase<I> {
    pub async fn execute(&self, cursor: CursorRequest) -> Result<CursorPage<Ink>, ApiError> {
        self.inks.feed(cursor).await
    }
}

// ── ListAuthorInks ───────────────────────────────────────────────────────────

pub struct ListAuthorInksUseCase<U: UserRepository, I: InkRepository> {
    pub users: U,
    pub inks: I,
}

impl<U: UserRepository, I: InkRepository> ListAuthorInksUseCase<U, I> {
    pub async fn execute(
        &self,
        username: &str,
        viewer: Option<Uuid>,
        sort_by: InkSortBy,
        page: PageRequest,
    ) -> Result<Vec<Ink>, ApiError> {
        let author = self
            .users
            .find_by_username(username)
            .await?
            .ok_or(ApiError::UserNotFound)?;
        let include_hidden = viewer == Some(author.id);
        self.inks
            .list_by_author(author.id, include_hidden, sort_by, page)
            .await
    }
}

// ── UpdateInk ────────────────────────────────────────────────────────────────

pub struct UpdateInkUseCase<I: InkRepository> {
    pub inks: I,
}

impl<I: InkRepository> UpdateInkUseCase<I> {
    pub async fn execute(
        &self,
        ink_id: Uuid,
        author_id: Uuid,
        mut patch: InkPatch,
    ) -> Result<(), ApiError> {
        if patch.is_empty() {
            return Err(ApiError::MissingData);
        }
        let ink = self
            .inks
            .find_by_id(ink_id)
            .await?
            .ok_or(ApiError::InkNotFound)?;
        if ink.author_id != author_id {
            return Err(ApiError::Forbidden);
        }
        if let Some(ref content) = patch.content {
            if content.trim().is_empty() {
                return Err(ApiError::MissingData);
            }
            patch.reading_time = Some(estimate_reading_time(content));
        }
        self.inks.update(ink_id, &patch, Utc::now()).await
    }
}

// ── DeleteInk ────────────────────────────────────────────────────────────────

pub struct DeleteInkUseCase<I: InkRepository> {
    pub inks: I,
}

impl<I: InkRepository> DeleteInkUseCase<I> {
    pub async fn execute(&self, ink_id: Uuid, author_id: Uuid) -> Result<(), ApiError> {
        let ink = self
            .inks
            .find_by_id(ink_id)
            .await?
            .ok_or(ApiError::InkNotFound)?;
        if ink.author_id != author_id {
            return Err(ApiError::Forbidden);
        }
        let deleted = self.inks.delete(ink_id).await?;
        if !deleted {
            return Err(ApiError::InkNotFound);
        }
        Ok(())
    }
}

// ── PinInk ───────────────────────────────────────────────────────────────────

pub struct PinInkUseCase<I: InkRepository> {
    pub inks: I,
}

impl<I: InkRepository> PinInkUseCase<I> {
    pub async fn execute(&self, ink_id: Uuid, author_id: Uuid, pinned: bool) -> Result<(), ApiError> {
        let ink = self
            .inks
            .find_by_id(ink_id)
            .await?
            .ok_or(ApiError::InkNotFound)?;
        if ink.author_id != author_id {
            return Err(ApiError::Forbidden);
        }
        self.inks.set_pinned(author_id, ink_id, pinned).await
    }
}

// ── RecordView ───────────────────────────────────────────────────────────────

pub struct RecordViewUseCase<I: InkRepository> {
    pub inks: I,
}

impl<I: InkRepository> RecordViewUseCase<I> {
    pub async fn execute(&self, ink_id: Uuid) -> Result<(), ApiError> {
        self.inks.increment_views(ink_id).await
    }
}

// ── AuthorStats ──────────────────────────────────────────────────────────────

pub struct AuthorStatsOutput {
    pub stats: InkStats,
    pub reactions_received: u64,
}

pub struct AuthorStatsUseCase<I: InkRepository, R: ReactionRepository> {
    pub inks: I,
    pub reactions: R,
}

impl<I: InkRepository, R: ReactionRepository> AuthorStatsUseCase<I, R> {
    pub async fn execute(&self, author_id: Uuid) -> Result<AuthorStatsOutput, ApiError> {
        let stats = self.inks.author_stats(author_id).await?;
        let reactions_received = self.reactions.count_received_by_author(author_id).await?;
        Ok(AuthorStatsOutput {
            stats,
            reactions_received,
        })
    }
}

// ── Trending ─────────────────────────────────────────────────────────────────

pub struct TrendingUseCase<I: InkRepository> {
    pub inks: I,
}

impl<I: InkRepository> TrendingUseCase<I> {
    pub async fn execute(&self, limit: u32) -> Result<Vec<TrendingInk>, ApiError> {
        let since = Utc::now() - Duration::days(TRENDING_WINDOW_DAYS);
        self.inks
            .trending(since, TRENDING_MIN_REACTIONS, limit.clamp(1, 50))
            .await
    }
}
