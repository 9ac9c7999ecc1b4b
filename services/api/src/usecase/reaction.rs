use chrono::Utc;
use uuid::Uuid;

use inkwell_domain::reaction::ReactionKind;

use crate::domain::repository::{InkRepository, ReactionRepository, UserRepository};
use crate::domain::types::{Reaction, ReactionCount, User};
use crate::error::ApiError;

// ── React ────────────────────────────────────────────────────────────────────

pub struct ReactUseCase<I: InkRepository, R: ReactionRepository> {
    pub inks: I,
    pub reactions: R,
}

impl<I: InkRepository, R: ReactionRepository> ReactUseCase<I, R> {
    /// Idempotent: reacting twice with the same kind leaves a single row.
    /// Returns `true` when the reaction was newly recorded.
    pub async fn execute(
        &self,
        ink_id: Uuid,
        user_id: Uuid,
        kind: ReactionKind,
    ) -> Result<bool, ApiError> {
        self.inks
            .find_by_id(ink_id)
            .await?
            .ok_or(ApiError::InkNotFound)?;
        let reaction = Reaction {
            id: Uuid::now_v7(),
            ink_id,
            user_id,
            kind,
            created_at: Utc::now(),
        };
        self.reactions.set(&reaction).await
    }
}

// ── Unreact ──────────────────────────────────────────────────────────────────

pub struct UnreactUseCase<R: ReactionRepository> {
    pub reactions: R,
}

impl<R: ReactionRepository> UnreactUseCase<R> {
    pub async fn execute(
        &self,
        ink_id: Uuid,
        user_id: Uuid,
        kind: ReactionKind,
    ) -> Result<(), ApiError> {
        let removed = self.reactions.unset(ink_id, user_id, kind).await?;
        if !removed {
            return Err(ApiError::ReactionNotFound);
        }
        Ok(())
    }
}

// ── InkReactions ─────────────────────────────────────────────────────────────

pub struct InkReactionsOutput {
    pub counts: Vec<ReactionCount>,
    /// Kinds the viewer currently holds on this ink; empty for anonymous reads.
    pub viewer_kinds: Vec<ReactionKind>,
}

pub struct InkReactionsUseCase<I: InkRepository, R: ReactionRepository> {
    pub inks: I,
    pub reactions: R,
}

impl<I: InkRepository, R: ReactionRepository> InkReactionsUseCase<I, R> {
    pub async fn execute(
        &self,
        ink_id: Uuid,
        viewer: Option<Uuid>,
    ) -> Result<InkReactionsOutput, ApiError> {
        self.inks
            .find_by_id(ink_id)
            .await?
            .ok_or(ApiError::InkNotFound)?;
        let counts = self.reactions.counts_for_ink(ink_id).await?;
        let viewer_kinds = match viewer {
            Some(user_id) => self.reactions.kinds_for(ink_id, user_id).await?,
            None => Vec::new(),
        };
        Ok(InkReactionsOutput {
            counts,
            viewer_kinds,
        })
    }
}

// ── ListReactors ─────────────────────────────────────────────────────────────

pub struct ListReactorsUseCase<U: UserRepository, R: ReactionRepository> {
    pub users: U,
    pub reactions: R,
}

impl<U: UserRepository, R: ReactionRepository> ListReactorsUseCase<U, R> {
    /// Distinct users who reacted to the ink, in no guaranteed order.
    pub async fn execute(&self, ink_id: Uuid) -> Result<Vec<User>, ApiError> {
        let ids = self.reactions.list_reactor_ids(ink_id).await?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.users.list_by_ids(&ids).await
    }
}
