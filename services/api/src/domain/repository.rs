#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};
use uuid::Uuid;

use inkwell_domain::pagination::{CursorPage, CursorRequest, PageRequest};
use inkwell_domain::reaction::ReactionKind;

use crate::domain::types::{
    Account, Follow, Ink, InkPatch, InkSortBy, InkStats, NotificationFlagsPatch,
    NotificationSettings, OnboardingProfile, Reaction, ReactionCount, Session, TrendingInk, User,
    UserProfilePatch, VerificationToken,
};
use crate::error::ApiError;

/// Repository for user accounts and profiles.
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ApiError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, ApiError>;
    async fn list_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, ApiError>;

    /// Insert one user. A duplicate email maps to `EmailTaken`.
    async fn create(&self, user: &User) -> Result<(), ApiError>;

    async fn update_profile(&self, id: Uuid, patch: &UserProfilePatch) -> Result<(), ApiError>;
    async fn set_onboarding_state(
        &self,
        id: Uuid,
        completed: bool,
        step: Option<&str>,
    ) -> Result<(), ApiError>;

    /// Delete a user and everything cascading from it. Returns `true` if a
    /// row was deleted.
    async fn delete(&self, id: Uuid) -> Result<bool, ApiError>;

    /// Random sample of users the subject does not already follow
    /// (and is not), for follow suggestions.
    async fn list_suggestions(&self, for_user: Uuid, limit: u32) -> Result<Vec<User>, ApiError>;
}

/// Repository for linked identity-provider accounts.
pub trait AccountRepository: Send + Sync {
    /// Insert the account, or refresh its token columns when the
    /// (provider, provider_account_id) pair already exists for the same user.
    /// The pair belonging to a different user maps to `AccountAlreadyLinked`.
    async fn upsert(&self, account: &Account) -> Result<(), ApiError>;

    async fn find_by_provider(
        &self,
        provider: &str,
        provider_account_id: &str,
    ) -> Result<Option<Account>, ApiError>;

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Account>, ApiError>;

    /// Returns `true` if a row was deleted.
    async fn unlink(
        &self,
        user_id: Uuid,
        provider: &str,
        provider_account_id: &str,
    ) -> Result<bool, ApiError>;
}

/// Repository for login sessions. Session rows are only ever created inside
/// the sign-in transaction (`SignInPort`).
pub trait SessionRepository: Send + Sync {
    async fn find_by_token(&self, token: &str) -> Result<Option<Session>, ApiError>;
    async fn renew(&self, token: &str, expires: DateTime<Utc>) -> Result<(), ApiError>;

    /// Returns `true` if a row was deleted.
    async fn delete_by_token(&self, token: &str) -> Result<bool, ApiError>;

    /// Delete every session that expired at or before `now`; returns the
    /// number of rows removed (zero is a valid no-op).
    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, ApiError>;
}

/// Repository for single-use sign-in codes. Consumption (fetch-and-delete)
/// happens inside the sign-in transaction (`SignInPort`).
pub trait VerificationTokenRepository: Send + Sync {
    async fn create(&self, token: &VerificationToken) -> Result<(), ApiError>;
    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, ApiError>;
}

/// Outcome of an atomic email sign-in.
#[derive(Debug, Clone)]
pub struct SignInOutcome {
    pub user: User,
    pub session: Session,
    /// `true` when this sign-in created the user row.
    pub created_user: bool,
}

/// Atomic email sign-in: consume the verification token, create the user on
/// first sign-in, mark the email verified, bump the login counters, and store
/// the session. Runs all-or-nothing under SERIALIZABLE isolation.
pub trait SignInPort: Send + Sync {
    async fn sign_in(
        &self,
        email: &str,
        code: &str,
        session_token: &str,
        session_expires: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<SignInOutcome, ApiError>;
}

/// Repository for inks.
pub trait InkRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Ink>, ApiError>;

    /// Cursor-paginated public feed, newest first.
    async fn feed(&self, cursor: CursorRequest) -> Result<CursorPage<Ink>, ApiError>;

    /// Offset-paginated author listing. Private and followers-only inks are
    /// included only when `include_hidden` is set (viewer is the author).
    async fn list_by_author(
        &self,
        author_id: Uuid,
        include_hidden: bool,
        sort_by: InkSortBy,
        page: PageRequest,
    ) -> Result<Vec<Ink>, ApiError>;

    async fn latest_by_author(&self, author_id: Uuid) -> Result<Option<Ink>, ApiError>;
    async fn create(&self, ink: &Ink) -> Result<(), ApiError>;
    async fn update(&self, id: Uuid, patch: &InkPatch, now: DateTime<Utc>) -> Result<(), ApiError>;

    /// Pin one ink, clearing any other pinned ink of the same author first.
    /// `pinned = false` just unpins the given ink.
    async fn set_pinned(&self, author_id: Uuid, ink_id: Uuid, pinned: bool)
    -> Result<(), ApiError>;

    async fn increment_views(&self, id: Uuid) -> Result<(), ApiError>;

    /// Returns `true` if a row was deleted.
    async fn delete(&self, id: Uuid) -> Result<bool, ApiError>;

    async fn count_by_author(&self, author_id: Uuid) -> Result<u64, ApiError>;

    /// count / sum / avg / min / max over the author's views and reading time.
    async fn author_stats(&self, author_id: Uuid) -> Result<InkStats, ApiError>;

    /// Public inks whose reaction count inside the window reaches
    /// `min_reactions`, most-reacted first.
    async fn trending(
        &self,
        since: DateTime<Utc>,
        min_reactions: i64,
        limit: u32,
    ) -> Result<Vec<TrendingInk>, ApiError>;
}

/// Repository for reactions.
pub trait ReactionRepository: Send + Sync {
    /// Idempotent insert of the (ink, user, kind) triple. Returns `true` if a
    /// row was inserted, `false` when the triple already existed.
    async fn set(&self, reaction: &Reaction) -> Result<bool, ApiError>;

    /// Returns `true` if a row was deleted.
    async fn unset(
        &self,
        ink_id: Uuid,
        user_id: Uuid,
        kind: ReactionKind,
    ) -> Result<bool, ApiError>;

    /// Per-kind tallies for one ink, grouped in the database.
    async fn counts_for_ink(&self, ink_id: Uuid) -> Result<Vec<ReactionCount>, ApiError>;

    /// Kinds one user holds on one ink.
    async fn kinds_for(&self, ink_id: Uuid, user_id: Uuid) -> Result<Vec<ReactionKind>, ApiError>;

    /// Distinct ids of users who reacted to the ink, regardless of kind.
    async fn list_reactor_ids(&self, ink_id: Uuid) -> Result<Vec<Uuid>, ApiError>;

    /// Total reactions received across all of the author's inks.
    async fn count_received_by_author(&self, author_id: Uuid) -> Result<u64, ApiError>;
}

/// Repository for follow edges.
pub trait FollowRepository: Send + Sync {
    /// Insert one edge. A duplicate pair maps to `AlreadyFollowing`.
    async fn follow(&self, follow: &Follow) -> Result<(), ApiError>;

    /// Bulk insert, silently skipping pairs that already exist. Returns the
    /// number of rows actually inserted.
    async fn follow_many(&self, follows: &[Follow]) -> Result<u64, ApiError>;

    /// Returns `true` if a row was deleted.
    async fn unfollow(&self, follower_id: Uuid, following_id: Uuid) -> Result<bool, ApiError>;

    async fn is_following(&self, follower_id: Uuid, following_id: Uuid)
    -> Result<bool, ApiError>;

    /// Edges where `user_id` is the follower, newest first.
    async fn list_following(&self, user_id: Uuid, page: PageRequest)
    -> Result<Vec<Follow>, ApiError>;

    /// Edges where `user_id` is being followed, newest first.
    async fn list_followers(&self, user_id: Uuid, page: PageRequest)
    -> Result<Vec<Follow>, ApiError>;

    async fn count_following(&self, user_id: Uuid) -> Result<u64, ApiError>;
    async fn count_followers(&self, user_id: Uuid) -> Result<u64, ApiError>;
}

/// Repository for notification preferences.
pub trait NotificationSettingsRepository: Send + Sync {
    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<NotificationSettings>, ApiError>;

    /// Insert or fully replace the user's settings row.
    async fn upsert(&self, settings: &NotificationSettings) -> Result<(), ApiError>;

    /// Partial update; `SettingsNotFound` when the user has no row yet.
    async fn update_flags(
        &self,
        user_id: Uuid,
        patch: &NotificationFlagsPatch,
        now: DateTime<Utc>,
    ) -> Result<(), ApiError>;
}

/// Repository for onboarding community profiles.
pub trait OnboardingRepository: Send + Sync {
    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<OnboardingProfile>, ApiError>;

    /// Insert or replace the user's profile, bumping `updated_at`.
    async fn upsert(&self, profile: &OnboardingProfile) -> Result<(), ApiError>;

    /// Atomically mark the user's onboarding complete and insert the accepted
    /// follow edges (skipping duplicates), all-or-nothing.
    async fn complete(
        &self,
        user_id: Uuid,
        step: Option<&str>,
        follows: &[Follow],
        now: DateTime<Utc>,
    ) -> Result<(), ApiError>;
}
