use chrono::{DateTime, Utc};
use uuid::Uuid;

use inkwell_domain::ink::Visibility;
use inkwell_domain::pagination::Sort;
use inkwell_domain::reaction::ReactionKind;
use inkwell_domain::settings::PermissionStatus;

/// User account and profile.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub username: Option<String>,
    pub name: Option<String>,
    pub image: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub email_verified: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
    pub login_count: i32,
    pub onboarding_completed: bool,
    pub onboarding_step: Option<String>,
}

/// Partial profile mutation. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct UserProfilePatch {
    pub username: Option<String>,
    pub name: Option<String>,
    pub image: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
}

impl UserProfilePatch {
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.name.is_none()
            && self.image.is_none()
            && self.bio.is_none()
            && self.location.is_none()
    }
}

/// External identity-provider account linked to a user.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: String,
    pub provider: String,
    pub provider_account_id: String,
    pub refresh_token: Option<String>,
    pub access_token: Option<String>,
    pub expires_at: Option<i64>,
    pub token_type: Option<String>,
    pub scope: Option<String>,
    pub id_token: Option<String>,
    pub session_state: Option<String>,
}

/// Database-backed login session.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub session_token: String,
    pub user_id: Uuid,
    pub expires: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires <= now
    }
}

/// Single-use email sign-in code.
#[derive(Debug, Clone)]
pub struct VerificationToken {
    pub identifier: String,
    pub token: String,
    pub expires: DateTime<Utc>,
}

/// A user-authored post.
#[derive(Debug, Clone)]
pub struct Ink {
    pub id: Uuid,
    pub content: String,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub reading_time: i32,
    pub views: i32,
    pub kind: String,
    pub theme: String,
    pub visibility: Visibility,
    pub is_pinned: bool,
}

/// Partial ink mutation. `reading_time` is recomputed by the use-case when
/// `content` changes, never supplied by callers.
#[derive(Debug, Clone, Default)]
pub struct InkPatch {
    pub content: Option<String>,
    pub kind: Option<String>,
    pub theme: Option<String>,
    pub visibility: Option<Visibility>,
    pub reading_time: Option<i32>,
}

impl InkPatch {
    pub fn is_empty(&self) -> bool {
        self.content.is_none()
            && self.kind.is_none()
            && self.theme.is_none()
            && self.visibility.is_none()
    }
}

/// Typed engagement on an ink.
#[derive(Debug, Clone)]
pub struct Reaction {
    pub id: Uuid,
    pub ink_id: Uuid,
    pub user_id: Uuid,
    pub kind: ReactionKind,
    pub created_at: DateTime<Utc>,
}

/// Reaction tally for one kind on one ink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReactionCount {
    pub kind: ReactionKind,
    pub count: u64,
}

/// Directed follow edge.
#[derive(Debug, Clone)]
pub struct Follow {
    pub follower_id: Uuid,
    pub following_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Per-user notification preferences.
#[derive(Debug, Clone)]
pub struct NotificationSettings {
    pub id: Uuid,
    pub user_id: Uuid,
    pub push_enabled: bool,
    pub new_follower: bool,
    pub new_reaction: bool,
    pub trending_inks: bool,
    pub followed_user_inks: bool,
    pub most_reacted: bool,
    pub suggestions: bool,
    pub editors_pick: bool,
    pub permission_status: PermissionStatus,
    pub last_updated: DateTime<Utc>,
}

impl NotificationSettings {
    /// Default preferences materialized for a user with no stored row yet.
    pub fn defaults_for(user_id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::nil(),
            user_id,
            push_enabled: false,
            new_follower: true,
            new_reaction: true,
            trending_inks: true,
            followed_user_inks: true,
            most_reacted: false,
            suggestions: true,
            editors_pick: false,
            permission_status: PermissionStatus::Default,
            last_updated: now,
        }
    }
}

/// Partial notification preference mutation.
#[derive(Debug, Clone, Default)]
pub struct NotificationFlagsPatch {
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

impl NotificationFlagsPatch {
    pub fn is_empty(&self) -> bool {
        self.push_enabled.is_none()
            && self.new_follower.is_none()
            && self.new_reaction.is_none()
            && self.trending_inks.is_none()
            && self.followed_user_inks.is_none()
            && self.most_reacted.is_none()
            && self.suggestions.is_none()
            && self.editors_pick.is_none()
            && self.permission_status.is_none()
    }
}

/// Community preferences captured during onboarding.
#[derive(Debug, Clone)]
pub struct OnboardingProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub following_suggestions: Vec<Uuid>,
    pub interests: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Aggregate view/reading-time summary over an author's inks.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InkStats {
    pub ink_count: u64,
    pub total_views: i64,
    pub avg_views: f64,
    pub min_views: i32,
    pub max_views: i32,
    pub total_reading_time: i64,
}

/// An ink together with its reaction count inside the trending window.
#[derive(Debug, Clone)]
pub struct TrendingInk {
    pub ink: Ink,
    pub reaction_count: i64,
}

/// Sort options for author ink listings.
#[derive(Debug, Clone, Copy)]
pub enum InkSortBy {
    CreatedAt(Sort),
    Views(Sort),
}

impl Default for InkSortBy {
    fn default() -> Self {
        Self::CreatedAt(Sort::Desc)
    }
}

impl InkSortBy {
    pub fn from_kebab_case(s: &str) -> Option<Self> {
        match s {
            "created-at-desc" => Some(Self::CreatedAt(Sort::Desc)),
            "created-at-asc" => Some(Self::CreatedAt(Sort::Asc)),
            "views-desc" => Some(Self::Views(Sort::Desc)),
            "views-asc" => Some(Self::Views(Sort::Asc)),
            _ => None,
        }
    }
}

/// Validate a username: lowercase alphanumeric + hyphen + underscore,
/// 3-24 chars. Reserved: "me". Rejects usernames starting with '@'.
pub fn validate_username(username: &str) -> bool {
    if username.len() < 3 || username.len() > 24 {
        return false;
    }
    if username == "me" {
        return false;
    }
    if username.starts_with('@') {
        return false;
    }
    username
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
}

/// Words-per-minute basis for `estimate_reading_time`.
const READING_WPM: usize = 200;

/// Estimated reading time in seconds, never below 1 for non-empty content.
pub fn estimate_reading_time(content: &str) -> i32 {
    let words = content.split_whitespace().count();
    if words == 0 {
        return 0;
    }
    ((words * 60).div_ceil(READING_WPM)).max(1) as i32
}
