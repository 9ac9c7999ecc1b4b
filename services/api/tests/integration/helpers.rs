use std::sync::{Arc, Mutex};

use chrono::{Duration, Utc};
use uuid::Uuid;

use inkwell_api::domain::repository::{
    AccountRepository, FollowRepository, InkRepository, NotificationSettingsRepository,
    OnboardingRepository, ReactionRepository, SessionRepository, SignInOutcome, SignInPort,
    UserRepository, VerificationTokenRepository,
};
use inkwell_api::domain::types::{
    Account, Follow, Ink, InkPatch, InkSortBy, InkStats, NotificationFlagsPatch,
    NotificationSettings, OnboardingProfile, Reaction, ReactionCount, Session, TrendingInk, User,
    UserProfilePatch, VerificationToken,
};
use inkwell_api::error::ApiError;
use inkwell_domain::ink::Visibility;
use inkwell_domain::pagination::{CursorPage, CursorRequest, PageRequest, Sort};
use inkwell_domain::reaction::ReactionKind;

// ── Fixtures ─────────────────────────────────────────────────────────────────

pub fn test_user(email: &str, username: Option<&str>) -> User {
    let now = Utc::now();
    User {
        id: Uuid::now_v7(),
        email: email.to_owned(),
        username: username.map(str::to_owned),
        name: None,
        image: None,
        bio: None,
        location: None,
        email_verified: Some(now),
        created_at: now,
        updated_at: now,
        last_login_at: Some(now),
        login_count: 1,
        onboarding_completed: false,
        onboarding_step: None,
    }
}

pub fn test_ink(author_id: Uuid, visibility: Visibility) -> Ink {
    let now = Utc::now();
    Ink {
        id: Uuid::now_v7(),
        content: "a few words of ink".to_owned(),
        author_id,
        created_at: now,
        updated_at: now,
        reading_time: 2,
        views: 0,
        kind: "thought".to_owned(),
        theme: "plain".to_owned(),
        visibility,
        is_pinned: false,
    }
}

pub fn test_session(user_id: Uuid, token: &str, ttl_secs: i64) -> Session {
    Session {
        id: Uuid::now_v7(),
        session_token: token.to_owned(),
        user_id,
        expires: Utc::now() + Duration::seconds(ttl_secs),
    }
}

// ── MockUserRepo ─────────────────────────────────────────────────────────────

pub struct MockUserRepo {
    pub users: Arc<Mutex<Vec<User>>>,
    /// (follower, following) pairs consulted by `list_suggestions`.
    pub follows: Vec<(Uuid, Uuid)>,
}

impl MockUserRepo {
    pub fn new(users: Vec<User>) -> Self {
        Self {
            users: Arc::new(Mutex::new(users)),
            follows: vec![],
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }

    pub fn users_handle(&self) -> Arc<Mutex<Vec<User>>> {
        Arc::clone(&self.users)
    }
}

impl UserRepository for MockUserRepo {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ApiError> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, ApiError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.username.as_deref() == Some(username))
            .cloned())
    }

    async fn list_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, ApiError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .filter(|u| ids.contains(&u.id))
            .cloned()
            .collect())
    }

    async fn create(&self, user: &User) -> Result<(), ApiError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == user.email) {
            return Err(ApiError::EmailTaken);
        }
        users.push(user.clone());
        Ok(())
    }

    async fn update_profile(&self, id: Uuid, patch: &UserProfilePatch) -> Result<(), ApiError> {
        let mut users = self.users.lock().unwrap();
        if let Some(ref username) = patch.username {
            if users
                .iter()
                .any(|u| u.id != id && u.username.as_deref() == Some(username))
            {
                return Err(ApiError::UsernameTaken);
            }
        }
        let Some(user) = users.iter_mut().find(|u| u.id == id) else {
            return Err(ApiError::UserNotFound);
        };
        if let Some(ref username) = patch.username {
            user.username = Some(username.clone());
        }
        if let Some(ref name) = patch.name {
            user.name = Some(name.clone());
        }
        if let Some(ref image) = patch.image {
            user.image = Some(image.clone());
        }
        if let Some(ref bio) = patch.bio {
            user.bio = Some(bio.clone());
        }
        if let Some(ref location) = patch.location {
            user.location = Some(location.clone());
        }
        user.updated_at = Utc::now();
        Ok(())
    }

    async fn set_onboarding_state(
        &self,
        id: Uuid,
        completed: bool,
        step: Option<&str>,
    ) -> Result<(), ApiError> {
        let mut users = self.users.lock().unwrap();
        let Some(user) = users.iter_mut().find(|u| u.id == id) else {
            return Err(ApiError::UserNotFound);
        };
        user.onboarding_completed = completed;
        user.onboarding_step = step.map(str::to_owned);
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ApiError> {
        let mut users = self.users.lock().unwrap();
        let before = users.len();
        users.retain(|u| u.id != id);
        Ok(users.len() < before)
    }

    async fn list_suggestions(&self, for_user: Uuid, limit: u32) -> Result<Vec<User>, ApiError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .filter(|u| u.id != for_user)
            .filter(|u| !self.follows.contains(&(for_user, u.id)))
            .take(limit as usize)
            .cloned()
            .collect())
    }
}

// ── MockAccountRepo ──────────────────────────────────────────────────────────

pub struct MockAccountRepo {
    pub accounts: Arc<Mutex<Vec<Account>>>,
}

impl MockAccountRepo {
    pub fn new(accounts: Vec<Account>) -> Self {
        Self {
            accounts: Arc::new(Mutex::new(accounts)),
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }

    pub fn accounts_handle(&self) -> Arc<Mutex<Vec<Account>>> {
        Arc::clone(&self.accounts)
    }
}

impl AccountRepository for MockAccountRepo {
    async fn upsert(&self, account: &Account) -> Result<(), ApiError> {
        let mut accounts = self.accounts.lock().unwrap();
        if let Some(existing) = accounts.iter_mut().find(|a| {
            a.provider == account.provider && a.provider_account_id == account.provider_account_id
        }) {
            if existing.user_id != account.user_id {
                return Err(ApiError::AccountAlreadyLinked);
            }
            existing.refresh_token = account.refresh_token.clone();
            existing.access_token = account.access_token.clone();
            existing.expires_at = account.expires_at;
            return Ok(());
        }
        accounts.push(account.clone());
        Ok(())
    }

    async fn find_by_provider(
        &self,
        provider: &str,
        provider_account_id: &str,
    ) -> Result<Option<Account>, ApiError> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.provider == provider && a.provider_account_id == provider_account_id)
            .cloned())
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Account>, ApiError> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn unlink(
        &self,
        user_id: Uuid,
        provider: &str,
        provider_account_id: &str,
    ) -> Result<bool, ApiError> {
        let mut accounts = self.accounts.lock().unwrap();
        let before = accounts.len();
        accounts.retain(|a| {
            !(a.user_id == user_id
                && a.provider == provider
                && a.provider_account_id == provider_account_id)
        });
        Ok(accounts.len() < before)
    }
}

// ── MockSessionRepo ──────────────────────────────────────────────────────────

pub struct MockSessionRepo {
    pub sessions: Arc<Mutex<Vec<Session>>>,
}

impl MockSessionRepo {
    pub fn new(sessions: Vec<Session>) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(sessions)),
        }
    }

    pub fn sessions_handle(&self) -> Arc<Mutex<Vec<Session>>> {
        Arc::clone(&self.sessions)
    }
}

impl SessionRepository for MockSessionRepo {
    async fn find_by_token(&self, token: &str) -> Result<Option<Session>, ApiError> {
        Ok(self
            .sessions
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.session_token == token)
            .cloned())
    }

    async fn renew(
        &self,
        token: &str,
        expires: chrono::DateTime<Utc>,
    ) -> Result<(), ApiError> {
        if let Some(session) = self
            .sessions
            .lock()
            .unwrap()
            .iter_mut()
            .find(|s| s.session_token == token)
        {
            session.expires = expires;
        }
        Ok(())
    }

    async fn delete_by_token(&self, token: &str) -> Result<bool, ApiError> {
        let mut sessions = self.sessions.lock().unwrap();
        let before = sessions.len();
        sessions.retain(|s| s.session_token != token);
        Ok(sessions.len() < before)
    }

    async fn delete_expired(&self, now: chrono::DateTime<Utc>) -> Result<u64, ApiError> {
        let mut sessions = self.sessions.lock().unwrap();
        let before = sessions.len();
        sessions.retain(|s| s.expires > now);
        Ok((before - sessions.len()) as u64)
    }
}

// ── MockVerificationTokenRepo ────────────────────────────────────────────────

pub struct MockVerificationTokenRepo {
    pub tokens: Arc<Mutex<Vec<VerificationToken>>>,
}

impl MockVerificationTokenRepo {
    pub fn new(tokens: Vec<VerificationToken>) -> Self {
        Self {
            tokens: Arc::new(Mutex::new(tokens)),
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }

    pub fn tokens_handle(&self) -> Arc<Mutex<Vec<VerificationToken>>> {
        Arc::clone(&self.tokens)
    }
}

impl VerificationTokenRepository for MockVerificationTokenRepo {
    async fn create(&self, token: &VerificationToken) -> Result<(), ApiError> {
        self.tokens.lock().unwrap().push(token.clone());
        Ok(())
    }

    async fn delete_expired(&self, now: chrono::DateTime<Utc>) -> Result<u64, ApiError> {
        let mut tokens = self.tokens.lock().unwrap();
        let before = tokens.len();
        tokens.retain(|t| t.expires > now);
        Ok((before - tokens.len()) as u64)
    }
}

// ── MockSignInPort ───────────────────────────────────────────────────────────

/// Mirrors the sign-in transaction against in-memory stores.
pub struct MockSignInPort {
    pub users: Arc<Mutex<Vec<User>>>,
    pub tokens: Arc<Mutex<Vec<VerificationToken>>>,
    pub sessions: Arc<Mutex<Vec<Session>>>,
}

impl MockSignInPort {
    pub fn new(users: Vec<User>, tokens: Vec<VerificationToken>) -> Self {
        Self {
            users: Arc::new(Mutex::new(users)),
            tokens: Arc::new(Mutex::new(tokens)),
            sessions: Arc::new(Mutex::new(vec![])),
        }
    }
}

impl SignInPort for MockSignInPort {
    async fn sign_in(
        &self,
        email: &str,
        code: &str,
        session_token: &str,
        session_expires: chrono::DateTime<Utc>,
        now: chrono::DateTime<Utc>,
    ) -> Result<SignInOutcome, ApiError> {
        let consumed = {
            let mut tokens = self.tokens.lock().unwrap();
            let found = tokens
                .iter()
                .position(|t| t.identifier == email && t.token == code);
            found.map(|i| tokens.remove(i)).filter(|t| t.expires > now)
        };
        if consumed.is_none() {
            return Err(ApiError::InvalidSignInCode);
        }

        let mut users = self.users.lock().unwrap();
        let (user, created_user) = match users.iter_mut().find(|u| u.email == email) {
            Some(user) => {
                user.last_login_at = Some(now);
                user.login_count += 1;
                (user.clone(), false)
            }
            None => {
                let mut user = test_user(email, None);
                user.created_at = now;
                users.push(user.clone());
                (user, true)
            }
        };

        let session = Session {
            id: Uuid::now_v7(),
            session_token: session_token.to_owned(),
            user_id: user.id,
            expires: session_expires,
        };
        self.sessions.lock().unwrap().push(session.clone());
        Ok(SignInOutcome {
            user,
            session,
            created_user,
        })
    }
}

// ── MockInkRepo ──────────────────────────────────────────────────────────────

pub struct MockInkRepo {
    pub inks: Arc<Mutex<Vec<Ink>>>,
}

impl MockInkRepo {
    pub fn new(inks: Vec<Ink>) -> Self {
        Self {
            inks: Arc::new(Mutex::new(inks)),
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }

    pub fn inks_handle(&self) -> Arc<Mutex<Vec<Ink>>> {
        Arc::clone(&self.inks)
    }
}

impl InkRepository for MockInkRepo {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Ink>, ApiError> {
        Ok(self.inks.lock().unwrap().iter().find(|i| i.id == id).cloned())
    }

    async fn feed(&self, cursor: CursorRequest) -> Result<CursorPage<Ink>, ApiError> {
        let CursorRequest { after, limit } = cursor.clamped();
        let mut public: Vec<Ink> = self
            .inks
            .lock()
            .unwrap()
            .iter()
            .filter(|i| i.visibility == Visibility::Public)
            .cloned()
            .collect();
        public.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        let start = match after {
            Some(id) => public
                .iter()
                .position(|i| i.id == id)
                .map(|p| p + 1)
                .unwrap_or(0),
            None => 0,
        };
        let rest = &public[start.min(public.len())..];
        let items: Vec<Ink> = rest.iter().take(limit as usize).cloned().collect();
        let next = if rest.len() > items.len() {
            items.last().map(|i| i.id)
        } else {
            None
        };
        Ok(CursorPage { items, next })
    }

    async fn list_by_author(
        &self,
        author_id: Uuid,
        include_hidden: bool,
        sort_by: InkSortBy,
        page: PageRequest,
    ) -> Result<Vec<Ink>, ApiError> {
        let page = page.clamped();
        let mut items: Vec<Ink> = self
            .inks
            .lock()
            .unwrap()
            .iter()
            .filter(|i| i.author_id == author_id)
            .filter(|i| include_hidden || i.visibility == Visibility::Public)
            .cloned()
            .collect();
        match sort_by {
            InkSortBy::CreatedAt(Sort::Desc) => {
                items.sort_by(|a, b| b.created_at.cmp(&a.created_at))
            }
            InkSortBy::CreatedAt(Sort::Asc) => {
                items.sort_by(|a, b| a.created_at.cmp(&b.created_at))
            }
            InkSortBy::Views(Sort::Desc) => items.sort_by(|a, b| b.views.cmp(&a.views)),
            InkSortBy::Views(Sort::Asc) => items.sort_by(|a, b| a.views.cmp(&b.views)),
        }
        Ok(items
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.per_page as usize)
            .collect())
    }

    async fn latest_by_author(&self, author_id: Uuid) -> Result<Option<Ink>, ApiError> {
        Ok(self
            .inks
            .lock()
            .unwrap()
            .iter()
            .filter(|i| i.author_id == author_id)
            .max_by_key(|i| i.created_at)
            .cloned())
    }

    async fn create(&self, ink: &Ink) -> Result<(), ApiError> {
        self.inks.lock().unwrap().push(ink.clone());
        Ok(())
    }

    async fn update(
        &self,
        id: Uuid,
        patch: &InkPatch,
        now: chrono::DateTime<Utc>,
    ) -> Result<(), ApiError> {
        let mut inks = self.inks.lock().unwrap();
        let Some(ink) = inks.iter_mut().find(|i| i.id == id) else {
            return Err(ApiError::InkNotFound);
        };
        if let Some(ref content) = patch.content {
            ink.content = content.clone();
        }
        if let Some(ref kind) = patch.kind {
            ink.kind = kind.clone();
        }
        if let Some(ref theme) = patch.theme {
            ink.theme = theme.clone();
        }
        if let Some(visibility) = patch.visibility {
            ink.visibility = visibility;
        }
        if let Some(reading_time) = patch.reading_time {
            ink.reading_time = reading_time;
        }
        ink.updated_at = now;
        Ok(())
    }

    async fn set_pinned(
        &self,
        author_id: Uuid,
        ink_id: Uuid,
        pinned: bool,
    ) -> Result<(), ApiError> {
        let mut inks = self.inks.lock().unwrap();
        if pinned {
            for ink in inks.iter_mut().filter(|i| i.author_id == author_id) {
                ink.is_pinned = false;
            }
        }
        let Some(ink) = inks
            .iter_mut()
            .find(|i| i.id == ink_id && i.author_id == author_id)
        else {
            return Err(ApiError::InkNotFound);
        };
        ink.is_pinned = pinned;
        Ok(())
    }

    async fn increment_views(&self, id: Uuid) -> Result<(), ApiError> {
        let mut inks = self.inks.lock().unwrap();
        let Some(ink) = inks.iter_mut().find(|i| i.id == id) else {
            return Err(ApiError::InkNotFound);
        };
        ink.views += 1;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ApiError> {
        let mut inks = self.inks.lock().unwrap();
        let before = inks.len();
        inks.retain(|i| i.id != id);
        Ok(inks.len() < before)
    }

    async fn count_by_author(&self, author_id: Uuid) -> Result<u64, ApiError> {
        Ok(self
            .inks
            .lock()
            .unwrap()
            .iter()
            .filter(|i| i.author_id == author_id)
            .count() as u64)
    }

    async fn author_stats(&self, author_id: Uuid) -> Result<InkStats, ApiError> {
        let inks = self.inks.lock().unwrap();
        let authored: Vec<&Ink> = inks.iter().filter(|i| i.author_id == author_id).collect();
        if authored.is_empty() {
            return Ok(InkStats::default());
        }
        let total_views: i64 = authored.iter().map(|i| i.views as i64).sum();
        Ok(InkStats {
            ink_count: authored.len() as u64,
            total_views,
            avg_views: total_views as f64 / authored.len() as f64,
            min_views: authored.iter().map(|i| i.views).min().unwrap_or(0),
            max_views: authored.iter().map(|i| i.views).max().unwrap_or(0),
            total_reading_time: authored.iter().map(|i| i.reading_time as i64).sum(),
        })
    }

    async fn trending(
        &self,
        _since: chrono::DateTime<Utc>,
        _min_reactions: i64,
        _limit: u32,
    ) -> Result<Vec<TrendingInk>, ApiError> {
        Ok(vec![])
    }
}

// ── MockReactionRepo ─────────────────────────────────────────────────────────

pub struct MockReactionRepo {
    pub reactions: Arc<Mutex<Vec<Reaction>>>,
}

impl MockReactionRepo {
    pub fn new(reactions: Vec<Reaction>) -> Self {
        Self {
            reactions: Arc::new(Mutex::new(reactions)),
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }

    pub fn reactions_handle(&self) -> Arc<Mutex<Vec<Reaction>>> {
        Arc::clone(&self.reactions)
    }
}

impl ReactionRepository for MockReactionRepo {
    async fn set(&self, reaction: &Reaction) -> Result<bool, ApiError> {
        let mut reactions = self.reactions.lock().unwrap();
        if reactions.iter().any(|r| {
            r.ink_id == reaction.ink_id && r.user_id == reaction.user_id && r.kind == reaction.kind
        }) {
            return Ok(false);
        }
        reactions.push(reaction.clone());
        Ok(true)
    }

    async fn unset(
        &self,
        ink_id: Uuid,
        user_id: Uuid,
        kind: ReactionKind,
    ) -> Result<bool, ApiError> {
        let mut reactions = self.reactions.lock().unwrap();
        let before = reactions.len();
        reactions.retain(|r| !(r.ink_id == ink_id && r.user_id == user_id && r.kind == kind));
        Ok(reactions.len() < before)
    }

    async fn counts_for_ink(&self, ink_id: Uuid) -> Result<Vec<ReactionCount>, ApiError> {
        let reactions = self.reactions.lock().unwrap();
        let mut counts: Vec<ReactionCount> = vec![];
        for kind in ReactionKind::ALL {
            let count = reactions
                .iter()
                .filter(|r| r.ink_id == ink_id && r.kind == kind)
                .count() as u64;
            if count > 0 {
                counts.push(ReactionCount { kind, count });
            }
        }
        Ok(counts)
    }

    async fn kinds_for(&self, ink_id: Uuid, user_id: Uuid) -> Result<Vec<ReactionKind>, ApiError> {
        Ok(self
            .reactions
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.ink_id == ink_id && r.user_id == user_id)
            .map(|r| r.kind)
            .collect())
    }

    async fn list_reactor_ids(&self, ink_id: Uuid) -> Result<Vec<Uuid>, ApiError> {
        let reactions = self.reactions.lock().unwrap();
        let mut ids: Vec<Uuid> = vec![];
        for reaction in reactions.iter().filter(|r| r.ink_id == ink_id) {
            if !ids.contains(&reaction.user_id) {
                ids.push(reaction.user_id);
            }
        }
        Ok(ids)
    }

    async fn count_received_by_author(&self, _author_id: Uuid) -> Result<u64, ApiError> {
        Ok(self.reactions.lock().unwrap().len() as u64)
    }
}

// ── MockFollowRepo ───────────────────────────────────────────────────────────

pub struct MockFollowRepo {
    pub follows: Arc<Mutex<Vec<Follow>>>,
}

impl MockFollowRepo {
    pub fn new(follows: Vec<Follow>) -> Self {
        Self {
            follows: Arc::new(Mutex::new(follows)),
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }

    pub fn follows_handle(&self) -> Arc<Mutex<Vec<Follow>>> {
        Arc::clone(&self.follows)
    }
}

impl FollowRepository for MockFollowRepo {
    async fn follow(&self, follow: &Follow) -> Result<(), ApiError> {
        let mut follows = self.follows.lock().unwrap();
        if follows
            .iter()
            .any(|f| f.follower_id == follow.follower_id && f.following_id == follow.following_id)
        {
            return Err(ApiError::AlreadyFollowing);
        }
        follows.push(follow.clone());
        Ok(())
    }

    async fn follow_many(&self, batch: &[Follow]) -> Result<u64, ApiError> {
        let mut follows = self.follows.lock().unwrap();
        let mut inserted = 0;
        for follow in batch {
            let exists = follows.iter().any(|f| {
                f.follower_id == follow.follower_id && f.following_id == follow.following_id
            });
            if !exists {
                follows.push(follow.clone());
                inserted += 1;
            }
        }
        Ok(inserted)
    }

    async fn unfollow(&self, follower_id: Uuid, following_id: Uuid) -> Result<bool, ApiError> {
        let mut follows = self.follows.lock().unwrap();
        let before = follows.len();
        follows.retain(|f| !(f.follower_id == follower_id && f.following_id == following_id));
        Ok(follows.len() < before)
    }

    async fn is_following(
        &self,
        follower_id: Uuid,
        following_id: Uuid,
    ) -> Result<bool, ApiError> {
        Ok(self
            .follows
            .lock()
            .unwrap()
            .iter()
            .any(|f| f.follower_id == follower_id && f.following_id == following_id))
    }

    async fn list_following(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<Follow>, ApiError> {
        let page = page.clamped();
        let mut edges: Vec<Follow> = self
            .follows
            .lock()
            .unwrap()
            .iter()
            .filter(|f| f.follower_id == user_id)
            .cloned()
            .collect();
        edges.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(edges
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.per_page as usize)
            .collect())
    }

    async fn list_followers(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<Follow>, ApiError> {
        let page = page.clamped();
        let mut edges: Vec<Follow> = self
            .follows
            .lock()
            .unwrap()
            .iter()
            .filter(|f| f.following_id == user_id)
            .cloned()
            .collect();
        edges.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(edges
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.per_page as usize)
            .collect())
    }

    async fn count_following(&self, user_id: Uuid) -> Result<u64, ApiError> {
        Ok(self
            .follows
            .lock()
            .unwrap()
            .iter()
            .filter(|f| f.follower_id == user_id)
            .count() as u64)
    }

    async fn count_followers(&self, user_id: Uuid) -> Result<u64, ApiError> {
        Ok(self
            .follows
            .lock()
            .unwrap()
            .iter()
            .filter(|f| f.following_id == user_id)
            .count() as u64)
    }
}

// ── MockSettingsRepo ─────────────────────────────────────────────────────────

pub struct MockSettingsRepo {
    pub rows: Arc<Mutex<Vec<NotificationSettings>>>,
}

impl MockSettingsRepo {
    pub fn new(rows: Vec<NotificationSettings>) -> Self {
        Self {
            rows: Arc::new(Mutex::new(rows)),
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }

    pub fn rows_handle(&self) -> Arc<Mutex<Vec<NotificationSettings>>> {
        Arc::clone(&self.rows)
    }
}

impl NotificationSettingsRepository for MockSettingsRepo {
    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<NotificationSettings>, ApiError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.user_id == user_id)
            .cloned())
    }

    async fn upsert(&self, settings: &NotificationSettings) -> Result<(), ApiError> {
        let mut rows = self.rows.lock().unwrap();
        if let Some(existing) = rows.iter_mut().find(|s| s.user_id == settings.user_id) {
            *existing = settings.clone();
        } else {
            rows.push(settings.clone());
        }
        Ok(())
    }

    async fn update_flags(
        &self,
        user_id: Uuid,
        patch: &NotificationFlagsPatch,
        now: chrono::DateTime<Utc>,
    ) -> Result<(), ApiError> {
        let mut rows = self.rows.lock().unwrap();
        let Some(settings) = rows.iter_mut().find(|s| s.user_id == user_id) else {
            return Err(ApiError::SettingsNotFound);
        };
        if let Some(v) = patch.push_enabled {
            settings.push_enabled = v;
        }
        if let Some(v) = patch.new_follower {
            settings.new_follower = v;
        }
        if let Some(v) = patch.new_reaction {
            settings.new_reaction = v;
        }
        if let Some(v) = patch.trending_inks {
            settings.trending_inks = v;
        }
        if let Some(v) = patch.followed_user_inks {
            settings.followed_user_inks = v;
        }
        if let Some(v) = patch.most_reacted {
            settings.most_reacted = v;
        }
        if let Some(v) = patch.suggestions {
            settings.suggestions = v;
        }
        if let Some(v) = patch.editors_pick {
            settings.editors_pick = v;
        }
        if let Some(status) = patch.permission_status {
            settings.permission_status = status;
        }
        settings.last_updated = now;
        Ok(())
    }
}

// ── MockOnboardingRepo ───────────────────────────────────────────────────────

pub struct MockOnboardingRepo {
    pub rows: Arc<Mutex<Vec<OnboardingProfile>>>,
    /// Recorded `complete` calls: (user_id, step, follow edges).
    pub completed: Arc<Mutex<Vec<(Uuid, Option<String>, Vec<Follow>)>>>,
}

impl MockOnboardingRepo {
    pub fn new(rows: Vec<OnboardingProfile>) -> Self {
        Self {
            rows: Arc::new(Mutex::new(rows)),
            completed: Arc::new(Mutex::new(vec![])),
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }

    pub fn completed_handle(&self) -> Arc<Mutex<Vec<(Uuid, Option<String>, Vec<Follow>)>>> {
        Arc::clone(&self.completed)
    }
}

impl OnboardingRepository for MockOnboardingRepo {
    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<OnboardingProfile>, ApiError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.user_id == user_id)
            .cloned())
    }

    async fn upsert(&self, profile: &OnboardingProfile) -> Result<(), ApiError> {
        let mut rows = self.rows.lock().unwrap();
        if let Some(existing) = rows.iter_mut().find(|p| p.user_id == profile.user_id) {
            existing.following_suggestions = profile.following_suggestions.clone();
            existing.interests = profile.interests.clone();
            existing.updated_at = profile.updated_at;
        } else {
            rows.push(profile.clone());
        }
        Ok(())
    }

    async fn complete(
        &self,
        user_id: Uuid,
        step: Option<&str>,
        follows: &[Follow],
        now: chrono::DateTime<Utc>,
    ) -> Result<(), ApiError> {
        if let Some(profile) = self
            .rows
            .lock()
            .unwrap()
            .iter_mut()
            .find(|p| p.user_id == user_id)
        {
            profile.updated_at = now;
        }
        self.completed
            .lock()
            .unwrap()
            .push((user_id, step.map(str::to_owned), follows.to_vec()));
        Ok(())
    }
}
