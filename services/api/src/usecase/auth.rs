use chrono::{Duration, Utc};
use rand::RngExt;
use uuid::Uuid;

use crate::domain::repository::{
    AccountRepository, SessionRepository, SignInOutcome, SignInPort, UserRepository,
    VerificationTokenRepository,
};
use crate::domain::types::{Account, Session, User, VerificationToken};
use crate::error::ApiError;

/// Charset for generating sign-in codes (uppercase alphanumeric).
const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

pub const SIGN_IN_CODE_LEN: usize = 8;
pub const SIGN_IN_CODE_TTL_SECS: i64 = 15 * 60;
pub const SESSION_TTL_SECS: i64 = 30 * 24 * 60 * 60;

fn generate_code() -> String {
    let mut rng = rand::rng();
    (0..SIGN_IN_CODE_LEN)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect()
}

fn generate_session_token() -> String {
    format!(
        "{}{}",
        Uuid::new_v4().simple(),
        Uuid::new_v4().simple()
    )
}

// ── RequestSignInCode ────────────────────────────────────────────────────────

pub struct RequestSignInCodeInput {
    pub email: String,
}

pub struct RequestSignInCodeUseCase<V: VerificationTokenRepository> {
    pub tokens: V,
}

impl<V: VerificationTokenRepository> RequestSignInCodeUseCase<V> {
    pub async fn execute(
        &self,
        input: RequestSignInCodeInput,
    ) -> Result<VerificationToken, ApiError> {
        if input.email.trim().is_empty() || !input.email.contains('@') {
            return Err(ApiError::MissingData);
        }
        let token = VerificationToken {
            identifier: input.email,
            token: generate_code(),
            expires: Utc::now() + Duration::seconds(SIGN_IN_CODE_TTL_SECS),
        };
        self.tokens.create(&token).await?;
        Ok(token)
    }
}

// ── SignIn ───────────────────────────────────────────────────────────────────

pub struct SignInInput {
    pub email: String,
    pub code: String,
}

pub struct SignInUseCase<P: SignInPort> {
    pub port: P,
}

impl<P: SignInPort> SignInUseCase<P> {
    pub async fn execute(&self, input: SignInInput) -> Result<SignInOutcome, ApiError> {
        if input.email.trim().is_empty() || input.code.trim().is_empty() {
            return Err(ApiError::MissingData);
        }
        let now = Utc::now();
        let session_token = generate_session_token();
        let session_expires = now + Duration::seconds(SESSION_TTL_SECS);
        self.port
            .sign_in(&input.email, &input.code, &session_token, session_expires, now)
            .await
    }
}

// ── GetSession ───────────────────────────────────────────────────────────────

pub struct GetSessionOutput {
    pub session: Session,
    pub user: User,
}

pub struct GetSessionUseCase<S: SessionRepository, U: UserRepository> {
    pub sessions: S,
    pub users: U,
}

impl<S: SessionRepository, U: UserRepository> GetSessionUseCase<S, U> {
    pub async fn execute(&self, token: &str) -> Result<GetSessionOutput, ApiError> {
        let mut session = self
            .sessions
            .find_by_token(token)
            .await?
            .ok_or(ApiError::SessionNotFound)?;

        let now = Utc::now();
        if session.is_expired(now) {
            self.sessions.delete_by_token(token).await?;
            return Err(ApiError::SessionNotFound);
        }

        // Sliding renewal once less than half the window remains.
        if (session.expires - now).num_seconds() < SESSION_TTL_SECS / 2 {
            let expires = now + Duration::seconds(SESSION_TTL_SECS);
            self.sessions.renew(token, expires).await?;
            session.expires = expires;
        }

        let user = self
            .users
            .find_by_id(session.user_id)
            .await?
            .ok_or(ApiError::UserNotFound)?;
        Ok(GetSessionOutput { session, user })
    }
}

// ── SignOut ──────────────────────────────────────────────────────────────────

pub struct SignOutUseCase<S: SessionRepository> {
    pub sessions: S,
}

impl<S: SessionRepository> SignOutUseCase<S> {
    pub async fn execute(&self, token: &str) -> Result<(), ApiError> {
        let deleted = self.sessions.delete_by_token(token).await?;
        if !deleted {
            return Err(ApiError::SessionNotFound);
        }
        Ok(())
    }
}

// ── LinkAccount ──────────────────────────────────────────────────────────────

pub struct LinkAccountInput {
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

pub struct LinkAccountUseCase<A: AccountRepository> {
    pub accounts: A,
}

impl<A: AccountRepository> LinkAccountUseCase<A> {
    pub async fn execute(&self, input: LinkAccountInput) -> Result<(), ApiError> {
        if input.kind.is_empty() || input.provider.is_empty() || input.provider_account_id.is_empty()
        {
            return Err(ApiError::MissingData);
        }
        let account = Account {
            id: Uuid::now_v7(),
            user_id: input.user_id,
            kind: input.kind,
            provider: input.provider,
            provider_account_id: input.provider_account_id,
            refresh_token: input.refresh_token,
            access_token: input.access_token,
            expires_at: input.expires_at,
            token_type: input.token_type,
            scope: input.scope,
            id_token: input.id_token,
            session_state: input.session_state,
        };
        self.accounts.upsert(&account).await
    }
}

// ── GetAccountUser ───────────────────────────────────────────────────────────

/// Resolve an OAuth callback to the linked user, if any.
pub struct GetAccountUserUseCase<A: AccountRepository, U: UserRepository> {
    pub accounts: A,
    pub users: U,
}

impl<A: AccountRepository, U: UserRepository> GetAccountUserUseCase<A, U> {
    pub async fn execute(
        &self,
        provider: &str,
        provider_account_id: &str,
    ) -> Result<User, ApiError> {
        let account = self
            .accounts
            .find_by_provider(provider, provider_account_id)
            .await?
            .ok_or(ApiError::AccountNotFound)?;
        self.users
            .find_by_id(account.user_id)
            .await?
            .ok_or(ApiError::UserNotFound)
    }
}

// ── ListAccounts ─────────────────────────────────────────────────────────────

pub struct ListAccountsUseCase<A: AccountRepository> {
    pub accounts: A,
}

impl<A: AccountRepository> ListAccountsUseCase<A> {
    pub async fn execute(&self, user_id: Uuid) -> Result<Vec<Account>, ApiError> {
        self.accounts.list_by_user(user_id).await
    }
}

// ── UnlinkAccount ────────────────────────────────────────────────────────────

pub struct UnlinkAccountUseCase<A: AccountRepository> {
    pub accounts: A,
}

impl<A: AccountRepository> UnlinkAccountUseCase<A> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        provider: &str,
        provider_account_id: &str,
    ) -> Result<(), ApiError> {
        let deleted = self
            .accounts
            .unlink(user_id, provider, provider_account_id)
            .await?;
        if !deleted {
            return Err(ApiError::AccountNotFound);
        }
        Ok(())
    }
}

// ── PurgeExpired ─────────────────────────────────────────────────────────────

pub struct PurgeExpiredOutput {
    pub sessions_removed: u64,
    pub tokens_removed: u64,
}

pub struct PurgeExpiredUseCase<S: SessionRepository, V: VerificationTokenRepository> {
    pub sessions: S,
    pub tokens: V,
}

impl<S: SessionRepository, V: VerificationTokenRepository> PurgeExpiredUseCase<S, V> {
    pub async fn execute(&self) -> Result<PurgeExpiredOutput, ApiError> {
        let now = Utc::now();
        let sessions_removed = self.sessions.delete_expired(now).await?;
        let tokens_removed = self.tokens.delete_expired(now).await?;
        Ok(PurgeExpiredOutput {
            sessions_removed,
            tokens_removed,
        })
    }
}
