use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use inkwell_core::identity::Identity;

use crate::error::ApiError;
use crate::handlers::user::UserResponse;
use crate::state::AppState;
use crate::usecase::auth::{
    GetAccountUserUseCase, GetSessionUseCase, LinkAccountInput, LinkAccountUseCase,
    ListAccountsUseCase, PurgeExpiredUseCase, RequestSignInCodeInput, RequestSignInCodeUseCase,
    SignInInput, SignInUseCase, SignOutUseCase, UnlinkAccountUseCase,
};

// ── POST /auth/verification-tokens ───────────────────────────────────────────

#[derive(Deserialize)]
pub struct RequestSignInCodeRequest {
    pub email: String,
}

/// Delivery of the code (email) is handled out-of-band; the response carries
/// it so the gateway can hand it to the mailer.
#[derive(Serialize)]
pub struct VerificationTokenResponse {
    pub identifier: String,
    pub token: String,
    #[serde(serialize_with = "inkwell_core::serde::to_rfc3339_ms")]
    pub expires: chrono::DateTime<chrono::Utc>,
}

pub async fn create_verification_token(
    State(state): State<AppState>,
    Json(body): Json<RequestSignInCodeRequest>,
) -> Result<(StatusCode, Json<VerificationTokenResponse>), ApiError> {
    let usecase = RequestSignInCodeUseCase {
        tokens: state.verification_token_repo(),
    };
    let token = usecase
        .execute(RequestSignInCodeInput { email: body.email })
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(VerificationTokenResponse {
            identifier: token.identifier,
            token: token.token,
            expires: token.expires,
        }),
    ))
}

// ── POST /auth/sessions ──────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub code: String,
}

#[derive(Serialize)]
pub struct SessionResponse {
    pub session_token: String,
    #[serde(serialize_with = "inkwell_core::serde::to_rfc3339_ms")]
    pub expires: chrono::DateTime<chrono::Utc>,
    pub user: UserResponse,
}

#[derive(Serialize)]
pub struct SignInResponse {
    #[serde(flatten)]
    pub session: SessionResponse,
    pub created_user: bool,
}

pub async fn sign_in(
    State(state): State<AppState>,
    Json(body): Json<SignInRequest>,
) -> Result<(StatusCode, Json<SignInResponse>), ApiError> {
    let usecase = SignInUseCase {
        port: state.sign_in_port(),
    };
    let outcome = usecase
        .execute(SignInInput {
            email: body.email,
            code: body.code,
        })
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(SignInResponse {
            session: SessionResponse {
                session_token: outcome.session.session_token,
                expires: outcome.session.expires,
                user: outcome.user.into(),
            },
            created_user: outcome.created_user,
        }),
    ))
}

// ── GET /auth/sessions/{token} ───────────────────────────────────────────────

pub async fn get_session(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<SessionResponse>, ApiError> {
    let usecase = GetSessionUseCase {
        sessions: state.session_repo(),
        users: state.user_repo(),
    };
    let output = usecase.execute(&token).await?;
    Ok(Json(SessionResponse {
        session_token: output.session.session_token,
        expires: output.session.expires,
        user: output.user.into(),
    }))
}

// ── DELETE /auth/sessions/{token} ────────────────────────────────────────────

pub async fn sign_out(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<StatusCode, ApiError> {
    let usecase = SignOutUseCase {
        sessions: state.session_repo(),
    };
    usecase.execute(&token).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── POST /auth/accounts ──────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct LinkAccountRequest {
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

pub async fn link_account(
    identity: Identity,
    State(state): State<AppState>,
    Json(body): Json<LinkAccountRequest>,
) -> Result<StatusCode, ApiError> {
    let usecase = LinkAccountUseCase {
        accounts: state.account_repo(),
    };
    usecase
        .execute(LinkAccountInput {
            user_id: identity.user_id,
            kind: body.kind,
            provider: body.provider,
            provider_account_id: body.provider_account_id,
            refresh_token: body.refresh_token,
            access_token: body.access_token,
            expires_at: body.expires_at,
            token_type: body.token_type,
            scope: body.scope,
            id_token: body.id_token,
            session_state: body.session_state,
        })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── GET /auth/accounts ───────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct AccountResponse {
    pub kind: String,
    pub provider: String,
    pub provider_account_id: String,
    pub scope: Option<String>,
    /// Access-token expiry, seconds since the epoch.
    pub expires_at: Option<i64>,
}

pub async fn list_accounts(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<Json<Vec<AccountResponse>>, ApiError> {
    let usecase = ListAccountsUseCase {
        accounts: state.account_repo(),
    };
    let accounts = usecase.execute(identity.user_id).await?;
    let items = accounts
        .into_iter()
        .map(|account| AccountResponse {
            kind: account.kind,
            provider: account.provider,
            provider_account_id: account.provider_account_id,
            scope: account.scope,
            expires_at: account.expires_at,
        })
        .collect();
    Ok(Json(items))
}

// ── GET /auth/accounts/{provider}/{provider_account_id} ──────────────────────

/// Resolves an OAuth callback to the already-linked user.
pub async fn get_account_user(
    State(state): State<AppState>,
    Path((provider, provider_account_id)): Path<(String, String)>,
) -> Result<Json<UserResponse>, ApiError> {
    let usecase = GetAccountUserUseCase {
        accounts: state.account_repo(),
        users: state.user_repo(),
    };
    let user = usecase.execute(&provider, &provider_account_id).await?;
    Ok(Json(user.into()))
}

// ── DELETE /auth/accounts/{provider}/{provider_account_id} ───────────────────

pub async fn unlink_account(
    identity: Identity,
    State(state): State<AppState>,
    Path((provider, provider_account_id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    let usecase = UnlinkAccountUseCase {
        accounts: state.account_repo(),
    };
    usecase
        .execute(identity.user_id, &provider, &provider_account_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── POST /auth/purge-expired ─────────────────────────────────────────────────

#[derive(Serialize)]
pub struct PurgeExpiredResponse {
    pub sessions_removed: u64,
    pub tokens_removed: u64,
}

pub async fn purge_expired(
    State(state): State<AppState>,
) -> Result<Json<PurgeExpiredResponse>, ApiError> {
    let usecase = PurgeExpiredUseCase {
        sessions: state.session_repo(),
        tokens: state.verification_token_repo(),
    };
    let output = usecase.execute().await?;
    Ok(Json(PurgeExpiredResponse {
        sessions_removed: output.sessions_removed,
        tokens_removed: output.tokens_removed,
    }))
}
