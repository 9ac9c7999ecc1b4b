use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Api service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("user not found")]
    UserNotFound,
    #[error("ink not found")]
    InkNotFound,
    #[error("session not found")]
    SessionNotFound,
    #[error("account not found")]
    AccountNotFound,
    #[error("reaction not found")]
    ReactionNotFound,
    #[error("follow not found")]
    FollowNotFound,
    #[error("notification settings not found")]
    SettingsNotFound,
    #[error("onboarding profile not found")]
    OnboardingNotFound,
    #[error("invalid sign-in code")]
    InvalidSignInCode,
    #[error("email already in use")]
    EmailTaken,
    #[error("username already in use")]
    UsernameTaken,
    #[error("account already linked")]
    AccountAlreadyLinked,
    #[error("already following")]
    AlreadyFollowing,
    #[error("cannot follow yourself")]
    SelfFollow,
    #[error("invalid username")]
    InvalidUsername,
    #[error("invalid reaction kind")]
    InvalidReactionKind,
    #[error("invalid visibility")]
    InvalidVisibility,
    #[error("missing data")]
    MissingData,
    #[error("forbidden")]
    Forbidden,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::InkNotFound => "INK_NOT_FOUND",
            Self::SessionNotFound => "SESSION_NOT_FOUND",
            Self::AccountNotFound => "ACCOUNT_NOT_FOUND",
            Self::ReactionNotFound => "REACTION_NOT_FOUND",
            Self::FollowNotFound => "FOLLOW_NOT_FOUND",
            Self::SettingsNotFound => "SETTINGS_NOT_FOUND",
            Self::OnboardingNotFound => "ONBOARDING_NOT_FOUND",
            Self::InvalidSignInCode => "INVALID_SIGN_IN_CODE",
            Self::EmailTaken => "EMAIL_TAKEN",
            Self::UsernameTaken => "USERNAME_TAKEN",
            Self::AccountAlreadyLinked => "ACCOUNT_ALREADY_LINKED",
            Self::AlreadyFollowing => "ALREADY_FOLLOWING",
            Self::SelfFollow => "SELF_FOLLOW",
            Self::InvalidUsername => "INVALID_USERNAME",
            Self::InvalidReactionKind => "INVALID_REACTION_KIND",
            Self::InvalidVisibility => "INVALID_VISIBILITY",
            Self::MissingData => "MISSING_DATA",
            Self::Forbidden => "FORBIDDEN",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::UserNotFound
            | Self::InkNotFound
            | Self::SessionNotFound
            | Self::AccountNotFound
            | Self::ReactionNotFound
            | Self::FollowNotFound
            | Self::SettingsNotFound
            | Self::OnboardingNotFound => StatusCode::NOT_FOUND,
            Self::EmailTaken
            | Self::UsernameTaken
            | Self::AccountAlreadyLinked
            | Self::AlreadyFollowing => StatusCode::CONFLICT,
            Self::InvalidSignInCode => StatusCode::UNAUTHORIZED,
            Self::SelfFollow
            | Self::InvalidUsername
            | Self::InvalidReactionKind
            | Self::InvalidVisibility
            | Self::MissingData => StatusCode::BAD_REQUEST,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %e, kind = "INTERNAL", "internal error");
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
