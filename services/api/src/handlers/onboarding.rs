use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use inkwell_core::identity::Identity;

use crate::domain::types::OnboardingProfile;
use crate::error::ApiError;
use crate::state::AppState;
use crate::usecase::onboarding::{
    AdvanceOnboardingStepUseCase, CompleteOnboardingInput, CompleteOnboardingUseCase,
    GetOnboardingUseCase, PutOnboardingInput, PutOnboardingUseCase,
};

// ── Response type ────────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct OnboardingResponse {
    pub following_suggestions: Vec<String>,
    pub interests: Vec<String>,
    #[serde(serialize_with = "inkwell_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "inkwell_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<OnboardingProfile> for OnboardingResponse {
    fn from(profile: OnboardingProfile) -> Self {
        Self {
            following_suggestions: profile
                .following_suggestions
                .iter()
                .map(Uuid::to_string)
                .collect(),
            interests: profile.interests,
            created_at: profile.created_at,
            updated_at: profile.updated_at,
        }
    }
}

// ── GET /users/@me/onboarding ────────────────────────────────────────────────

pub async fn get_onboarding(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<Json<OnboardingResponse>, ApiError> {
    let usecase = GetOnboardingUseCase {
        onboarding: state.onboarding_repo(),
    };
    let profile = usecase.execute(identity.user_id).await?;
    Ok(Json(profile.into()))
}

// ── PUT /users/@me/onboarding ────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct PutOnboardingRequest {
    pub following_suggestions: Vec<Uuid>,
    pub interests: Vec<String>,
}

pub async fn put_onboarding(
    identity: Identity,
    State(state): State<AppState>,
    Json(body): Json<PutOnboardingRequest>,
) -> Result<Json<OnboardingResponse>, ApiError> {
    let usecase = PutOnboardingUseCase {
        onboarding: state.onboarding_repo(),
    };
    let profile = usecase
        .execute(
            identity.user_id,
            PutOnboardingInput {
                following_suggestions: body.following_suggestions,
                interests: body.interests,
            },
        )
        .await?;
    Ok(Json(profile.into()))
}

// ── POST /users/@me/onboarding/step ──────────────────────────────────────────

#[derive(Deserialize)]
pub struct AdvanceStepRequest {
    pub step: String,
}

pub async fn advance_onboarding_step(
    identity: Identity,
    State(state): State<AppState>,
    Json(body): Json<AdvanceStepRequest>,
) -> Result<StatusCode, ApiError> {
    let usecase = AdvanceOnboardingStepUseCase {
        users: state.user_repo(),
    };
    usecase.execute(identity.user_id, body.step).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── POST /users/@me/onboarding/complete ──────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct CompleteOnboardingRequest {
    #[serde(default)]
    pub accepted_suggestions: Vec<Uuid>,
    pub step: Option<String>,
}

pub async fn complete_onboarding(
    identity: Identity,
    State(state): State<AppState>,
    Json(body): Json<CompleteOnboardingRequest>,
) -> Result<StatusCode, ApiError> {
    let usecase = CompleteOnboardingUseCase {
        onboarding: state.onboarding_repo(),
    };
    usecase
        .execute(
            identity.user_id,
            CompleteOnboardingInput {
                accepted_suggestions: body.accepted_suggestions,
                step: body.step,
            },
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
