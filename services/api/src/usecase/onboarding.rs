use chrono::Utc;
use uuid::Uuid;

use crate::domain::repository::{OnboardingRepository, UserRepository};
use crate::domain::types::{Follow, OnboardingProfile};
use crate::error::ApiError;

// ── GetOnboarding ────────────────────────────────────────────────────────────

pub struct GetOnboardingUseCase<O: OnboardingRepository> {
    pub onboarding: O,
}

impl<O: OnboardingRepository> GetOnboardingUseCase<O> {
    pub async fn execute(&self, user_id: Uuid) -> Result<OnboardingProfile, ApiError> {
        self.onboarding
            .find_by_user(user_id)
            .await?
            .ok_or(ApiError::OnboardingNotFound)
    }
}

// ── PutOnboarding ────────────────────────────────────────────────────────────

pub struct PutOnboardingInput {
    pub following_suggestions: Vec<Uuid>,
    pub interests: Vec<String>,
}

pub struct PutOnboardingUseCase<O: OnboardingRepository> {
    pub onboarding: O,
}

impl<O: OnboardingRepository> PutOnboardingUseCase<O> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        input: PutOnboardingInput,
    ) -> Result<OnboardingProfile, ApiError> {
        let now = Utc::now();
        let profile = OnboardingProfile {
            id: Uuid::now_v7(),
            user_id,
            following_suggestions: input.following_suggestions,
            interests: input.interests,
            created_at: now,
            updated_at: now,
        };
        self.onboarding.upsert(&profile).await?;
        Ok(profile)
    }
}

// ── AdvanceOnboardingStep ────────────────────────────────────────────────────

/// Record progress through the onboarding flow without completing it.
pub struct AdvanceOnboardingStepUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> AdvanceOnboardingStepUseCase<U> {
    pub async fn execute(&self, user_id: Uuid, step: String) -> Result<(), ApiError> {
        if step.trim().is_empty() {
            return Err(ApiError::MissingData);
        }
        self.users
            .set_onboarding_state(user_id, false, Some(&step))
            .await
    }
}

// ── CompleteOnboarding ───────────────────────────────────────────────────────

pub struct CompleteOnboardingInput {
    /// Suggestions the user accepted; they become follow edges.
    pub accepted_suggestions: Vec<Uuid>,
    pub step: Option<String>,
}

pub struct CompleteOnboardingUseCase<O: OnboardingRepository> {
    pub onboarding: O,
}

impl<O: OnboardingRepository> CompleteOnboardingUseCase<O> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        input: CompleteOnboardingInput,
    ) -> Result<(), ApiError> {
        let now = Utc::now();
        let follows: Vec<Follow> = input
            .accepted_suggestions
            .into_iter()
            .filter(|&id| id != user_id)
            .map(|following_id| Follow {
                follower_id: user_id,
                following_id,
                created_at: now,
            })
            .collect();
        self.onboarding
            .complete(user_id, input.step.as_deref(), &follows, now)
            .await
    }
}
