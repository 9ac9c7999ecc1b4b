use uuid::Uuid;

use inkwell_domain::ink::Visibility;

use crate::domain::repository::{FollowRepository, InkRepository, UserRepository};
use crate::domain::types::{Ink, User, UserProfilePatch, validate_username};
use crate::error::ApiError;

// ── GetUser ──────────────────────────────────────────────────────────────────

pub struct GetUserUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> GetUserUseCase<U> {
    pub async fn execute(&self, user_id: Uuid) -> Result<User, ApiError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(ApiError::UserNotFound)
    }
}

// ── GetProfile ───────────────────────────────────────────────────────────────

pub struct ProfileOutput {
    pub user: User,
    pub ink_count: u64,
    pub follower_count: u64,
    pub following_count: u64,
    /// The author's most recent ink, shown only when public.
    pub latest_ink: Option<Ink>,
}

pub struct GetProfileUseCase<U: UserRepository, I: InkRepository, F: FollowRepository> {
    pub users: U,
    pub inks: I,
    pub follows: F,
}

impl<U: UserRepository, I: InkRepository, F: FollowRepository> GetProfileUseCase<U, I, F> {
    pub async fn execute(&self, username: &str) -> Result<ProfileOutput, ApiError> {
        let user = self
            .users
            .find_by_username(username)
            .await?
            .ok_or(ApiError::UserNotFound)?;
        let ink_count = self.inks.count_by_author(user.id).await?;
        let follower_count = self.follows.count_followers(user.id).await?;
        let following_count = self.follows.count_following(user.id).await?;
        let latest_ink = self
            .inks
            .latest_by_author(user.id)
            .await?
            .filter(|ink| ink.visibility == Visibility::Public);
        Ok(ProfileOutput {
            user,
            ink_count,
            follower_count,
            following_count,
            latest_ink,
        })
    }
}

// ── UpdateProfile ────────────────────────────────────────────────────────────

pub struct UpdateProfileUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> UpdateProfileUseCase<U> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        patch: UserProfilePatch,
    ) -> Result<(), ApiError> {
        if patch.is_empty() {
            return Err(ApiError::MissingData);
        }
        if let Some(ref username) = patch.username {
            if !validate_username(username) {
                return Err(ApiError::InvalidUsername);
            }
            // The unique index backstops concurrent picks of the same name.
            if let Some(existing) = self.users.find_by_username(username).await? {
                if existing.id != user_id {
                    return Err(ApiError::UsernameTaken);
                }
            }
        }
        self.users.update_profile(user_id, &patch).await
    }
}

// ── DeleteUser ───────────────────────────────────────────────────────────────

pub struct DeleteUserUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> DeleteUserUseCase<U> {
    pub async fn execute(&self, user_id: Uuid) -> Result<(), ApiError> {
        let deleted = self.users.delete(user_id).await?;
        if !deleted {
            return Err(ApiError::UserNotFound);
        }
        Ok(())
    }
}

// ── SuggestUsers ─────────────────────────────────────────────────────────────

pub struct SuggestUsersUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> SuggestUsersUseCase<U> {
    pub async fn execute(&self, user_id: Uuid, limit: u32) -> Result<Vec<User>, ApiError> {
        self.users
            .list_suggestions(user_id, limit.clamp(1, 50))
            .await
    }
}
