use chrono::Utc;
use std::collections::HashSet;
use uuid::Uuid;

use inkwell_domain::pagination::PageRequest;

use crate::domain::repository::{FollowRepository, UserRepository};
use crate::domain::types::{Follow, User};
use crate::error::ApiError;

// ── FollowUser ───────────────────────────────────────────────────────────────

pub struct FollowUserUseCase<U: UserRepository, F: FollowRepository> {
    pub users: U,
    pub follows: F,
}

impl<U: UserRepository, F: FollowRepository> FollowUserUseCase<U, F> {
    pub async fn execute(&self, follower_id: Uuid, following_id: Uuid) -> Result<(), ApiError> {
        if follower_id == following_id {
            return Err(ApiError::SelfFollow);
        }
        self.users
            .find_by_id(following_id)
            .await?
            .ok_or(ApiError::UserNotFound)?;
        let follow = Follow {
            follower_id,
            following_id,
            created_at: Utc::now(),
        };
        self.follows.follow(&follow).await
    }
}

// ── FollowManyUsers ──────────────────────────────────────────────────────────

pub struct FollowManyUsersUseCase<F: FollowRepository> {
    pub follows: F,
}

impl<F: FollowRepository> FollowManyUsersUseCase<F> {
    /// Bulk follow that skips already-followed users; running it twice
    /// inserts nothing new. Returns the number of edges created.
    pub async fn execute(&self, follower_id: Uuid, targets: &[Uuid]) -> Result<u64, ApiError> {
        let now = Utc::now();
        let mut seen = HashSet::new();
        let batch: Vec<Follow> = targets
            .iter()
            .copied()
            .filter(|&id| id != follower_id && seen.insert(id))
            .map(|following_id| Follow {
                follower_id,
                following_id,
                created_at: now,
            })
            .collect();
        self.follows.follow_many(&batch).await
    }
}

// ── UnfollowUser ─────────────────────────────────────────────────────────────

pub struct UnfollowUserUseCase<F: FollowRepository> {
    pub follows: F,
}

impl<F: FollowRepository> UnfollowUserUseCase<F> {
    pub async fn execute(&self, follower_id: Uuid, following_id: Uuid) -> Result<(), ApiError> {
        let removed = self.follows.unfollow(follower_id, following_id).await?;
        if !removed {
            return Err(ApiError::FollowNotFound);
        }
        Ok(())
    }
}

// ── ListFollowing / ListFollowers ────────────────────────────────────────────

pub struct ListFollowingUseCase<F: FollowRepository, U: UserRepository> {
    pub follows: F,
    pub users: U,
}

impl<F: FollowRepository, U: UserRepository> ListFollowingUseCase<F, U> {
    pub async fn execute(&self, user_id: Uuid, page: PageRequest) -> Result<Vec<User>, ApiError> {
        let edges = self.follows.list_following(user_id, page).await?;
        let ids: Vec<Uuid> = edges.iter().map(|e| e.following_id).collect();
        resolve_in_edge_order(&self.users, &ids).await
    }
}

pub struct ListFollowersUseCase<F: FollowRepository, U: UserRepository> {
    pub follows: F,
    pub users: U,
}

impl<F: FollowRepository, U: UserRepository> ListFollowersUseCase<F, U> {
    pub async fn execute(&self, user_id: Uuid, page: PageRequest) -> Result<Vec<User>, ApiError> {
        let edges = self.follows.list_followers(user_id, page).await?;
        let ids: Vec<Uuid> = edges.iter().map(|e| e.follower_id).collect();
        resolve_in_edge_order(&self.users, &ids).await
    }
}

/// Fetch users for the edge ids, preserving the edges' newest-first order.
async fn resolve_in_edge_order<U: UserRepository>(
    users: &U,
    ids: &[Uuid],
) -> Result<Vec<User>, ApiError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let mut loaded = users.list_by_ids(ids).await?;
    let mut ordered = Vec::with_capacity(loaded.len());
    for id in ids {
        if let Some(pos) = loaded.iter().position(|u| u.id == *id) {
            ordered.push(loaded.swap_remove(pos));
        }
    }
    Ok(ordered)
}
