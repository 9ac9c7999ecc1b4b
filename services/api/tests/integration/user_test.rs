use chrono::Utc;
use uuid::Uuid;

use inkwell_api::domain::types::{Follow, UserProfilePatch};
use inkwell_api::error::ApiError;
use inkwell_api::usecase::user::{
    DeleteUserUseCase, GetProfileUseCase, GetUserUseCase, SuggestUsersUseCase,
    UpdateProfileUseCase,
};
use inkwell_domain::ink::Visibility;

use crate::helpers::{MockFollowRepo, MockInkRepo, MockUserRepo, test_ink, test_user};

// ── GetUserUseCase ───────────────────────────────────────────────────────────

#[tokio::test]
async fn should_get_user_by_id() {
    let user = test_user("alice@example.com", Some("alice"));
    let usecase = GetUserUseCase {
        users: MockUserRepo::new(vec![user.clone()]),
    };
    let found = usecase.execute(user.id).await.unwrap();
    assert_eq!(found.email, "alice@example.com");
}

#[tokio::test]
async fn should_report_unknown_user() {
    let usecase = GetUserUseCase {
        users: MockUserRepo::empty(),
    };
    let result = usecase.execute(Uuid::new_v4()).await;
    assert!(matches!(result, Err(ApiError::UserNotFound)));
}

// ── GetProfileUseCase ────────────────────────────────────────────────────────

#[tokio::test]
async fn should_assemble_profile_with_counts_and_latest_public_ink() {
    let alice = test_user("alice@example.com", Some("alice"));
    let bob = test_user("bob@example.com", Some("bob"));
    let now = Utc::now();

    let mut older_public = test_ink(alice.id, Visibility::Public);
    older_public.created_at = now - chrono::Duration::hours(2);
    let mut newer_public = test_ink(alice.id, Visibility::Public);
    newer_public.created_at = now - chrono::Duration::hours(1);

    let usecase = GetProfileUseCase {
        users: MockUserRepo::new(vec![alice.clone(), bob.clone()]),
        inks: MockInkRepo::new(vec![older_public, newer_public.clone()]),
        follows: MockFollowRepo::new(vec![Follow {
            follower_id: bob.id,
            following_id: alice.id,
            created_at: now,
        }]),
    };

    let profile = usecase.execute("alice").await.unwrap();
    assert_eq!(profile.user.id, alice.id);
    assert_eq!(profile.ink_count, 2);
    assert_eq!(profile.follower_count, 1);
    assert_eq!(profile.following_count, 0);
    assert_eq!(profile.latest_ink.unwrap().id, newer_public.id);
}

#[tokio::test]
async fn should_hide_latest_ink_when_it_is_not_public() {
    let alice = test_user("alice@example.com", Some("alice"));
    let now = Utc::now();

    let mut public = test_ink(alice.id, Visibility::Public);
    public.created_at = now - chrono::Duration::hours(2);
    let mut private = test_ink(alice.id, Visibility::Private);
    private.created_at = now - chrono::Duration::hours(1);

    let usecase = GetProfileUseCase {
        users: MockUserRepo::new(vec![alice.clone()]),
        inks: MockInkRepo::new(vec![public, private]),
        follows: MockFollowRepo::empty(),
    };

    let profile = usecase.execute("alice").await.unwrap();
    assert!(profile.latest_ink.is_none());
}

#[tokio::test]
async fn should_report_unknown_profile_username() {
    let usecase = GetProfileUseCase {
        users: MockUserRepo::empty(),
        inks: MockInkRepo::empty(),
        follows: MockFollowRepo::empty(),
    };
    let result = usecase.execute("nobody").await;
    assert!(matches!(result, Err(ApiError::UserNotFound)));
}

// ── UpdateProfileUseCase ─────────────────────────────────────────────────────

#[tokio::test]
async fn should_reject_empty_profile_patch() {
    let user = test_user("alice@example.com", Some("alice"));
    let usecase = UpdateProfileUseCase {
        users: MockUserRepo::new(vec![user.clone()]),
    };
    let result = usecase.execute(user.id, UserProfilePatch::default()).await;
    assert!(matches!(result, Err(ApiError::MissingData)));
}

#[tokio::test]
async fn should_reject_invalid_username() {
    let user = test_user("alice@example.com", Some("alice"));
    let usecase = UpdateProfileUseCase {
        users: MockUserRepo::new(vec![user.clone()]),
    };
    for username in ["me", "Has Uppercase", "a", "@at"] {
        let patch = UserProfilePatch {
            username: Some(username.into()),
            ..Default::default()
        };
        let result = usecase.execute(user.id, patch).await;
        assert!(
            matches!(result, Err(ApiError::InvalidUsername)),
            "expected InvalidUsername for {username:?}, got {result:?}"
        );
    }
}

#[tokio::test]
async fn should_reject_username_held_by_another_user() {
    let alice = test_user("alice@example.com", Some("alice"));
    let bob = test_user("bob@example.com", Some("bob"));
    let usecase = UpdateProfileUseCase {
        users: MockUserRepo::new(vec![alice, bob.clone()]),
    };
    let patch = UserProfilePatch {
        username: Some("alice".into()),
        ..Default::default()
    };
    let result = usecase.execute(bob.id, patch).await;
    assert!(matches!(result, Err(ApiError::UsernameTaken)));
}

#[tokio::test]
async fn should_allow_keeping_own_username() {
    let alice = test_user("alice@example.com", Some("alice"));
    let repo = MockUserRepo::new(vec![alice.clone()]);
    let users = repo.users_handle();
    let usecase = UpdateProfileUseCase { users: repo };

    let patch = UserProfilePatch {
        username: Some("alice".into()),
        bio: Some("still me".into()),
        ..Default::default()
    };
    usecase.execute(alice.id, patch).await.unwrap();
    assert_eq!(users.lock().unwrap()[0].bio.as_deref(), Some("still me"));
}

#[tokio::test]
async fn should_apply_partial_profile_patch() {
    let alice = test_user("alice@example.com", Some("alice"));
    let repo = MockUserRepo::new(vec![alice.clone()]);
    let users = repo.users_handle();
    let usecase = UpdateProfileUseCase { users: repo };

    let patch = UserProfilePatch {
        name: Some("Alice Inkwright".into()),
        location: Some("Harbor City".into()),
        ..Default::default()
    };
    usecase.execute(alice.id, patch).await.unwrap();

    let stored = users.lock().unwrap();
    assert_eq!(stored[0].name.as_deref(), Some("Alice Inkwright"));
    assert_eq!(stored[0].location.as_deref(), Some("Harbor City"));
    // Untouched fields keep their values.
    assert_eq!(stored[0].username.as_deref(), Some("alice"));
}

// ── DeleteUserUseCase ────────────────────────────────────────────────────────

#[tokio::test]
async fn should_delete_user() {
    let user = test_user("alice@example.com", Some("alice"));
    let repo = MockUserRepo::new(vec![user.clone()]);
    let users = repo.users_handle();
    let usecase = DeleteUserUseCase { users: repo };

    usecase.execute(user.id).await.unwrap();
    assert!(users.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_report_deleting_unknown_user() {
    let usecase = DeleteUserUseCase {
        users: MockUserRepo::empty(),
    };
    let result = usecase.execute(Uuid::new_v4()).await;
    assert!(matches!(result, Err(ApiError::UserNotFound)));
}

// ── SuggestUsersUseCase ──────────────────────────────────────────────────────

#[tokio::test]
async fn should_exclude_self_and_already_followed_from_suggestions() {
    let alice = test_user("alice@example.com", Some("alice"));
    let bob = test_user("bob@example.com", Some("bob"));
    let carol = test_user("carol@example.com", Some("carol"));

    let mut repo = MockUserRepo::new(vec![alice.clone(), bob.clone(), carol.clone()]);
    repo.follows = vec![(alice.id, bob.id)];
    let usecase = SuggestUsersUseCase { users: repo };

    let suggestions = usecase.execute(alice.id, 10).await.unwrap();
    let ids: Vec<Uuid> = suggestions.iter().map(|u| u.id).collect();
    assert_eq!(ids, vec![carol.id]);
}
