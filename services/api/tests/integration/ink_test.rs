use chrono::{Duration, Utc};
use uuid::Uuid;

use inkwell_api::domain::repository::InkRepository;
use inkwell_api::domain::types::{Follow, InkPatch, InkSortBy};
use inkwell_api::error::ApiError;
use inkwell_api::usecase::ink::{
    ComposeInkInput, ComposeInkUseCase, DeleteInkUseCase, FeedUseCase, GetInkUseCase,
    ListAuthorInksUseCase, PinInkUseCase, RecordViewUseCase, UpdateInkUseCase,
};
use inkwell_domain::ink::Visibility;
use inkwell_domain::pagination::{CursorRequest, PageRequest};

use crate::helpers::{MockFollowRepo, MockInkRepo, MockUserRepo, test_ink, test_user};

fn compose_input(content: &str) -> ComposeInkInput {
    ComposeInkInput {
        content: content.to_owned(),
        kind: "story".to_owned(),
        theme: "plain".to_owned(),
        visibility: Visibility::Public,
    }
}

// ── ComposeInkUseCase ────────────────────────────────────────────────────────

#[tokio::test]
async fn should_compose_ink_with_computed_reading_time() {
    let repo = MockInkRepo::empty();
    let inks = repo.inks_handle();
    let usecase = ComposeInkUseCase { inks: repo };
    let author = Uuid::new_v4();

    let content = vec!["word"; 400].join(" ");
    let ink = usecase
        .execute(author, compose_input(&content))
        .await
        .unwrap();

    assert_eq!(ink.author_id, author);
    assert_eq!(ink.views, 0);
    assert!(!ink.is_pinned);
    // 400 words at 200 wpm.
    assert_eq!(ink.reading_time, 120);
    assert_eq!(inks.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_reject_blank_content() {
    let usecase = ComposeInkUseCase {
        inks: MockInkRepo::empty(),
    };
    let result = usecase.execute(Uuid::new_v4(), compose_input("   ")).await;
    assert!(matches!(result, Err(ApiError::MissingData)));
}

// ── GetInkUseCase (visibility) ───────────────────────────────────────────────

#[tokio::test]
async fn should_serve_public_ink_to_anonymous_viewer() {
    let author = test_user("a@example.com", Some("author"));
    let ink = test_ink(author.id, Visibility::Public);
    let usecase = GetInkUseCase {
        inks: MockInkRepo::new(vec![ink.clone()]),
        follows: MockFollowRepo::empty(),
    };
    let found = usecase.execute(ink.id, None).await.unwrap();
    assert_eq!(found.id, ink.id);
}

#[tokio::test]
async fn should_hide_private_ink_from_everyone_but_author() {
    let author = test_user("a@example.com", Some("author"));
    let stranger = test_user("s@example.com", Some("stranger"));
    let ink = test_ink(author.id, Visibility::Private);
    let usecase = GetInkUseCase {
        inks: MockInkRepo::new(vec![ink.clone()]),
        follows: MockFollowRepo::empty(),
    };

    assert!(matches!(
        usecase.execute(ink.id, None).await,
        Err(ApiError::Forbidden)
    ));
    assert!(matches!(
        usecase.execute(ink.id, Some(stranger.id)).await,
        Err(ApiError::Forbidden)
    ));
    assert!(usecase.execute(ink.id, Some(author.id)).await.is_ok());
}

#[tokio::test]
async fn should_serve_followers_only_ink_to_followers() {
    let author = test_user("a@example.com", Some("author"));
    let follower = test_user("f@example.com", Some("follower"));
    let stranger = test_user("s@example.com", Some("stranger"));
    let ink = test_ink(author.id, Visibility::Followers);
    let usecase = GetInkUseCase {
        inks: MockInkRepo::new(vec![ink.clone()]),
        follows: MockFollowRepo::new(vec![Follow {
            follower_id: follower.id,
            following_id: author.id,
            created_at: Utc::now(),
        }]),
    };

    assert!(usecase.execute(ink.id, Some(follower.id)).await.is_ok());
    assert!(usecase.execute(ink.id, Some(author.id)).await.is_ok());
    assert!(matches!(
        usecase.execute(ink.id, Some(stranger.id)).await,
        Err(ApiError::Forbidden)
    ));
    assert!(matches!(
        usecase.execute(ink.id, None).await,
        Err(ApiError::Forbidden)
    ));
}

#[tokio::test]
async fn should_report_unknown_ink() {
    let usecase = GetInkUseCase {
        inks: MockInkRepo::empty(),
        follows: MockFollowRepo::empty(),
    };
    let result = usecase.execute(Uuid::new_v4(), None).await;
    assert!(matches!(result, Err(ApiError::InkNotFound)));
}

// ── FeedUseCase (cursor pagination) ──────────────────────────────────────────

#[tokio::test]
async fn should_page_feed_with_cursor() {
    let author = Uuid::new_v4();
    let now = Utc::now();
    let mut inks = vec![];
    for i in 0..5 {
        let mut ink = test_ink(author, Visibility::Public);
        ink.created_at = now - Duration::minutes(i);
        inks.push(ink);
    }
    // One private ink never appears in the feed.
    inks.push(test_ink(author, Visibility::Private));

    let usecase = FeedUseCase {
        inks: MockInkRepo::new(inks),
    };

    let first = usecase
        .execute(CursorRequest {
            after: None,
            limit: 2,
        })
        .await
        .unwrap();
    assert_eq!(first.items.len(), 2);
    let next = first.next.expect("more windows expected");
    assert_eq!(next, first.items[1].id);

    let second = usecase
        .execute(CursorRequest {
            after: Some(next),
            limit: 2,
        })
        .await
        .unwrap();
    assert_eq!(second.items.len(), 2);
    // Strictly older than the first window.
    assert!(second.items[0].created_at < first.items[1].created_at);

    let third = usecase
        .execute(CursorRequest {
            after: second.next,
            limit: 2,
        })
        .await
        .unwrap();
    assert_eq!(third.items.len(), 1);
    assert!(third.next.is_none());
}

// ── ListAuthorInksUseCase ────────────────────────────────────────────────────

#[tokio::test]
async fn should_hide_non_public_inks_from_other_viewers() {
    let author = test_user("a@example.com", Some("author"));
    let inks = vec![
        test_ink(author.id, Visibility::Public),
        test_ink(author.id, Visibility::Private),
        test_ink(author.id, Visibility::Followers),
    ];
    let usecase = ListAuthorInksUseCase {
        users: MockUserRepo::new(vec![author.clone()]),
        inks: MockInkRepo::new(inks),
    };

    let as_stranger = usecase
        .execute(
            "author",
            Some(Uuid::new_v4()),
            InkSortBy::default(),
            PageRequest::default(),
        )
        .await
        .unwrap();
    assert_eq!(as_stranger.len(), 1);

    let as_author = usecase
        .execute(
            "author",
            Some(author.id),
            InkSortBy::default(),
            PageRequest::default(),
        )
        .await
        .unwrap();
    assert_eq!(as_author.len(), 3);
}

// ── UpdateInkUseCase ─────────────────────────────────────────────────────────

#[tokio::test]
async fn should_recompute_reading_time_when_content_changes() {
    let author = Uuid::new_v4();
    let ink = test_ink(author, Visibility::Public);
    let repo = MockInkRepo::new(vec![ink.clone()]);
    let inks = repo.inks_handle();
    let usecase = UpdateInkUseCase { inks: repo };

    let content = vec!["word"; 200].join(" ");
    usecase
        .execute(
            ink.id,
            author,
            InkPatch {
                content: Some(content),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(inks.lock().unwrap()[0].reading_time, 60);
}

#[tokio::test]
async fn should_forbid_updating_someone_elses_ink() {
    let ink = test_ink(Uuid::new_v4(), Visibility::Public);
    let usecase = UpdateInkUseCase {
        inks: MockInkRepo::new(vec![ink.clone()]),
    };
    let result = usecase
        .execute(
            ink.id,
            Uuid::new_v4(),
            InkPatch {
                theme: Some("noir".into()),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(result, Err(ApiError::Forbidden)));
}

#[tokio::test]
async fn should_reject_empty_ink_patch() {
    let author = Uuid::new_v4();
    let ink = test_ink(author, Visibility::Public);
    let usecase = UpdateInkUseCase {
        inks: MockInkRepo::new(vec![ink.clone()]),
    };
    let result = usecase.execute(ink.id, author, InkPatch::default()).await;
    assert!(matches!(result, Err(ApiError::MissingData)));
}

// ── DeleteInkUseCase ─────────────────────────────────────────────────────────

#[tokio::test]
async fn should_forbid_deleting_someone_elses_ink() {
    let ink = test_ink(Uuid::new_v4(), Visibility::Public);
    let usecase = DeleteInkUseCase {
        inks: MockInkRepo::new(vec![ink.clone()]),
    };
    let result = usecase.execute(ink.id, Uuid::new_v4()).await;
    assert!(matches!(result, Err(ApiError::Forbidden)));
}

#[tokio::test]
async fn should_delete_own_ink() {
    let author = Uuid::new_v4();
    let ink = test_ink(author, Visibility::Public);
    let repo = MockInkRepo::new(vec![ink.clone()]);
    let inks = repo.inks_handle();
    let usecase = DeleteInkUseCase { inks: repo };

    usecase.execute(ink.id, author).await.unwrap();
    assert!(inks.lock().unwrap().is_empty());
}

// ── PinInkUseCase ────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_keep_at_most_one_pinned_ink_per_author() {
    let author = Uuid::new_v4();
    let mut first = test_ink(author, Visibility::Public);
    first.is_pinned = true;
    let second = test_ink(author, Visibility::Public);

    let repo = MockInkRepo::new(vec![first.clone(), second.clone()]);
    let inks = repo.inks_handle();
    let usecase = PinInkUseCase { inks: repo };

    usecase.execute(second.id, author, true).await.unwrap();

    let stored = inks.lock().unwrap();
    let pinned: Vec<Uuid> = stored.iter().filter(|i| i.is_pinned).map(|i| i.id).collect();
    assert_eq!(pinned, vec![second.id]);
}

// ── RecordViewUseCase ────────────────────────────────────────────────────────

#[tokio::test]
async fn should_increment_views() {
    let ink = test_ink(Uuid::new_v4(), Visibility::Public);
    let repo = MockInkRepo::new(vec![ink.clone()]);
    let inks = repo.inks_handle();
    let usecase = RecordViewUseCase { inks: repo };

    usecase.execute(ink.id).await.unwrap();
    usecase.execute(ink.id).await.unwrap();
    assert_eq!(inks.lock().unwrap()[0].views, 2);
}

#[tokio::test]
async fn should_report_view_on_unknown_ink() {
    let usecase = RecordViewUseCase {
        inks: MockInkRepo::empty(),
    };
    let result = usecase.execute(Uuid::new_v4()).await;
    assert!(matches!(result, Err(ApiError::InkNotFound)));
}

// ── Round-trip property ──────────────────────────────────────────────────────

#[tokio::test]
async fn should_round_trip_created_ink_by_id() {
    let repo = MockInkRepo::empty();
    let author = Uuid::new_v4();
    let usecase = ComposeInkUseCase {
        inks: MockInkRepo {
            inks: repo.inks_handle(),
        },
    };

    let created = usecase
        .execute(author, compose_input("the same words come back"))
        .await
        .unwrap();
    let fetched = repo.find_by_id(created.id).await.unwrap().unwrap();

    assert_eq!(fetched.content, created.content);
    assert_eq!(fetched.kind, created.kind);
    assert_eq!(fetched.theme, created.theme);
    assert_eq!(fetched.visibility, created.visibility);
    assert_eq!(fetched.reading_time, created.reading_time);
}
