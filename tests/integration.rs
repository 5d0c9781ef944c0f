//! Integration tests for mutations bridged to live subscriptions.

use postwire::{
    BusEvent, Comment, CreateCommentInput, CreatePostInput, CreateUserInput, MutationEvent,
    MutationKind, Payload, Post, RecordStore, Server, ServerConfig, Subscription,
    UpdateCommentInput, UpdatePostInput, User,
};
use serde_json::json;
use std::time::Duration;

const TIMEOUT: Duration = Duration::from_millis(200);
const QUIET: Duration = Duration::from_millis(30);

fn user(id: &str, email: &str) -> User {
    User {
        id: id.to_string(),
        name: format!("User {}", id),
        email: email.to_string(),
        age: None,
    }
}

fn post(id: &str, author: &str, published: bool) -> Post {
    Post {
        id: id.to_string(),
        title: format!("Post {}", id),
        body: "Body".to_string(),
        published,
        author: author.to_string(),
    }
}

fn comment(id: &str, author: &str, post: &str) -> Comment {
    Comment {
        id: id.to_string(),
        text: format!("Comment {}", id),
        author: author.to_string(),
        post: post.to_string(),
    }
}

/// Users 1 and 2; post 10 (published, by 1), post 11 (draft, by 1),
/// post 12 (published, by 2); comments on 10 and 12.
fn test_server() -> Server {
    let store = RecordStore::with_records(
        vec![user("1", "one@example.com"), user("2", "two@example.com")],
        vec![post("10", "1", true), post("11", "1", false), post("12", "2", true)],
        vec![
            comment("100", "1", "10"),
            comment("101", "2", "10"),
            comment("102", "1", "12"),
            comment("103", "2", "12"),
        ],
    );
    Server::with_store(
        ServerConfig {
            count_enabled: false,
            ..Default::default()
        },
        store,
    )
}

fn next_post_event(sub: &Subscription) -> MutationEvent<Post> {
    match sub.recv_timeout(TIMEOUT).unwrap().into_payload() {
        Some(Payload::Post(event)) => event,
        other => panic!("Expected post event, got {:?}", other),
    }
}

fn next_comment_event(sub: &Subscription) -> MutationEvent<Comment> {
    match sub.recv_timeout(TIMEOUT).unwrap().into_payload() {
        Some(Payload::Comment(event)) => event,
        other => panic!("Expected comment event, got {:?}", other),
    }
}

fn assert_quiet(sub: &Subscription) {
    let result = sub.recv_timeout(QUIET);
    assert!(result.is_err(), "Expected no event, got {:?}", result);
}

// --- Comment subscriptions ---

#[test]
fn test_comment_created_reaches_post_subscriber() {
    let server = test_server();
    let sub = server.subscribe_to_comments("10").unwrap();

    let created = server
        .create_comment(CreateCommentInput {
            text: "hi".into(),
            author: "1".into(),
            post: "10".into(),
        })
        .unwrap();

    let event = sub.recv_timeout(TIMEOUT).unwrap();
    let payload = serde_json::to_value(event.payload().unwrap()).unwrap();
    assert_eq!(
        payload,
        json!({
            "comment": {
                "mutation": "CREATED",
                "data": {"id": created.id, "text": "hi", "author": "1", "post": "10"}
            }
        })
    );
    assert_quiet(&sub);
}

#[test]
fn test_comment_update_and_delete_events() {
    let server = test_server();
    let sub = server.subscribe_to_comments("10").unwrap();

    server
        .update_comment(
            "100",
            UpdateCommentInput {
                text: Some("edited".into()),
            },
        )
        .unwrap();
    server.delete_comment("101").unwrap();

    let updated = next_comment_event(&sub);
    assert_eq!(updated.mutation, MutationKind::Updated);
    assert_eq!(updated.data.text, "edited");

    let deleted = next_comment_event(&sub);
    assert_eq!(deleted.mutation, MutationKind::Deleted);
    assert_eq!(deleted.data.id, "101");
}

#[test]
fn test_comment_events_stay_on_their_post_channel() {
    let server = test_server();
    let on_10 = server.subscribe_to_comments("10").unwrap();
    let on_12 = server.subscribe_to_comments("12").unwrap();
    let posts = server.subscribe_to_posts();

    server.delete_comment("102").unwrap();

    assert_eq!(next_comment_event(&on_12).data.id, "102");
    assert_quiet(&on_10);
    assert_quiet(&posts);
}

#[test]
fn test_post_id_named_like_global_channel_stays_isolated() {
    let store = RecordStore::with_records(
        vec![user("1", "one@example.com")],
        vec![post("posts", "1", true), post("count", "1", true)],
        vec![comment("c", "1", "posts"), comment("d", "1", "count")],
    );
    let server = Server::with_store(
        ServerConfig {
            count_enabled: false,
            ..Default::default()
        },
        store,
    );
    let feed = server.subscribe_to_posts();
    let counter = server.subscribe_to_count();
    let on_post = server.subscribe_to_comments("posts").unwrap();

    server
        .update_comment(
            "c",
            UpdateCommentInput {
                text: Some("edited".into()),
            },
        )
        .unwrap();
    server.delete_comment("d").unwrap();

    assert_eq!(next_comment_event(&on_post).data.id, "c");
    assert_quiet(&feed);
    assert_quiet(&counter);
}

#[test]
fn test_comment_update_after_unpublish_still_publishes() {
    let server = test_server();
    let sub = server.subscribe_to_comments("10").unwrap();

    server
        .update_post(
            "10",
            UpdatePostInput {
                published: Some(false),
                ..Default::default()
            },
        )
        .unwrap();
    server
        .update_comment(
            "100",
            UpdateCommentInput {
                text: Some("still here".into()),
            },
        )
        .unwrap();

    assert_eq!(next_comment_event(&sub).mutation, MutationKind::Updated);
}

#[test]
fn test_subscribe_after_create_depends_on_published() {
    let server = test_server();

    let draft = server
        .create_post(CreatePostInput {
            title: "Draft".into(),
            body: "".into(),
            published: false,
            author: "1".into(),
        })
        .unwrap();
    assert!(server.subscribe_to_comments(&draft.id).is_err());

    let live = server
        .create_post(CreatePostInput {
            title: "Live".into(),
            body: "".into(),
            published: true,
            author: "1".into(),
        })
        .unwrap();
    let sub = server.subscribe_to_comments(&live.id).unwrap();
    assert_eq!(server.bus().listener_count(sub.channel()), 1);
}

// --- Post subscriptions ---

#[test]
fn test_post_create_events() {
    let server = test_server();
    let sub = server.subscribe_to_posts();

    server
        .create_post(CreatePostInput {
            title: "Hidden".into(),
            body: "".into(),
            published: false,
            author: "1".into(),
        })
        .unwrap();
    let visible = server
        .create_post(CreatePostInput {
            title: "Visible".into(),
            body: "".into(),
            published: true,
            author: "2".into(),
        })
        .unwrap();

    let event = next_post_event(&sub);
    assert_eq!(event.mutation, MutationKind::Created);
    assert_eq!(event.data, visible);
    assert_quiet(&sub);
}

#[test]
fn test_post_publish_transitions() {
    let server = test_server();
    let sub = server.subscribe_to_posts();

    // Draft edit: silent
    server
        .update_post(
            "11",
            UpdatePostInput {
                title: Some("Still a draft".into()),
                ..Default::default()
            },
        )
        .unwrap();
    assert_quiet(&sub);

    // First publish: CREATED
    server
        .update_post(
            "11",
            UpdatePostInput {
                published: Some(true),
                ..Default::default()
            },
        )
        .unwrap();
    let event = next_post_event(&sub);
    assert_eq!(event.mutation, MutationKind::Created);
    assert!(event.data.published);
    assert_quiet(&sub);

    // Edit while published: UPDATED
    server
        .update_post(
            "11",
            UpdatePostInput {
                body: Some("New body".into()),
                ..Default::default()
            },
        )
        .unwrap();
    let event = next_post_event(&sub);
    assert_eq!(event.mutation, MutationKind::Updated);
    assert_eq!(event.data.body, "New body");
    assert_quiet(&sub);

    // Unpublish: DELETED with the pre-update snapshot
    server
        .update_post(
            "11",
            UpdatePostInput {
                title: Some("Retracted".into()),
                published: Some(false),
                ..Default::default()
            },
        )
        .unwrap();
    let event = next_post_event(&sub);
    assert_eq!(event.mutation, MutationKind::Deleted);
    assert!(event.data.published);
    assert_eq!(event.data.title, "Still a draft");
    assert_quiet(&sub);
}

#[test]
fn test_post_delete_events() {
    let server = test_server();
    let sub = server.subscribe_to_posts();

    server.delete_post("11").unwrap();
    assert_quiet(&sub);

    server.delete_post("10").unwrap();
    let event = next_post_event(&sub);
    assert_eq!(event.mutation, MutationKind::Deleted);
    assert_eq!(event.data.id, "10");

    // Cascaded comment removals are silent
    assert!(server.post_comments(&event.data).is_empty());
    assert_quiet(&sub);
}

#[test]
fn test_events_delivered_in_publish_order() {
    let server = test_server();
    let sub = server.subscribe_to_posts();

    for i in 0..20 {
        server
            .update_post(
                "10",
                UpdatePostInput {
                    title: Some(format!("rev {}", i)),
                    ..Default::default()
                },
            )
            .unwrap();
    }

    for i in 0..20 {
        assert_eq!(next_post_event(&sub).data.title, format!("rev {}", i));
    }
}

#[test]
fn test_cancelled_subscriber_sees_nothing() {
    let server = test_server();
    let sub = server.subscribe_to_posts();
    let other = server.subscribe_to_posts();

    sub.cancel();
    server.delete_post("10").unwrap();

    assert!(sub.recv_timeout(QUIET).is_err());
    assert_eq!(next_post_event(&other).mutation, MutationKind::Deleted);
    assert_eq!(server.bus().listener_count(postwire::POSTS_CHANNEL), 1);
}

// --- Users ---

#[test]
fn test_delete_user_cascades() {
    let server = test_server();
    let posts = server.subscribe_to_posts();
    let comments_on_12 = server.subscribe_to_comments("12").unwrap();

    let deleted = server.delete_user("2").unwrap();
    assert_eq!(deleted.id, "2");

    assert!(server.user("2").is_none());
    assert!(server.post("12").is_none());

    let remaining: Vec<String> = server.comments(None).into_iter().map(|c| c.id).collect();
    // 101 was by user 2, 102 and 103 were on post 12
    assert_eq!(remaining, vec!["100".to_string()]);

    // Untouched records
    assert!(server.user("1").is_some());
    assert_eq!(server.posts(None).len(), 2);

    // Cascades publish nothing
    assert_quiet(&posts);
    assert_quiet(&comments_on_12);
}

#[test]
fn test_users_never_publish() {
    let server = test_server();
    let posts = server.subscribe_to_posts();

    let user = server
        .create_user(CreateUserInput {
            name: "Three".into(),
            email: "three@example.com".into(),
            age: Some(30),
        })
        .unwrap();
    assert_eq!(server.users(Some("three")), vec![user]);

    assert_quiet(&posts);
    assert_eq!(server.bus().channel_count(), 1);
}

#[test]
fn test_shutdown_ends_live_sequences() {
    let server = test_server();
    let sub = server.subscribe_to_posts();

    server.shutdown();

    assert!(matches!(
        sub.recv_timeout(TIMEOUT).unwrap(),
        BusEvent::Dropped { .. }
    ));
    assert!(sub.recv_timeout(QUIET).is_err());
}
