//! End-to-end flows over the in-memory backend.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use chrono::Utc;
use huddle_backend::{
    AnnouncementStore, AuthGateway, AuthUser, MemoryBackend, NewAnnouncement, Sender, UserStore,
};
use huddle_core::{
    AccountService, ChatService, FeedService, OptimisticLikes, Route, SessionService, SignUpInput,
};

const AUTO_REPLY: &str = "Hi! This is an automated admin reply.";
const MIN_PASSWORD_LENGTH: usize = 6;

struct App {
    backend: Arc<MemoryBackend>,
    accounts: AccountService,
    session: SessionService,
    feed: FeedService,
    chat: ChatService,
}

fn init_tracing() {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

fn app() -> App {
    init_tracing();
    let backend = Arc::new(MemoryBackend::new());
    App {
        accounts: AccountService::new(
            Arc::clone(&backend) as Arc<dyn AuthGateway>,
            Arc::clone(&backend) as Arc<dyn UserStore>,
            MIN_PASSWORD_LENGTH,
        ),
        session: SessionService::new(Arc::clone(&backend) as Arc<dyn AuthGateway>),
        feed: FeedService::new(Arc::clone(&backend) as Arc<dyn AnnouncementStore>),
        chat: ChatService::new(Arc::clone(&backend) as Arc<dyn UserStore>, AUTO_REPLY),
        backend,
    }
}

fn sign_up_input(email: &str) -> SignUpInput {
    SignUpInput {
        fullname: "Test User".to_string(),
        email: email.to_string(),
        birthdate: Utc::now(),
        contact_number: "09170000000".to_string(),
        occupation: "Engineer".to_string(),
        password: "secret1".to_string(),
        confirm_password: "secret1".to_string(),
    }
}

async fn sign_up(app: &App, email: &str) -> AuthUser {
    app.accounts.sign_up(sign_up_input(email)).await.unwrap()
}

#[tokio::test]
async fn test_startup_without_session_routes_to_sign_in() {
    let app = app();

    assert_eq!(app.session.current_route(), Route::SignIn);

    // The first routing decision arrives without any auth change.
    let mut routes = app.session.subscribe_route();
    assert_eq!(routes.next().await, Some(Route::SignIn));
}

#[tokio::test]
async fn test_sign_up_routes_to_main_and_creates_pending_record() {
    let app = app();
    let mut routes = app.session.subscribe_route();
    assert_eq!(routes.next().await, Some(Route::SignIn));

    let user = sign_up(&app, "a@b.com").await;
    assert_eq!(routes.next().await, Some(Route::Main));

    let record = app.backend.find_user(&user.uid).await.unwrap().unwrap();
    assert!(record.messages.is_empty());
    assert_eq!(record.document_url, None);
}

#[tokio::test]
async fn test_short_password_never_reaches_the_backend() {
    let app = app();

    let mut input = sign_up_input("a@b.com");
    input.password = "abc".to_string();
    input.confirm_password = "abc".to_string();

    let err = app.accounts.sign_up(input).await.unwrap_err();
    assert_eq!(err.error_code(), "VALIDATION_ERROR");
    assert_eq!(app.session.current_route(), Route::SignIn);
}

#[tokio::test]
async fn test_sign_out_routes_back_to_sign_in() {
    let app = app();
    sign_up(&app, "a@b.com").await;
    let mut routes = app.session.subscribe_route();
    assert_eq!(routes.next().await, Some(Route::Main));

    app.accounts.sign_out().await.unwrap();
    assert_eq!(routes.next().await, Some(Route::SignIn));
}

#[tokio::test]
async fn test_first_message_yields_exactly_two_messages_dated_today() {
    let app = app();
    let user = sign_up(&app, "a@b.com").await;

    app.chat.send_message(&user.uid, "Hello").await.unwrap();

    let record = app.backend.find_user(&user.uid).await.unwrap().unwrap();
    assert_eq!(record.messages.len(), 2);
    let today = Utc::now().date_naive();
    assert!(record.messages.iter().all(|m| m.date == today));
    assert_eq!(record.messages[0].sender, Sender::User);
    assert_eq!(record.messages[1].sender, Sender::Admin);
    assert_eq!(record.messages[1].text, AUTO_REPLY);
}

#[tokio::test]
async fn test_many_same_day_messages_get_one_reply() {
    let app = app();
    let user = sign_up(&app, "a@b.com").await;

    for i in 0..5 {
        app.chat
            .send_message(&user.uid, &format!("message {i}"))
            .await
            .unwrap();
    }

    let record = app.backend.find_user(&user.uid).await.unwrap().unwrap();
    let admin_count = record
        .messages
        .iter()
        .filter(|m| m.sender == Sender::Admin)
        .count();
    assert_eq!(admin_count, 1);
    assert_eq!(record.messages.len(), 6);
}

#[tokio::test]
async fn test_chat_subscription_sees_both_messages() {
    let app = app();
    let user = sign_up(&app, "a@b.com").await;
    let mut sub = app.chat.subscribe(&user.uid);

    app.chat.send_message(&user.uid, "Hello").await.unwrap();

    // Initial snapshot, then one per append.
    let initial = sub.recv().await.unwrap().unwrap();
    assert!(initial.messages.is_empty());
    let after_user = sub.recv().await.unwrap().unwrap();
    assert_eq!(after_user.messages.len(), 1);
    let after_reply = sub.recv().await.unwrap().unwrap();
    assert_eq!(after_reply.messages.len(), 2);
}

#[tokio::test]
async fn test_announcement_with_no_likes_reports_an_empty_list() {
    let app = app();
    let announcement = app
        .backend
        .create_announcement(NewAnnouncement {
            title: "Welcome".to_string(),
            content: "First post".to_string(),
            thumb: None,
            image: None,
            author: "Admin".to_string(),
        })
        .await
        .unwrap();

    let mut likes = app.feed.subscribe_likes(&announcement.id);
    assert_eq!(likes.recv().await, Some(Vec::new()));
}

#[tokio::test]
async fn test_two_users_liking_yields_two_entries() {
    let app = app();
    let alice = sign_up(&app, "alice@example.com").await;
    let bob = sign_up(&app, "bob@example.com").await;

    let mut alice_likes = OptimisticLikes::new();
    let mut bob_likes = OptimisticLikes::new();
    app.feed
        .toggle_like("ann1", &mut alice_likes, &alice)
        .await
        .unwrap();
    app.feed
        .toggle_like("ann1", &mut bob_likes, &bob)
        .await
        .unwrap();

    let mut sub = app.feed.subscribe_likes("ann1");
    let snapshot = sub.recv().await.unwrap();
    assert_eq!(snapshot.len(), 2);
}

#[tokio::test]
async fn test_double_toggle_round_trips_through_the_backend() {
    let app = app();
    let user = sign_up(&app, "a@b.com").await;
    let mut likes = OptimisticLikes::new();

    assert!(app.feed.toggle_like("ann1", &mut likes, &user).await.unwrap());
    assert!(!app.feed.toggle_like("ann1", &mut likes, &user).await.unwrap());

    let mut sub = app.feed.subscribe_likes("ann1");
    assert_eq!(sub.recv().await, Some(Vec::new()));
    assert!(!likes.is_liked_by(&user.uid));
}

#[tokio::test]
async fn test_comments_flow_oldest_first_across_users() {
    let app = app();
    let alice = sign_up(&app, "alice@example.com").await;
    let bob = sign_up(&app, "bob@example.com").await;

    let mut sub = app.feed.subscribe_comments("ann1");
    assert_eq!(sub.recv().await, Some(Vec::new()));

    app.feed.add_comment("ann1", &alice, "first").await.unwrap();
    app.feed.add_comment("ann1", &bob, "second").await.unwrap();

    let after_first = sub.recv().await.unwrap();
    assert_eq!(after_first.len(), 1);
    let after_second = sub.recv().await.unwrap();
    let texts: Vec<&str> = after_second.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, ["first", "second"]);
    assert_eq!(after_second[0].author, "alice@example.com");
}
