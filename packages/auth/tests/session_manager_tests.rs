// ABOUTME: Integration tests for the session manager with file-backed storage
// ABOUTME: Covers persistence across restarts, forced logout and status subscriptions

use std::sync::{Arc, Mutex};

use flowinsight_auth::{
    FileSessionStore, Navigation, Navigator, RestoreOutcome, SessionManager, SessionStatus,
    SessionStore, User, SESSION_TOKEN_KEY, USER_DATA_KEY,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Default)]
struct RecordingNavigator {
    visits: Mutex<Vec<Navigation>>,
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, target: Navigation) {
        self.visits.lock().unwrap().push(target);
    }
}

fn user_json() -> serde_json::Value {
    json!({ "id": "u-42", "displayName": "Grace", "email": "grace@example.com" })
}

fn manager(
    server: &MockServer,
    store: Arc<FileSessionStore>,
    navigator: Arc<RecordingNavigator>,
) -> SessionManager {
    SessionManager::new(server.uri(), "replit", store, navigator)
}

#[tokio::test]
async fn test_session_survives_restart() {
    let dir = TempDir::new().unwrap();
    let session_file = dir.path().join(".flowinsight").join("session.json");
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/callback"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "token": "tok-9", "user": user_json() })),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/auth/validate"))
        .and(header("authorization", "Bearer tok-9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json()))
        .expect(1)
        .mount(&server)
        .await;

    // First run: sign in
    {
        let store = Arc::new(FileSessionStore::new(&session_file));
        let first = manager(&server, store, Arc::default());
        first.complete_callback("abc123").await.unwrap();
        assert!(first.is_authenticated());
    }
    assert!(session_file.exists());

    // Second run: restore from disk
    let store = Arc::new(FileSessionStore::new(&session_file));
    let second = manager(&server, store.clone(), Arc::default());
    let outcome = second.restore().await;

    let user: User = serde_json::from_value(user_json()).unwrap();
    assert_eq!(outcome, RestoreOutcome::Restored(user.clone()));
    assert_eq!(second.user(), Some(user));
    assert_eq!(second.credential().as_deref(), Some("tok-9"));
    assert_eq!(
        store.get(SESSION_TOKEN_KEY).await.unwrap().as_deref(),
        Some("tok-9")
    );
}

#[tokio::test]
async fn test_rejected_credential_clears_file_and_redirects() {
    let dir = TempDir::new().unwrap();
    let session_file = dir.path().join("session.json");
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/auth/validate"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let store = Arc::new(FileSessionStore::new(&session_file));
    store.set(SESSION_TOKEN_KEY, "expired").await.unwrap();
    store
        .set(USER_DATA_KEY, &user_json().to_string())
        .await
        .unwrap();

    let navigator = Arc::new(RecordingNavigator::default());
    let manager = manager(&server, store.clone(), navigator.clone());

    assert_eq!(manager.restore().await, RestoreOutcome::Rejected);
    assert_eq!(manager.status(), SessionStatus::Unauthenticated);
    assert!(store.get(SESSION_TOKEN_KEY).await.unwrap().is_none());
    assert!(store.get(USER_DATA_KEY).await.unwrap().is_none());
    assert_eq!(
        navigator.visits.lock().unwrap().clone(),
        vec![Navigation::LoginPage]
    );
}

#[tokio::test]
async fn test_unreachable_backend_rejects_restore() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(FileSessionStore::new(dir.path().join("session.json")));
    store.set(SESSION_TOKEN_KEY, "tok").await.unwrap();

    let navigator = Arc::new(RecordingNavigator::default());
    let manager = SessionManager::new("http://127.0.0.1:1", "replit", store.clone(), navigator);

    assert_eq!(manager.restore().await, RestoreOutcome::Rejected);
    assert!(!manager.is_authenticated());
    assert!(store.get(SESSION_TOKEN_KEY).await.unwrap().is_none());
}

#[tokio::test]
async fn test_status_subscription_tracks_transitions() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/callback"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "token": "t", "user": user_json() })),
        )
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let store = Arc::new(FileSessionStore::new(dir.path().join("session.json")));
    let manager = manager(&server, store, Arc::default());
    let mut status = manager.subscribe();
    assert_eq!(*status.borrow(), SessionStatus::Unauthenticated);

    manager.complete_callback("code").await.unwrap();
    assert_eq!(*status.borrow_and_update(), SessionStatus::Authenticated);

    manager.logout().await;
    assert_eq!(*status.borrow_and_update(), SessionStatus::Unauthenticated);
    assert!(!manager.session().authenticated);
}

#[tokio::test]
async fn test_failed_callback_keeps_client_signed_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/callback"))
        .respond_with(ResponseTemplate::new(400))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let session_file = dir.path().join("session.json");
    let store = Arc::new(FileSessionStore::new(&session_file));
    let manager = manager(&server, store, Arc::default());

    let error = manager.complete_callback("abc123").await.unwrap_err();

    assert!(error.to_string().contains("400"));
    assert!(!manager.is_authenticated());
    assert!(!session_file.exists());
}

#[tokio::test]
async fn test_callback_accepts_profile_without_id() {
    let server = MockServer::start().await;
    let profile = json!({
        "firstName": "User",
        "email": "user@example.com",
        "profileImageUrl": "https://img.example.com/user.png"
    });
    Mock::given(method("POST"))
        .and(path("/api/auth/callback"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "token": "tok", "user": profile })),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/auth/validate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile.clone()))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let session_file = dir.path().join("session.json");
    let first = manager(
        &server,
        Arc::new(FileSessionStore::new(&session_file)),
        Arc::default(),
    );

    let user = first.complete_callback("abc123").await.unwrap();
    assert_eq!(user.label(), "User");
    assert_eq!(user.id, "");
    assert!(first.is_authenticated());

    let second = manager(
        &server,
        Arc::new(FileSessionStore::new(&session_file)),
        Arc::default(),
    );
    assert_eq!(second.restore().await, RestoreOutcome::Restored(user));
}

#[tokio::test]
async fn test_callback_accepts_numeric_user_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/callback"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "tok",
            "user": { "id": 42, "firstName": "User", "email": "user@example.com" }
        })))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let manager = manager(
        &server,
        Arc::new(FileSessionStore::new(dir.path().join("session.json"))),
        Arc::default(),
    );

    let user = manager.complete_callback("abc123").await.unwrap();

    assert_eq!(user.id, "42");
    assert!(manager.is_authenticated());
}
