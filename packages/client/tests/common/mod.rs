//! Shared fixtures for client integration tests

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use flowinsight_auth::{MemorySessionStore, Navigation, Navigator, SessionManager};
use flowinsight_client::{RequestClient, RetryPolicy};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Navigator that remembers every navigation
#[derive(Default)]
pub struct RecordingNavigator {
    visits: Mutex<Vec<Navigation>>,
}

impl RecordingNavigator {
    pub fn visits(&self) -> Vec<Navigation> {
        self.visits.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, target: Navigation) {
        self.visits.lock().unwrap().push(target);
    }
}

pub struct Harness {
    pub server: MockServer,
    pub session: Arc<SessionManager>,
    pub navigator: Arc<RecordingNavigator>,
    pub store: Arc<MemorySessionStore>,
    pub client: RequestClient,
}

impl Harness {
    /// Unauthenticated harness with a fast retry policy
    pub async fn start(max_attempts: u32) -> Self {
        Self::start_with_policy(RetryPolicy::new(max_attempts, Duration::from_millis(10))).await
    }

    pub async fn start_with_policy(policy: RetryPolicy) -> Self {
        let server = MockServer::start().await;
        let navigator = Arc::new(RecordingNavigator::default());
        let store = Arc::new(MemorySessionStore::new());
        let session = Arc::new(SessionManager::new(
            server.uri(),
            "replit",
            store.clone(),
            navigator.clone(),
        ));
        let client = RequestClient::new(server.uri(), session.clone()).with_retry_policy(policy);

        Self {
            server,
            session,
            navigator,
            store,
            client,
        }
    }

    /// Sign in through the callback endpoint with the given credential
    pub async fn sign_in(&self, token: &str) {
        Mock::given(method("POST"))
            .and(path("/api/auth/callback"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "token": token,
                "user": { "id": "u-1", "displayName": "Ada", "email": "ada@example.com" }
            })))
            .mount(&self.server)
            .await;

        self.session.complete_callback("code-1").await.unwrap();
        assert!(self.session.is_authenticated());
    }

    /// Requests the backend received for `request_path`
    pub async fn hits(&self, request_path: &str) -> usize {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|r| r.url.path() == request_path)
            .count()
    }
}
