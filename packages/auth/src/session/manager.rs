// ABOUTME: Session manager owning the client's authentication state machine
// ABOUTME: Handles restore, login redirect, OAuth callback exchange, logout and auth headers

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};

use flowinsight_config::Config;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::Client;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::{
    error::{AuthError, AuthResult},
    session::{
        navigator::{Navigation, Navigator},
        storage::{SessionStore, SESSION_TOKEN_KEY, USER_DATA_KEY},
        types::{CallbackRequest, CallbackResponse, RestoreOutcome, Session, SessionStatus, User},
    },
};

const CALLBACK_PATH: &str = "/api/auth/callback";
const VALIDATE_PATH: &str = "/api/auth/validate";
const AUTH_ENTRY_PREFIX: &str = "/api/auth/";

/// Internal state. The `Authenticated` variant carries both credential and
/// user, so one can never be present without the other.
#[derive(Clone)]
enum SessionState {
    Unauthenticated,
    Validating,
    Authenticated { credential: String, user: User },
}

impl SessionState {
    fn status(&self) -> SessionStatus {
        match self {
            SessionState::Unauthenticated => SessionStatus::Unauthenticated,
            SessionState::Validating => SessionStatus::Validating,
            SessionState::Authenticated { .. } => SessionStatus::Authenticated,
        }
    }
}

/// Authoritative owner of "is this client authenticated, and as whom".
///
/// Shared via `Arc`; every method takes `&self`. The state lock is never
/// held across an `.await`.
pub struct SessionManager {
    api_base_url: String,
    oauth_provider: String,
    client: Client,
    store: Arc<dyn SessionStore>,
    navigator: Arc<dyn Navigator>,
    state: RwLock<SessionState>,
    status_tx: watch::Sender<SessionStatus>,
}

impl SessionManager {
    /// Create a session manager with a default HTTP client
    pub fn new(
        api_base_url: impl Into<String>,
        oauth_provider: impl Into<String>,
        store: Arc<dyn SessionStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self::with_client(
            Client::new(),
            api_base_url,
            oauth_provider,
            store,
            navigator,
        )
    }

    pub fn with_client(
        client: Client,
        api_base_url: impl Into<String>,
        oauth_provider: impl Into<String>,
        store: Arc<dyn SessionStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let (status_tx, _) = watch::channel(SessionStatus::Unauthenticated);
        Self {
            api_base_url: api_base_url.into().trim_end_matches('/').to_string(),
            oauth_provider: oauth_provider.into(),
            client,
            store,
            navigator,
            state: RwLock::new(SessionState::Unauthenticated),
            status_tx,
        }
    }

    /// Create a session manager using the URL, provider and timeouts from `config`
    pub fn from_config(
        config: &Config,
        store: Arc<dyn SessionStore>,
        navigator: Arc<dyn Navigator>,
    ) -> AuthResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| AuthError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self::with_client(
            client,
            config.api_base_url.clone(),
            config.oauth_provider.clone(),
            store,
            navigator,
        ))
    }

    /// Restore a persisted session on startup.
    ///
    /// Never fails: a missing credential yields `NoSession`, and a rejected
    /// one is logged and handled as a forced logout.
    pub async fn restore(&self) -> RestoreOutcome {
        let token = match self.store.get(SESSION_TOKEN_KEY).await {
            Ok(Some(token)) if !token.is_empty() => token,
            Ok(_) => {
                debug!("No persisted session found");
                return RestoreOutcome::NoSession;
            }
            Err(e) => {
                warn!("Could not read persisted session: {}", e);
                return RestoreOutcome::NoSession;
            }
        };

        self.transition(SessionState::Validating);
        debug!("Validating persisted session");

        match self.validate(&token).await {
            Ok(user) => {
                info!("✅ Restored session for {}", user.label());
                self.establish(token, user.clone()).await;
                RestoreOutcome::Restored(user)
            }
            Err(e) => {
                error!("Session validation failed: {}", e);
                self.logout().await;
                RestoreOutcome::Rejected
            }
        }
    }

    /// URL of the backend's OAuth entry point
    pub fn login_url(&self) -> String {
        format!(
            "{}{}{}",
            self.api_base_url, AUTH_ENTRY_PREFIX, self.oauth_provider
        )
    }

    /// Send the user to the backend's OAuth entry point
    pub fn begin_login(&self) {
        let url = self.login_url();
        info!("Starting login via {}", self.oauth_provider);
        self.navigator.navigate(Navigation::External(url));
    }

    /// Exchange an OAuth authorization code for a credential and user profile
    pub async fn complete_callback(&self, code: &str) -> AuthResult<User> {
        if code.trim().is_empty() {
            return Err(AuthError::AuthExchangeFailed(
                "Authorization code is empty".to_string(),
            ));
        }

        let url = format!("{}{}", self.api_base_url, CALLBACK_PATH);
        let response = self
            .client
            .post(&url)
            .json(&CallbackRequest { code })
            .send()
            .await
            .map_err(|e| {
                error!("OAuth callback request failed: {}", e);
                AuthError::AuthExchangeFailed(format!("Failed to reach backend: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            // Only the status is logged; the body may echo the code
            error!("OAuth callback failed with status {}", status);
            return Err(AuthError::AuthExchangeFailed(format!(
                "Callback exchange failed with status {}",
                status
            )));
        }

        let CallbackResponse { token, user } = response.json().await.map_err(|e| {
            AuthError::AuthExchangeFailed(format!("Failed to parse callback response: {}", e))
        })?;

        if bearer_value(&token).is_none() {
            error!("OAuth callback returned a credential that cannot be sent as a header");
            return Err(AuthError::AuthExchangeFailed(
                "Backend issued an unusable credential".to_string(),
            ));
        }

        self.establish(token, user.clone()).await;
        info!("✅ Signed in as {}", user.label());
        Ok(user)
    }

    /// Clear the session in memory and in storage, then go to the login
    /// surface. Safe to call in any state.
    pub async fn logout(&self) {
        self.transition(SessionState::Unauthenticated);

        for key in [SESSION_TOKEN_KEY, USER_DATA_KEY] {
            if let Err(e) = self.store.remove(key).await {
                warn!("Failed to clear persisted {}: {}", key, e);
            }
        }

        info!("Logged out");
        self.navigator.navigate(Navigation::LoginPage);
    }

    /// `Authorization: Bearer <credential>` when authenticated, otherwise empty
    pub fn auth_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();

        if let SessionState::Authenticated { credential, .. } = &*self.read_state() {
            match bearer_value(credential) {
                Some(value) => {
                    headers.insert(AUTHORIZATION, value);
                }
                None => warn!("Stored credential is not a valid header value; sending none"),
            }
        }

        headers
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(&*self.read_state(), SessionState::Authenticated { .. })
    }

    pub fn status(&self) -> SessionStatus {
        self.read_state().status()
    }

    pub fn user(&self) -> Option<User> {
        match &*self.read_state() {
            SessionState::Authenticated { user, .. } => Some(user.clone()),
            _ => None,
        }
    }

    pub fn credential(&self) -> Option<String> {
        match &*self.read_state() {
            SessionState::Authenticated { credential, .. } => Some(credential.clone()),
            _ => None,
        }
    }

    /// Snapshot of the current session
    pub fn session(&self) -> Session {
        match &*self.read_state() {
            SessionState::Authenticated { credential, user } => Session {
                credential: Some(credential.clone()),
                user: Some(user.clone()),
                authenticated: true,
            },
            _ => Session::empty(),
        }
    }

    /// Watch status changes. Dropping the receiver unsubscribes.
    pub fn subscribe(&self) -> watch::Receiver<SessionStatus> {
        self.status_tx.subscribe()
    }

    async fn validate(&self, token: &str) -> AuthResult<User> {
        if bearer_value(token).is_none() {
            return Err(AuthError::ValidationFailed(
                "Persisted credential is not a valid header value".to_string(),
            ));
        }

        let url = format!("{}{}", self.api_base_url, VALIDATE_PATH);
        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| AuthError::ValidationFailed(format!("Failed to reach backend: {}", e)))?;

        if !response.status().is_success() {
            return Err(AuthError::ValidationFailed(format!(
                "Backend rejected session with status {}",
                response.status()
            )));
        }

        response
            .json::<User>()
            .await
            .map_err(|e| AuthError::ValidationFailed(format!("Invalid user payload: {}", e)))
    }

    /// Enter `Authenticated` and persist. Storage failures are logged only:
    /// the in-memory session is authoritative.
    async fn establish(&self, credential: String, user: User) {
        self.transition(SessionState::Authenticated {
            credential: credential.clone(),
            user: user.clone(),
        });

        if let Err(e) = self.persist(&credential, &user).await {
            warn!("Failed to persist session: {}", e);
        }
    }

    async fn persist(&self, credential: &str, user: &User) -> AuthResult<()> {
        let user_json = serde_json::to_string(user)?;
        self.store.set(SESSION_TOKEN_KEY, credential).await?;
        self.store.set(USER_DATA_KEY, &user_json).await?;
        Ok(())
    }

    fn transition(&self, next: SessionState) {
        let status = next.status();
        {
            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            *state = next;
        }
        self.status_tx.send_replace(status);
    }

    fn read_state(&self) -> RwLockReadGuard<'_, SessionState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }
}

/// `Bearer <credential>` as a sensitive header value, or `None` when the
/// credential contains bytes a header cannot carry
fn bearer_value(credential: &str) -> Option<HeaderValue> {
    let mut value = HeaderValue::from_str(&format!("Bearer {}", credential)).ok()?;
    value.set_sensitive(true);
    Some(value)
}
