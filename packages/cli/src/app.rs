// ABOUTME: Explicit construction and teardown of the session manager and API client
// ABOUTME: Replaces process-wide singletons with one owned App per invocation

use std::sync::Arc;

use anyhow::{Context, Result};
use flowinsight_auth::{
    BrowserNavigator, FileSessionStore, Navigator, RestoreOutcome, SessionManager, SessionStore,
};
use flowinsight_client::RequestClient;
use flowinsight_config::Config;
use tracing::{debug, info};

/// Everything a command needs: config, the shared session and the client
/// bound to it.
pub struct App {
    config: Config,
    session: Arc<SessionManager>,
    client: RequestClient,
    restored: RestoreOutcome,
}

impl App {
    /// Build the app against the on-disk session file and the system browser,
    /// then restore any persisted session.
    pub async fn init(config: Config) -> Result<Self> {
        let store: Arc<dyn SessionStore> = Arc::new(FileSessionStore::new(&config.session_file));
        Self::with_parts(config, store, Arc::new(BrowserNavigator)).await
    }

    /// Like [`App::init`] with caller-supplied storage and navigation
    pub async fn with_parts(
        config: Config,
        store: Arc<dyn SessionStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self> {
        let session = Arc::new(
            SessionManager::from_config(&config, store, navigator)
                .context("Failed to create session manager")?,
        );
        let client = RequestClient::from_config(&config, session.clone())
            .context("Failed to create API client")?;

        let restored = session.restore().await;
        debug!("Session restore finished: {:?}", restored);

        Ok(Self {
            config,
            session,
            client,
            restored,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    pub fn client(&self) -> &RequestClient {
        &self.client
    }

    /// What happened to the persisted session during startup
    pub fn restore_outcome(&self) -> &RestoreOutcome {
        &self.restored
    }

    /// Release the client and session. Persisted state stays on disk.
    pub fn shutdown(self) {
        info!(
            "Shutting down (session {})",
            self.session.status()
        );
    }
}
