// ABOUTME: Navigation hook invoked on login redirects and forced logouts
// ABOUTME: BrowserNavigator opens the system browser for external URLs

use tracing::{info, warn};

/// Where the session manager wants the user to go next
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// The application's login surface
    LoginPage,
    /// An absolute URL, e.g. the OAuth entry point
    External(String),
}

/// Performs navigation on behalf of the session manager. Navigation is
/// fire-and-forget: implementations report failures themselves.
#[cfg_attr(test, mockall::automock)]
pub trait Navigator: Send + Sync {
    fn navigate(&self, target: Navigation);
}

/// Navigator for terminal use
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserNavigator;

impl Navigator for BrowserNavigator {
    fn navigate(&self, target: Navigation) {
        match target {
            Navigation::External(url) => {
                info!("Opening browser: {}", url);
                println!("🔐 Opening browser for authentication...");
                if let Err(e) = open::that(&url) {
                    warn!("Could not open browser automatically: {}", e);
                    println!("If the browser doesn't open automatically, visit:");
                    println!("  {}", url);
                }
            }
            Navigation::LoginPage => {
                info!("Session ended, redirecting to login");
                println!("🔒 You are signed out. Run `flowinsight login` to sign in again.");
            }
        }
    }
}
