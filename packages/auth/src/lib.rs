// ABOUTME: FlowInsight authentication library owning the client-side session
// ABOUTME: Restores persisted sessions, exchanges OAuth callback codes and performs logout

pub mod error;
pub mod session;

// Re-export main types
pub use error::{AuthError, AuthResult};
pub use session::{
    BrowserNavigator, FileSessionStore, MemorySessionStore, Navigation, Navigator,
    RestoreOutcome, Session, SessionManager, SessionStatus, SessionStore, User,
    SESSION_TOKEN_KEY, USER_DATA_KEY,
};
