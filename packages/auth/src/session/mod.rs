// ABOUTME: Session module: state machine, durable storage and navigation hooks
// ABOUTME: SessionManager is the single owner of the authenticated identity

pub mod manager;
pub mod navigator;
pub mod storage;
pub mod types;

pub use manager::SessionManager;
pub use navigator::{BrowserNavigator, Navigation, Navigator};
pub use storage::{
    FileSessionStore, MemorySessionStore, SessionStore, SESSION_TOKEN_KEY, USER_DATA_KEY,
};
pub use types::{RestoreOutcome, Session, SessionStatus, User};
