// ABOUTME: Core type definitions for the client session
// ABOUTME: User profile, session snapshot, observable status and backend auth payloads

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Authenticated user profile as returned by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Empty when the backend omits it; numeric ids are kept as their decimal text
    #[serde(
        default,
        deserialize_with = "deserialize_user_id",
        skip_serializing_if = "String::is_empty"
    )]
    pub id: String,
    #[serde(default, alias = "firstName", skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email: String,
    #[serde(default, alias = "profileImageUrl", skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

fn deserialize_user_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Option::<RawId>::deserialize(deserializer)? {
        Some(RawId::Text(id)) => id,
        Some(RawId::Number(id)) => id.to_string(),
        None => String::new(),
    })
}

impl User {
    /// Display name, falling back to the email address
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.email)
    }
}

/// Point-in-time view of the session.
///
/// `authenticated` is true iff both `credential` and `user` are present.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    pub credential: Option<String>,
    pub user: Option<User>,
    pub authenticated: bool,
}

impl Session {
    pub fn empty() -> Self {
        Self {
            credential: None,
            user: None,
            authenticated: false,
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("credential", &self.credential.as_ref().map(|_| "<redacted>"))
            .field("user", &self.user)
            .field("authenticated", &self.authenticated)
            .finish()
    }
}

/// Observable state of the session manager
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Unauthenticated,
    Validating,
    Authenticated,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionStatus::Unauthenticated => write!(f, "unauthenticated"),
            SessionStatus::Validating => write!(f, "validating"),
            SessionStatus::Authenticated => write!(f, "authenticated"),
        }
    }
}

/// Result of restoring a persisted session at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// Nothing was persisted
    NoSession,
    /// The persisted credential was accepted by the backend
    Restored(User),
    /// The persisted credential was rejected and the session was torn down
    Rejected,
}

/// Body of `POST /api/auth/callback`
#[derive(Debug, Serialize)]
pub(crate) struct CallbackRequest<'a> {
    pub code: &'a str,
}

/// Response of `POST /api/auth/callback`
#[derive(Debug, Deserialize)]
pub(crate) struct CallbackResponse {
    pub token: String,
    pub user: User,
}
