//! FlowInsight API client
//!
//! Authenticated JSON calls against the FlowInsight backend with bounded
//! linear-backoff retry. Credentials come from a shared
//! [`flowinsight_auth::SessionManager`]; an authentication rejection logs the
//! session out.

pub mod client;
pub mod endpoints;
pub mod error;
pub mod retry;
pub mod types;

// Re-export commonly used types
pub use client::{RequestClient, RequestOptions};
pub use error::{user_message, ApiError, ApiResult};
pub use retry::{LinearBackoff, RetryPolicy};
pub use types::*;
