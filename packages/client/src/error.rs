//! API error types and their user-facing messages
use thiserror::Error;

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Classification of a failed API call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The backend rejected the credential. Terminal; the session has
    /// already been torn down when this is returned.
    #[error("Unauthorized - please login again")]
    Unauthorized,

    #[error("HTTP {code}: {status_text}")]
    HttpStatus { code: u16, status_text: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed response: {0}")]
    Malformed(String),

    /// The request could not be built (bad URL, header or body). Never sent.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    /// Check if this is an authentication error
    pub fn is_auth_error(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }

    /// Check if this is a network-related error
    pub fn is_network_error(&self) -> bool {
        matches!(self, ApiError::Network(_))
    }

    /// Check if the backend answered with a 5xx status
    pub fn is_server_error(&self) -> bool {
        matches!(self, ApiError::HttpStatus { code, .. } if *code >= 500)
    }

    /// HTTP status carried by the error, if any
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized => Some(401),
            ApiError::HttpStatus { code, .. } => Some(*code),
            _ => None,
        }
    }
}

/// Human-readable message for presenting an error to the user
pub fn user_message(error: &ApiError) -> &'static str {
    if error.is_auth_error() {
        "Please login again to continue"
    } else if error.is_network_error() {
        "Network error - please check your connection"
    } else if error.is_server_error() {
        "Server error - please try again later"
    } else {
        "An unexpected error occurred"
    }
}
