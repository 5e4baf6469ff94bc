/// API client errors
///
/// Every failure of the authenticated client is returned as a value of
/// this enum; nothing is panicked across the client boundary. Callers in
/// the UI layer render these inline and decide themselves whether to
/// retry.
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum ApiError {
    /// No bearer token available; the transport was never invoked
    Auth { message: String },

    /// Transport-level failure, no HTTP response received (status 0)
    Network { message: String },

    /// Server rejected the request (after the single permitted
    /// 401-refresh retry, a second 401 also lands here)
    Http { status: u16, message: String },

    /// Response body did not match the expected payload schema
    Schema { message: String },
}

impl ApiError {
    /// Shorthand for the no-token failure
    pub fn no_token() -> Self {
        ApiError::Auth {
            message: "no token available".to_string(),
        }
    }

    /// Numeric status code: 0 for transport failures, the HTTP status
    /// for server rejections, None for auth/schema failures that never
    /// produced a response
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Network { .. } => Some(0),
            ApiError::Http { status, .. } => Some(*status),
            ApiError::Auth { .. } | ApiError::Schema { .. } => None,
        }
    }

    /// Whether this failure came from an unauthorized response
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Http { status: 401, .. })
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Auth { message } => write!(f, "Auth error: {}", message),
            ApiError::Network { message } => write!(f, "Network error: {}", message),
            ApiError::Http { status, message } => write!(f, "API error {}: {}", status, message),
            ApiError::Schema { message } => write!(f, "Schema error: {}", message),
        }
    }
}

impl std::error::Error for ApiError {}

// Convert to String for compatibility with Result<T, String> call sites
impl From<ApiError> for String {
    fn from(err: ApiError) -> String {
        err.to_string()
    }
}
