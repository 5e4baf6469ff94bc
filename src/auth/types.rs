/// Session token model
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Tokens for one signed-in session
///
/// Persisted as JSON in the session store. The access token is an opaque
/// bearer credential; only the expiry timestamp is interpreted locally.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
}

impl SessionTokens {
    /// Build from an auth response carrying a lifetime in seconds
    pub fn from_expires_in(
        access_token: String,
        refresh_token: String,
        expires_in_seconds: i64,
    ) -> Self {
        Self {
            access_token,
            refresh_token,
            expires_at: Utc::now() + Duration::seconds(expires_in_seconds),
        }
    }

    /// True when the access token expires within `margin_seconds`
    ///
    /// Used for refresh-before-expiry so calls rarely run into a 401 in
    /// the first place.
    pub fn expires_within(&self, margin_seconds: i64) -> bool {
        Utc::now() + Duration::seconds(margin_seconds) >= self.expires_at
    }
}
