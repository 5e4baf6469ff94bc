/// Backend auth service client
///
/// Endpoints:
/// - POST {base}/auth/token    exchange an authorization code for tokens
/// - POST {base}/auth/refresh  rotate tokens with a refresh token
///
/// This client talks plain reqwest rather than going through the
/// authenticated API client: it runs before a session exists and is the
/// thing the API client's refresh path depends on.
use super::types::SessionTokens;
use crate::error::{AppError, AppResult};
use crate::logger::{self, LogTag};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

const ENDPOINT_TOKEN: &str = "/auth/token";
const ENDPOINT_REFRESH: &str = "/auth/refresh";

/// Wire shape of both auth endpoints
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    /// Absent when the backend does not rotate refresh tokens
    refresh_token: Option<String>,
    expires_in: i64,
}

pub struct AuthClient {
    client: Client,
    base_url: String,
}

impl AuthClient {
    pub fn new(base_url: String, timeout_seconds: u64) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .user_agent("TrackChat/0.1")
            .build()
            .map_err(|e| AppError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, base_url })
    }

    /// Exchange an authorization code for a session (initial login)
    pub async fn exchange_code(&self, code: &str) -> AppResult<SessionTokens> {
        logger::debug(LogTag::Auth, "Exchanging authorization code for session");
        self.post_for_tokens(ENDPOINT_TOKEN, json!({ "code": code }), None)
            .await
    }

    /// Rotate the session with its refresh token
    ///
    /// When the backend answers without a new refresh token, the current
    /// one is kept.
    pub async fn refresh_session(&self, current: &SessionTokens) -> AppResult<SessionTokens> {
        logger::debug(LogTag::Auth, "Refreshing session tokens");
        self.post_for_tokens(
            ENDPOINT_REFRESH,
            json!({ "refresh_token": current.refresh_token }),
            Some(current.refresh_token.clone()),
        )
        .await
    }

    async fn post_for_tokens(
        &self,
        endpoint: &str,
        body: serde_json::Value,
        fallback_refresh_token: Option<String>,
    ) -> AppResult<SessionTokens> {
        let url = format!("{}{}", self.base_url, endpoint);

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Auth(format!("Auth request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Auth(format!(
                "Auth service rejected the request ({}): {}",
                status, body
            )));
        }

        let parsed: TokenResponse = response
            .json()
            .await
            .map_err(|e| AppError::Auth(format!("Malformed auth response: {}", e)))?;

        let refresh_token = parsed
            .refresh_token
            .or(fallback_refresh_token)
            .ok_or_else(|| AppError::Auth("Auth response carried no refresh token".to_string()))?;

        Ok(SessionTokens::from_expires_in(
            parsed.access_token,
            refresh_token,
            parsed.expires_in,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_response_parses_with_and_without_rotation() {
        let rotated: TokenResponse = serde_json::from_str(
            r#"{"access_token":"a2","refresh_token":"r2","expires_in":3600}"#,
        )
        .unwrap();
        assert_eq!(rotated.refresh_token.as_deref(), Some("r2"));

        let unrotated: TokenResponse =
            serde_json::from_str(r#"{"access_token":"a2","expires_in":3600}"#).unwrap();
        assert!(unrotated.refresh_token.is_none());
        assert_eq!(unrotated.expires_in, 3600);
    }
}
