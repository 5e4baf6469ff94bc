/// Token provider seam for the authenticated API client
///
/// The client resolves a bearer token before every call and asks for a
/// forced refresh exactly once when a call comes back 401. Both
/// operations answer Option: None means "no usable credential", which
/// the client surfaces as an auth failure without touching the network
/// (accessor) or retrying further (refresher).
use super::service::AuthClient;
use super::store::TokenStore;
use crate::logger::{self, LogTag};
use async_trait::async_trait;

/// Seconds before expiry at which the accessor refreshes proactively
const REFRESH_MARGIN_SECONDS: i64 = 60;

#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Current bearer token, refreshing internally when prudent
    async fn access_token(&self) -> Option<String>;

    /// Force a refresh; new token on success, None on any failure
    async fn refresh(&self) -> Option<String>;
}

/// Provider backed by the session store and the backend auth service
pub struct StoredTokenProvider {
    store: TokenStore,
    auth: AuthClient,
}

impl StoredTokenProvider {
    pub fn new(store: TokenStore, auth: AuthClient) -> Self {
        Self { store, auth }
    }
}

#[async_trait]
impl TokenProvider for StoredTokenProvider {
    async fn access_token(&self) -> Option<String> {
        let tokens = self.store.load()?;

        if tokens.expires_within(REFRESH_MARGIN_SECONDS) {
            logger::debug(
                LogTag::Auth,
                "Access token near expiry, refreshing before use",
            );
            return self.refresh().await;
        }

        Some(tokens.access_token)
    }

    async fn refresh(&self) -> Option<String> {
        let tokens = self.store.load()?;

        match self.auth.refresh_session(&tokens).await {
            Ok(rotated) => {
                if let Err(e) = self.store.save(&rotated) {
                    logger::warning(
                        LogTag::Auth,
                        &format!("Refreshed session could not be persisted: {}", e),
                    );
                }
                Some(rotated.access_token)
            }
            Err(e) => {
                logger::warning(LogTag::Auth, &format!("Token refresh failed: {}", e));
                None
            }
        }
    }
}
