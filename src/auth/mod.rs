//! Session tokens and token lifecycle
//!
//! The API client never inspects token internals; it pulls a bearer
//! string from the [`TokenProvider`] trait and asks it for a forced
//! refresh when the server answers 401. The stored implementation keeps
//! tokens in a JSON file under the app data dir and refreshes them
//! through the backend auth service.

pub mod provider;
pub mod service;
pub mod store;
pub mod types;

pub use provider::{StoredTokenProvider, TokenProvider};
pub use service::AuthClient;
pub use store::TokenStore;
pub use types::SessionTokens;
