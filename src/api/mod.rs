/// Authenticated API client with token refresh and response caching
///
/// The one request path every remote call in the application goes
/// through:
/// 1. Resolve a bearer token from the injected provider (fail fast
///    without one)
/// 2. Execute over the transport seam
/// 3. On 401, refresh the token exactly once and retry once
/// 4. Cache successful payloads when the caller opted in, under a
///    canonical endpoint+params key with a per-call TTL
///
/// All failures come back as [`ApiError`] values; nothing in this module
/// panics across the client boundary.
pub mod cache;
pub mod client;
pub mod error;
pub mod stats;
pub mod transport;
pub mod types;

pub use cache::{cache_key, CacheStats, ResponseCache};
pub use client::ApiClient;
pub use error::ApiError;
pub use stats::{ApiStats, ApiStatsTracker};
pub use transport::{HttpTransport, ReqwestTransport, TransportResponse};
pub use types::{HttpMethod, RequestOptions};
