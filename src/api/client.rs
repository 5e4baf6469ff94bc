/// Authenticated API client
///
/// Executes HTTP requests against a fixed base URL with a bearer token
/// resolved per call from the injected [`TokenProvider`]. A 401 response
/// triggers exactly one token refresh followed by one retry of the whole
/// request; a second 401 (or a failed refresh) is terminal. Successful
/// payloads are cached in memory when the caller opts in with a TTL.
///
/// Instances are constructed once at startup and passed down by
/// dependency injection; each owns its cache exclusively.
use super::cache::{cache_key, CacheStats, ResponseCache};
use super::error::ApiError;
use super::stats::{ApiStats, ApiStatsTracker};
use super::transport::{HttpTransport, TransportResponse};
use super::types::{HttpMethod, RequestOptions};
use crate::auth::TokenProvider;
use crate::logger::{self, LogTag};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

pub struct ApiClient {
    /// Label for logs and stats events ("provider", "backend")
    service: String,
    base_url: String,
    transport: Arc<dyn HttpTransport>,
    tokens: Arc<dyn TokenProvider>,
    cache: ResponseCache,
    stats: Arc<ApiStatsTracker>,
}

impl ApiClient {
    pub fn new(
        service: impl Into<String>,
        base_url: impl Into<String>,
        transport: Arc<dyn HttpTransport>,
        tokens: Arc<dyn TokenProvider>,
    ) -> Self {
        Self {
            service: service.into(),
            base_url: base_url.into(),
            transport,
            tokens,
            cache: ResponseCache::new(),
            stats: Arc::new(ApiStatsTracker::new()),
        }
    }

    /// Execute an authenticated request and deserialize the payload
    ///
    /// Every failure mode surfaces through the returned `Result`; see
    /// [`ApiError`] for the taxonomy. When `options.cache_ttl` is set,
    /// the raw successful payload is stored under the canonical
    /// endpoint+params key.
    pub async fn request<T>(&self, endpoint: &str, options: RequestOptions) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let value = self.request_value(endpoint, &options).await?;

        let parsed: T = serde_json::from_value(value.clone()).map_err(|e| {
            let err = ApiError::Schema {
                message: format!("Unexpected payload for {}: {}", endpoint, e),
            };
            logger::warning(LogTag::Api, &format!("[{}] {}", self.service, err));
            err
        })?;

        if let Some(ttl) = options.cache_ttl {
            let key = cache_key(endpoint, &options.params);
            logger::debug(
                LogTag::Cache,
                &format!("[{}] Caching {} for {}ms", self.service, key, ttl.as_millis()),
            );
            self.cache.insert(key, value, ttl);
        }

        Ok(parsed)
    }

    /// Read a fresh cached payload for endpoint+params, if present
    ///
    /// Pure cache read with lazy deletion of stale entries; never
    /// triggers network access.
    pub fn get_cached<T>(&self, endpoint: &str, params: &[(String, Value)]) -> Option<T>
    where
        T: DeserializeOwned,
    {
        let key = cache_key(endpoint, params);
        let value = self.cache.get(&key)?;

        match serde_json::from_value(value) {
            Ok(parsed) => Some(parsed),
            Err(_) => {
                // A payload that no longer decodes is useless; drop it
                self.cache.remove(&key);
                None
            }
        }
    }

    /// Cache-or-fetch helper for GET endpoints
    ///
    /// Per-endpoint TTL choices live in the caller's configuration
    /// table; this collapses the repeated check-cache-then-request
    /// boilerplate into one place.
    pub async fn cached_request<T>(
        &self,
        endpoint: &str,
        params: Vec<(String, Value)>,
        ttl: Duration,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        if let Some(hit) = self.get_cached::<T>(endpoint, &params) {
            logger::debug(
                LogTag::Cache,
                &format!("[{}] Cache hit: {}", self.service, cache_key(endpoint, &params)),
            );
            return Ok(hit);
        }

        let mut options = RequestOptions::new().with_cache_ttl(ttl);
        options.params = params;
        self.request(endpoint, options).await
    }

    /// Remove every cached entry whose key contains `fragment`
    ///
    /// Called after mutations that make cached reads of a resource
    /// stale.
    pub fn invalidate(&self, fragment: &str) {
        let removed = self.cache.invalidate(fragment);
        if removed > 0 {
            logger::debug(
                LogTag::Cache,
                &format!(
                    "[{}] Invalidated {} cached entries matching '{}'",
                    self.service, removed, fragment
                ),
            );
        }
    }

    /// Drop the whole cache (logout path)
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub async fn stats(&self) -> ApiStats {
        self.stats.get_stats().await
    }

    // ========================================================================
    // REQUEST EXECUTION
    // ========================================================================

    async fn request_value(
        &self,
        endpoint: &str,
        options: &RequestOptions,
    ) -> Result<Value, ApiError> {
        // Step 1: no token, no network call
        let Some(token) = self.tokens.access_token().await else {
            let err = ApiError::no_token();
            self.stats
                .record_error_with_event(&self.service, endpoint, err.to_string())
                .await;
            return Err(err);
        };

        let (response, elapsed) = self.execute_once(endpoint, options, &token).await?;

        if response.status == 401 {
            // The one permitted refresh-and-retry cycle. A failed
            // refresh and a still-unauthorized retry surface identically.
            self.stats.record_request(false, elapsed).await;
            logger::debug(
                LogTag::Api,
                &format!(
                    "[{}] 401 on {}, refreshing token and retrying once",
                    self.service, endpoint
                ),
            );

            return match self.tokens.refresh().await {
                Some(new_token) => {
                    let (retried, retried_elapsed) =
                        self.execute_once(endpoint, options, &new_token).await?;
                    self.finish(endpoint, retried, retried_elapsed).await
                }
                None => {
                    // The original 401 attempt is already counted above
                    let message = extract_error_message(response.status, &response.body);
                    self.stats
                        .record_error_with_event(
                            &self.service,
                            endpoint,
                            format!("HTTP {}: {}", response.status, message),
                        )
                        .await;
                    Err(ApiError::Http {
                        status: response.status,
                        message,
                    })
                }
            };
        }

        self.finish(endpoint, response, elapsed).await
    }

    /// One transport exchange; transport-level failure maps to the
    /// status-0 network error
    async fn execute_once(
        &self,
        endpoint: &str,
        options: &RequestOptions,
        token: &str,
    ) -> Result<(TransportResponse, f64), ApiError> {
        let url = self.build_url(endpoint, &options.params);
        let headers = self.build_headers(options, token);
        let method = options.method();

        logger::debug(
            LogTag::Api,
            &format!("[{}] {} {}", self.service, method, url),
        );

        let start = Instant::now();
        let result = self
            .transport
            .execute(method, &url, &headers, options.body.as_ref())
            .await;
        let elapsed = start.elapsed().as_millis() as f64;

        match result {
            Ok(response) => Ok((response, elapsed)),
            Err(message) => {
                self.stats.record_request(false, elapsed).await;
                self.stats
                    .record_error_with_event(&self.service, endpoint, message.clone())
                    .await;
                Err(ApiError::Network { message })
            }
        }
    }

    /// Map a received response into the result channel, recording stats
    async fn finish(
        &self,
        endpoint: &str,
        response: TransportResponse,
        elapsed: f64,
    ) -> Result<Value, ApiError> {
        if !response.is_success() {
            let message = extract_error_message(response.status, &response.body);
            self.stats.record_request(false, elapsed).await;
            self.stats
                .record_error_with_event(
                    &self.service,
                    endpoint,
                    format!("HTTP {}: {}", response.status, message),
                )
                .await;
            return Err(ApiError::Http {
                status: response.status,
                message,
            });
        }

        let value = if response.body.trim().is_empty() {
            // 204-style responses carry no payload
            Value::Null
        } else {
            match serde_json::from_str(&response.body) {
                Ok(value) => value,
                Err(e) => {
                    self.stats.record_request(false, elapsed).await;
                    self.stats
                        .record_error_with_event(
                            &self.service,
                            endpoint,
                            format!("Parse error: {}", e),
                        )
                        .await;
                    return Err(ApiError::Schema {
                        message: format!("Response body is not valid JSON: {}", e),
                    });
                }
            }
        };

        self.stats.record_request(true, elapsed).await;
        Ok(value)
    }

    fn build_url(&self, endpoint: &str, params: &[(String, Value)]) -> String {
        let mut url = format!("{}{}", self.base_url, endpoint);

        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        let mut has_params = false;
        for (key, value) in params {
            // Null params are omitted, everything else is stringified
            let text = match value {
                Value::Null => continue,
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            serializer.append_pair(key, &text);
            has_params = true;
        }

        if has_params {
            url.push('?');
            url.push_str(&serializer.finish());
        }
        url
    }

    fn build_headers(&self, options: &RequestOptions, token: &str) -> HashMap<String, String> {
        let mut headers = HashMap::new();

        if options.body.is_some() {
            headers.insert("Content-Type".to_string(), "application/json".to_string());
        }

        // Caller headers may override anything except Authorization
        for (name, value) in &options.headers {
            if name.eq_ignore_ascii_case("authorization") {
                continue;
            }
            headers.insert(name.clone(), value.clone());
        }

        headers.insert("Authorization".to_string(), format!("Bearer {}", token));
        headers.insert(
            "x-request-id".to_string(),
            uuid::Uuid::new_v4().to_string(),
        );

        headers
    }
}

/// Pull the server-supplied error detail out of a failure body
///
/// Recognizes the `{"error":{"message":..}}`, `{"error":".."}` and
/// `{"message":".."}` shapes; anything else falls back to "HTTP <status>".
fn extract_error_message(status: u16, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        if let Some(message) = value.pointer("/error/message").and_then(|v| v.as_str()) {
            return message.to_string();
        }
        if let Some(message) = value.get("error").and_then(|v| v.as_str()) {
            return message.to_string();
        }
        if let Some(message) = value.get("message").and_then(|v| v.as_str()) {
            return message.to_string();
        }
    }
    format!("HTTP {}", status)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Transport driven by a handler closure, counting every invocation
    struct ScriptedTransport {
        handler: Box<
            dyn Fn(HttpMethod, &str, &HashMap<String, String>) -> Result<TransportResponse, String>
                + Send
                + Sync,
        >,
        calls: AtomicUsize,
    }

    impl ScriptedTransport {
        fn new<F>(handler: F) -> Arc<Self>
        where
            F: Fn(HttpMethod, &str, &HashMap<String, String>) -> Result<TransportResponse, String>
                + Send
                + Sync
                + 'static,
        {
            Arc::new(Self {
                handler: Box::new(handler),
                calls: AtomicUsize::new(0),
            })
        }

        fn respond_with(status: u16, body: &str) -> Arc<Self> {
            let body = body.to_string();
            Self::new(move |_, _, _| {
                Ok(TransportResponse {
                    status,
                    body: body.clone(),
                })
            })
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl HttpTransport for ScriptedTransport {
        async fn execute(
            &self,
            method: HttpMethod,
            url: &str,
            headers: &HashMap<String, String>,
            _body: Option<&Value>,
        ) -> Result<TransportResponse, String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            (self.handler)(method, url, headers)
        }
    }

    /// Token provider with a scripted refresh outcome
    struct ScriptedTokens {
        current: Mutex<Option<String>>,
        on_refresh: Option<String>,
        refresh_calls: AtomicUsize,
    }

    impl ScriptedTokens {
        fn with_token(token: &str, on_refresh: Option<&str>) -> Arc<Self> {
            Arc::new(Self {
                current: Mutex::new(Some(token.to_string())),
                on_refresh: on_refresh.map(|s| s.to_string()),
                refresh_calls: AtomicUsize::new(0),
            })
        }

        fn without_token() -> Arc<Self> {
            Arc::new(Self {
                current: Mutex::new(None),
                on_refresh: None,
                refresh_calls: AtomicUsize::new(0),
            })
        }

        fn refresh_count(&self) -> usize {
            self.refresh_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TokenProvider for ScriptedTokens {
        async fn access_token(&self) -> Option<String> {
            self.current.lock().unwrap().clone()
        }

        async fn refresh(&self) -> Option<String> {
            self.refresh_calls.fetch_add(1, Ordering::SeqCst);
            match &self.on_refresh {
                Some(token) => {
                    *self.current.lock().unwrap() = Some(token.clone());
                    Some(token.clone())
                }
                None => None,
            }
        }
    }

    fn client(transport: Arc<ScriptedTransport>, tokens: Arc<ScriptedTokens>) -> ApiClient {
        ApiClient::new("provider", "https://api.test", transport, tokens)
    }

    #[tokio::test]
    async fn test_no_token_short_circuits_without_network() {
        let transport = ScriptedTransport::respond_with(200, "{}");
        let tokens = ScriptedTokens::without_token();
        let api = client(transport.clone(), tokens);

        let result: Result<Value, ApiError> = api.request("/me", RequestOptions::new()).await;

        assert_eq!(result, Err(ApiError::no_token()));
        assert_eq!(transport.call_count(), 0, "transport must never be invoked");
    }

    #[tokio::test]
    async fn test_successful_request_parses_payload() {
        let transport = ScriptedTransport::respond_with(200, r#"{"id":"user-1"}"#);
        let tokens = ScriptedTokens::with_token("good", None);
        let api = client(transport.clone(), tokens);

        let result: Value = api.request("/me", RequestOptions::new()).await.unwrap();

        assert_eq!(result, json!({"id": "user-1"}));
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn test_401_refreshes_once_and_retries() {
        // 401 for the expired token, 200 once the fresh one shows up
        let transport = ScriptedTransport::new(|_, _, headers| {
            let auth = headers.get("Authorization").cloned().unwrap_or_default();
            if auth == "Bearer fresh" {
                Ok(TransportResponse {
                    status: 200,
                    body: r#"{"ok":true}"#.to_string(),
                })
            } else {
                Ok(TransportResponse {
                    status: 401,
                    body: String::new(),
                })
            }
        });
        let tokens = ScriptedTokens::with_token("expired", Some("fresh"));
        let api = client(transport.clone(), tokens.clone());

        let result: Value = api.request("/me", RequestOptions::new()).await.unwrap();

        assert_eq!(result, json!({"ok": true}));
        assert_eq!(transport.call_count(), 2, "original call plus one retry");
        assert_eq!(tokens.refresh_count(), 1);
    }

    #[tokio::test]
    async fn test_permanent_401_fails_after_exactly_one_retry() {
        let transport = ScriptedTransport::respond_with(401, "");
        let tokens = ScriptedTokens::with_token("expired", Some("fresh"));
        let api = client(transport.clone(), tokens.clone());

        let result: Result<Value, ApiError> = api.request("/me", RequestOptions::new()).await;

        match result {
            Err(ApiError::Http { status: 401, .. }) => {}
            other => panic!("expected Http 401, got {:?}", other),
        }
        assert_eq!(transport.call_count(), 2, "never a third attempt");
        assert_eq!(tokens.refresh_count(), 1, "never a second refresh");
    }

    #[tokio::test]
    async fn test_failed_refresh_surfaces_the_401() {
        let transport = ScriptedTransport::respond_with(401, "");
        let tokens = ScriptedTokens::with_token("expired", None);
        let api = client(transport.clone(), tokens.clone());

        let result: Result<Value, ApiError> = api.request("/me", RequestOptions::new()).await;

        match result {
            Err(ApiError::Http { status: 401, .. }) => {}
            other => panic!("expected Http 401, got {:?}", other),
        }
        assert_eq!(transport.call_count(), 1, "no retry without a new token");
        assert_eq!(tokens.refresh_count(), 1);
    }

    #[tokio::test]
    async fn test_transport_failure_maps_to_status_zero() {
        let transport = ScriptedTransport::new(|_, _, _| Err("connection refused".to_string()));
        let tokens = ScriptedTokens::with_token("good", None);
        let api = client(transport.clone(), tokens);

        let result: Result<Value, ApiError> = api.request("/me", RequestOptions::new()).await;

        let err = result.unwrap_err();
        assert_eq!(err.status(), Some(0));
        match err {
            ApiError::Network { message } => assert!(message.contains("connection refused")),
            other => panic!("expected Network, got {:?}", other),
        }
        // Transport failures are not auto-retried
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn test_server_error_detail_is_extracted() {
        let transport =
            ScriptedTransport::respond_with(500, r#"{"error":{"message":"upstream broke"}}"#);
        let tokens = ScriptedTokens::with_token("good", None);
        let api = client(transport, tokens);

        let result: Result<Value, ApiError> = api.request("/me", RequestOptions::new()).await;

        assert_eq!(
            result,
            Err(ApiError::Http {
                status: 500,
                message: "upstream broke".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_error_without_detail_falls_back_to_status() {
        let transport = ScriptedTransport::respond_with(503, "<html>bad gateway</html>");
        let tokens = ScriptedTokens::with_token("good", None);
        let api = client(transport, tokens);

        let result: Result<Value, ApiError> = api.request("/me", RequestOptions::new()).await;

        assert_eq!(
            result,
            Err(ApiError::Http {
                status: 503,
                message: "HTTP 503".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_malformed_success_body_is_schema_error() {
        let transport = ScriptedTransport::respond_with(200, "definitely not json");
        let tokens = ScriptedTokens::with_token("good", None);
        let api = client(transport, tokens);

        let result: Result<Value, ApiError> = api.request("/me", RequestOptions::new()).await;

        assert!(matches!(result, Err(ApiError::Schema { .. })));
    }

    #[tokio::test]
    async fn test_payload_type_mismatch_is_schema_error() {
        #[derive(Debug, serde::Deserialize)]
        struct Expected {
            #[allow(dead_code)]
            id: String,
        }

        let transport = ScriptedTransport::respond_with(200, r#"{"unrelated":1}"#);
        let tokens = ScriptedTokens::with_token("good", None);
        let api = client(transport, tokens);

        let result: Result<Expected, ApiError> = api.request("/me", RequestOptions::new()).await;

        assert!(matches!(result, Err(ApiError::Schema { .. })));
    }

    #[tokio::test]
    async fn test_caller_cannot_override_authorization() {
        let transport = ScriptedTransport::new(|_, _, headers| {
            assert_eq!(
                headers.get("Authorization").map(String::as_str),
                Some("Bearer good")
            );
            Ok(TransportResponse {
                status: 200,
                body: "{}".to_string(),
            })
        });
        let tokens = ScriptedTokens::with_token("good", None);
        let api = client(transport.clone(), tokens);

        let options = RequestOptions::new()
            .with_header("Authorization", "Bearer hacker")
            .with_header("authorization", "Bearer sneakier")
            .with_header("Accept", "application/json");
        let _: Value = api.request("/me", options).await.unwrap();

        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn test_null_params_omitted_from_url() {
        let transport = ScriptedTransport::new(|_, url, _| {
            assert!(url.contains("limit=20"));
            assert!(!url.contains("after"), "null param must not reach the wire");
            Ok(TransportResponse {
                status: 200,
                body: "{}".to_string(),
            })
        });
        let tokens = ScriptedTokens::with_token("good", None);
        let api = client(transport, tokens);

        let options = RequestOptions::new()
            .with_param("limit", 20)
            .with_param("after", Value::Null);
        let _: Value = api.request("/me/player/recently-played", options).await.unwrap();
    }

    #[tokio::test]
    async fn test_cached_request_serves_second_call_from_cache() {
        let transport = ScriptedTransport::respond_with(200, r#"{"items":[1,2,3]}"#);
        let tokens = ScriptedTokens::with_token("good", None);
        let api = client(transport.clone(), tokens);

        let params = vec![
            ("time_range".to_string(), json!("medium_term")),
            ("limit".to_string(), json!(20)),
        ];
        let ttl = Duration::from_secs(60);

        let first: Value = api
            .cached_request("/me/top/tracks", params.clone(), ttl)
            .await
            .unwrap();
        assert_eq!(transport.call_count(), 1);

        // Same logical request, params reordered: must hit the cache
        let reordered = vec![
            ("limit".to_string(), json!(20)),
            ("time_range".to_string(), json!("medium_term")),
        ];
        let second: Value = api
            .cached_request("/me/top/tracks", reordered, ttl)
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(transport.call_count(), 1, "second call must not hit the network");
    }

    #[tokio::test]
    async fn test_get_cached_never_touches_network() {
        let transport = ScriptedTransport::respond_with(200, "{}");
        let tokens = ScriptedTokens::with_token("good", None);
        let api = client(transport.clone(), tokens);

        let miss: Option<Value> = api.get_cached("/me", &[]);

        assert_eq!(miss, None);
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_invalidate_clears_matching_entries_only() {
        let transport = ScriptedTransport::respond_with(200, r#"{"items":[]}"#);
        let tokens = ScriptedTokens::with_token("good", None);
        let api = client(transport.clone(), tokens);

        let ttl = Duration::from_secs(60);
        let _: Value = api
            .cached_request("/me/top/tracks", vec![("limit".to_string(), json!(5))], ttl)
            .await
            .unwrap();
        let _: Value = api
            .cached_request("/me/player/recently-played", vec![], ttl)
            .await
            .unwrap();
        assert_eq!(transport.call_count(), 2);

        api.invalidate("tracks");

        // The tracks entry is gone, so the request goes out again
        let _: Value = api
            .cached_request("/me/top/tracks", vec![("limit".to_string(), json!(5))], ttl)
            .await
            .unwrap();
        assert_eq!(transport.call_count(), 3);

        // The recently-played entry survived the invalidation
        let _: Value = api
            .cached_request("/me/player/recently-played", vec![], ttl)
            .await
            .unwrap();
        assert_eq!(transport.call_count(), 3);
    }

    #[tokio::test]
    async fn test_clear_cache_drops_everything() {
        let transport = ScriptedTransport::respond_with(200, r#"{"items":[]}"#);
        let tokens = ScriptedTokens::with_token("good", None);
        let api = client(transport.clone(), tokens);

        let ttl = Duration::from_secs(60);
        let _: Value = api.cached_request("/me", vec![], ttl).await.unwrap();
        assert_eq!(transport.call_count(), 1);

        api.clear_cache();

        let _: Value = api.cached_request("/me", vec![], ttl).await.unwrap();
        assert_eq!(transport.call_count(), 2);
    }

    #[tokio::test]
    async fn test_stats_reflect_outcomes() {
        let transport = ScriptedTransport::respond_with(500, "{}");
        let tokens = ScriptedTokens::with_token("good", None);
        let api = client(transport, tokens);

        let _: Result<Value, ApiError> = api.request("/me", RequestOptions::new()).await;

        let stats = api.stats().await;
        assert_eq!(stats.total_requests, 1);
        assert_eq!(stats.failed_requests, 1);
        assert!(stats.last_error.is_some());
    }
}
