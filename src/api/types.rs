/// Request descriptor types for the authenticated API client
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;

/// HTTP methods the client issues
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-call request options
///
/// Built fresh for every call, never persisted. Query params carry JSON
/// scalars; `Value::Null` entries are omitted from both the wire request
/// and the cache key, everything else is stringified on the wire.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub method: Option<HttpMethod>,
    pub headers: HashMap<String, String>,
    pub body: Option<Value>,
    pub params: Vec<(String, Value)>,
    /// Opt-in caching: store a successful payload under this TTL
    pub cache_ttl: Option<Duration>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the HTTP method (default GET)
    pub fn with_method(mut self, method: HttpMethod) -> Self {
        self.method = Some(method);
        self
    }

    /// Add a request header
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Set a JSON body (serialized for non-GET methods)
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Add a query parameter
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// Opt into caching the successful payload for `ttl`
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = Some(ttl);
        self
    }

    /// Effective method, defaulting to GET
    pub fn method(&self) -> HttpMethod {
        self.method.unwrap_or(HttpMethod::Get)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_defaults_to_get() {
        let options = RequestOptions::new();
        assert_eq!(options.method(), HttpMethod::Get);

        let options = RequestOptions::new().with_method(HttpMethod::Put);
        assert_eq!(options.method(), HttpMethod::Put);
    }

    #[test]
    fn test_builder_accumulates() {
        let options = RequestOptions::new()
            .with_param("limit", 20)
            .with_param("time_range", "medium_term")
            .with_header("Accept", "application/json")
            .with_cache_ttl(Duration::from_millis(500));

        assert_eq!(options.params.len(), 2);
        assert_eq!(
            options.headers.get("Accept"),
            Some(&"application/json".to_string())
        );
        assert_eq!(options.cache_ttl, Some(Duration::from_millis(500)));
    }
}
