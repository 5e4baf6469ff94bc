/// Per-client request statistics
///
/// Tracks totals, success/failure counts, rolling average latency and the
/// most recent error for diagnostics surfaces.
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Snapshot of a client's request counters
#[derive(Debug, Clone, Default, Serialize)]
pub struct ApiStats {
    pub total_requests: u64,
    pub successful_requests: u64,
    pub failed_requests: u64,
    pub average_latency_ms: f64,
    pub last_error: Option<ApiErrorEvent>,
}

/// Most recent error with enough context to chase it down
#[derive(Debug, Clone, Serialize)]
pub struct ApiErrorEvent {
    pub service: String,
    pub endpoint: String,
    pub message: String,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct StatsInner {
    total: u64,
    successful: u64,
    failed: u64,
    latency_sum_ms: f64,
    last_error: Option<ApiErrorEvent>,
}

/// Shared tracker updated from every request path
pub struct ApiStatsTracker {
    inner: Arc<RwLock<StatsInner>>,
}

impl ApiStatsTracker {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(StatsInner::default())),
        }
    }

    /// Record the outcome and latency of one request
    pub async fn record_request(&self, success: bool, latency_ms: f64) {
        let mut inner = self.inner.write().await;
        inner.total += 1;
        if success {
            inner.successful += 1;
        } else {
            inner.failed += 1;
        }
        inner.latency_sum_ms += latency_ms;
    }

    /// Record an error event for the last-error surface
    pub async fn record_error_with_event(&self, service: &str, endpoint: &str, message: String) {
        let mut inner = self.inner.write().await;
        inner.last_error = Some(ApiErrorEvent {
            service: service.to_string(),
            endpoint: endpoint.to_string(),
            message,
            at: Utc::now(),
        });
    }

    /// Current snapshot
    pub async fn get_stats(&self) -> ApiStats {
        let inner = self.inner.read().await;
        let average_latency_ms = if inner.total > 0 {
            inner.latency_sum_ms / inner.total as f64
        } else {
            0.0
        };

        ApiStats {
            total_requests: inner.total,
            successful_requests: inner.successful,
            failed_requests: inner.failed,
            average_latency_ms,
            last_error: inner.last_error.clone(),
        }
    }
}

impl Default for ApiStatsTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_counters_accumulate() {
        let tracker = ApiStatsTracker::new();

        tracker.record_request(true, 10.0).await;
        tracker.record_request(true, 30.0).await;
        tracker.record_request(false, 50.0).await;

        let stats = tracker.get_stats().await;
        assert_eq!(stats.total_requests, 3);
        assert_eq!(stats.successful_requests, 2);
        assert_eq!(stats.failed_requests, 1);
        assert!((stats.average_latency_ms - 30.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_last_error_is_kept() {
        let tracker = ApiStatsTracker::new();
        tracker
            .record_error_with_event("provider", "/me", "HTTP 500: boom".to_string())
            .await;

        let stats = tracker.get_stats().await;
        let event = stats.last_error.expect("error event recorded");
        assert_eq!(event.service, "provider");
        assert_eq!(event.endpoint, "/me");
    }
}
