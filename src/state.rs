//! # Application State Management
//!
//! Shared state handed to every HTTP request handler.
//!
//! Configuration is read once at startup and held behind a plain `Arc` —
//! nothing re-reads the environment mid-request, and there is no runtime
//! reconfiguration. The only mutable shared state is the request metrics,
//! guarded by an `RwLock` (many readers, one writer).

use crate::config::AppConfig;
use crate::pipeline::VoicePipeline;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Instant;

#[derive(Clone)]
pub struct AppState {
    /// Immutable configuration snapshot taken at process start
    pub config: Arc<AppConfig>,

    /// Stage clients, shared across all requests
    pub pipeline: Arc<VoicePipeline>,

    /// Request counters, updated by the telemetry middleware
    pub metrics: Arc<RwLock<AppMetrics>>,

    /// When the server started
    pub start_time: Instant,
}

/// Counters collected across all HTTP requests.
#[derive(Debug, Default)]
pub struct AppMetrics {
    pub request_count: u64,
    pub error_count: u64,
    pub endpoint_metrics: HashMap<String, EndpointMetric>,
}

/// Per-endpoint counters, keyed by "METHOD /path".
#[derive(Debug, Default, Clone)]
pub struct EndpointMetric {
    pub request_count: u64,
    pub total_duration_ms: u64,
    pub error_count: u64,
}

impl AppState {
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        let pipeline = VoicePipeline::new(&config)?;
        Ok(Self {
            config: Arc::new(config),
            pipeline: Arc::new(pipeline),
            metrics: Arc::new(RwLock::new(AppMetrics::default())),
            start_time: Instant::now(),
        })
    }

    /// Record one finished request. Called by the telemetry middleware for
    /// every request, including failed ones.
    pub fn record_request(&self, endpoint: &str, duration_ms: u64, is_error: bool) {
        let mut metrics = self.metrics.write().unwrap();
        metrics.request_count += 1;
        if is_error {
            metrics.error_count += 1;
        }

        let endpoint_metric = metrics
            .endpoint_metrics
            .entry(endpoint.to_string())
            .or_default();
        endpoint_metric.request_count += 1;
        endpoint_metric.total_duration_ms += duration_ms;
        if is_error {
            endpoint_metric.error_count += 1;
        }
    }

    /// Consistent copy of the counters for serialization, so no lock is held
    /// while the HTTP response is being written.
    pub fn metrics_snapshot(&self) -> AppMetrics {
        let metrics = self.metrics.read().unwrap();
        AppMetrics {
            request_count: metrics.request_count,
            error_count: metrics.error_count,
            endpoint_metrics: metrics.endpoint_metrics.clone(),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

impl EndpointMetric {
    pub fn average_duration_ms(&self) -> f64 {
        if self.request_count > 0 {
            self.total_duration_ms as f64 / self.request_count as f64
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> AppState {
        AppState::new(AppConfig::default()).unwrap()
    }

    #[test]
    fn test_record_request_updates_totals_and_endpoint() {
        let state = state();
        state.record_request("POST /webhook", 120, false);
        state.record_request("POST /webhook", 80, true);
        state.record_request("GET /", 5, false);

        let snapshot = state.metrics_snapshot();
        assert_eq!(snapshot.request_count, 3);
        assert_eq!(snapshot.error_count, 1);

        let webhook = &snapshot.endpoint_metrics["POST /webhook"];
        assert_eq!(webhook.request_count, 2);
        assert_eq!(webhook.error_count, 1);
        assert_eq!(webhook.average_duration_ms(), 100.0);
    }

    #[test]
    fn test_average_duration_with_no_requests() {
        let metric = EndpointMetric::default();
        assert_eq!(metric.average_duration_ms(), 0.0);
    }
}
