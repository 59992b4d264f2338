use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use lazy_static::lazy_static;
#[cfg(target_os = "linux")]
use prometheus::process_collector::ProcessCollector;
use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};
use std::sync::Arc;
use std::time::Instant;

use crate::http_server::AppState;

// Metrics for REST API monitoring
lazy_static! {
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("http_requests_total", "Total number of HTTP requests"),
        &["method", "endpoint", "status"]
    )
    .unwrap();
    pub static ref HTTP_REQUEST_DURATION: HistogramVec = HistogramVec::new(
        HistogramOpts::new("http_request_duration_seconds", "HTTP request duration in seconds").buckets(vec![
            0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0
        ]),
        &["method", "endpoint"]
    )
    .unwrap();
    pub static ref HTTP_REQUESTS_IN_FLIGHT: IntGauge = IntGauge::new(
        "http_requests_in_flight",
        "Number of HTTP requests currently being processed"
    )
    .unwrap();
    pub static ref HTTP_ERRORS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("http_errors_total", "Total number of HTTP errors"),
        &["method", "endpoint", "status"]
    )
    .unwrap();
}

#[derive(Debug, Clone)]
pub struct Metrics {
    pub registry: Arc<Registry>,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        // Register OS/machine metrics collector (Linux only)
        #[cfg(target_os = "linux")]
        {
            let process_collector = ProcessCollector::for_self();
            registry.register(Box::new(process_collector)).unwrap();
        }

        // Register all custom HTTP metrics
        registry.register(Box::new(HTTP_REQUESTS_TOTAL.clone())).unwrap();
        registry.register(Box::new(HTTP_REQUEST_DURATION.clone())).unwrap();
        registry.register(Box::new(HTTP_REQUESTS_IN_FLIGHT.clone())).unwrap();
        registry.register(Box::new(HTTP_ERRORS_TOTAL.clone())).unwrap();

        Self {
            registry: Arc::new(registry),
        }
    }
}

/// Helper to normalize endpoints (remove IDs, UUIDs, etc.)
/// Example: /tasks/4b8f.../toggle_complete -> /tasks/:id/toggle_complete
pub fn normalize_path(path: &str) -> String {
    // Remove query string if present
    let path_only = path.split('?').next().unwrap_or(path);

    let segments: Vec<&str> = path_only
        .split('/')
        .filter(|s| !s.is_empty()) // avoid leading/trailing empty segments
        .collect();

    segments
        .iter()
        .map(|s| {
            // Replace numeric IDs or UUIDs with ":id"
            if s.parse::<i64>().is_ok() || s.len() == 36 {
                ":id"
            } else {
                *s
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Middleware for tracking HTTP metrics
pub async fn track_metrics(req: Request, next: Next) -> Response {
    let path = req.uri().path().to_string();
    let method = req.method().clone();

    // Skip metrics for the metrics endpoint
    if path == "/metrics" {
        return next.run(req).await;
    }

    // Normalize endpoint for better cardinality
    let endpoint = normalize_path(&path);

    // Track in-flight requests
    HTTP_REQUESTS_IN_FLIGHT.inc();

    // Start timer
    let start = Instant::now();

    // Process request
    let response = next.run(req).await;

    // Record timing
    let duration = start.elapsed().as_secs_f64();
    HTTP_REQUEST_DURATION
        .with_label_values(&[method.as_str(), &endpoint])
        .observe(duration);

    // Track response status
    let status = response.status();
    let status_str = status.as_u16().to_string();

    HTTP_REQUESTS_TOTAL
        .with_label_values(&[method.as_str(), &endpoint, &status_str])
        .inc();

    // Track errors (4xx and 5xx)
    if status.is_client_error() || status.is_server_error() {
        HTTP_ERRORS_TOTAL
            .with_label_values(&[method.as_str(), &endpoint, &status_str])
            .inc();
    }

    HTTP_REQUESTS_IN_FLIGHT.dec();

    response
}

pub async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = state.metrics.registry.gather();

    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            String::from("Failed to encode metrics"),
        );
    }

    let res = match String::from_utf8(buffer) {
        Ok(v) => v,
        Err(e) => {
            tracing::error!("custom metrics could not be from_utf8'd: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                String::from("Failed to encode metrics"),
            );
        }
    };

    (StatusCode::OK, res)
}
