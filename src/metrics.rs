use axum::response::IntoResponse;
use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, Encoder, HistogramVec, IntCounterVec,
    TextEncoder,
};

lazy_static! {
    /// Total number of inbound requests processed
    pub static ref REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "coinbase_proxy_requests_total",
        "Total number of inbound requests processed",
        &["endpoint", "action", "status"]
    )
    .unwrap();

    /// Inbound request duration in seconds
    pub static ref REQUEST_DURATION: HistogramVec = register_histogram_vec!(
        "coinbase_proxy_request_duration_seconds",
        "Inbound request duration in seconds",
        &["endpoint", "action"],
        vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 25.0]
    )
    .unwrap();

    /// Responses received from Coinbase
    pub static ref UPSTREAM_RESPONSES: IntCounterVec = register_int_counter_vec!(
        "coinbase_proxy_upstream_responses_total",
        "Responses received from Coinbase",
        &["action", "status"]
    )
    .unwrap();

    /// Credential secret loads
    pub static ref SECRET_LOADS: IntCounterVec = register_int_counter_vec!(
        "coinbase_proxy_secret_loads_total",
        "Credential secret loads by result",
        &["result"]
    )
    .unwrap();
}

/// Export metrics in Prometheus text format
pub fn export_metrics() -> Result<String, Box<dyn std::error::Error>> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

/// Metrics handler for /metrics endpoint
pub async fn metrics_handler() -> axum::response::Response {
    match export_metrics() {
        Ok(metrics) => (
            axum::http::StatusCode::OK,
            [(
                axum::http::header::CONTENT_TYPE,
                "text/plain; version=0.0.4",
            )],
            metrics,
        )
            .into_response(),
        Err(e) => (
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to export metrics: {}", e),
        )
            .into_response(),
    }
}
