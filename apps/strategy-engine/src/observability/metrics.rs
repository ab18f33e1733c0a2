//! Prometheus metrics for the strategy engine.
//!
//! Without an installed recorder every `record_*` call is a no-op, so the
//! engine and its tests run unchanged when the exporter is disabled.

use std::net::{IpAddr, SocketAddr};

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::config::Config;

/// Configuration for the metrics exporter.
#[derive(Debug, Clone)]
pub struct MetricsConfig {
    /// Address to bind the metrics HTTP listener.
    pub listen_addr: SocketAddr,
    /// Histogram buckets for latency measurements (in seconds).
    pub latency_buckets: Vec<f64>,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self::with_addr(SocketAddr::from(([0, 0, 0, 0], 9090)))
    }
}

impl MetricsConfig {
    /// Create a new metrics configuration with custom address.
    #[must_use]
    pub fn with_addr(addr: SocketAddr) -> Self {
        Self {
            listen_addr: addr,
            // 50us to 1s
            latency_buckets: vec![
                0.000_05, 0.0001, 0.0005, 0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0,
            ],
        }
    }

    /// Exporter address from the server bind address and the metrics port.
    ///
    /// # Errors
    ///
    /// Returns an error if the bind address is not an IP address.
    pub fn from_config(config: &Config) -> Result<Self, MetricsError> {
        let ip: IpAddr = config
            .server
            .bind_address
            .parse()
            .map_err(|e| MetricsError::Configuration(format!("bind address: {e}")))?;
        Ok(Self::with_addr(SocketAddr::new(
            ip,
            config.observability.metrics.port,
        )))
    }
}

/// Initialize the Prometheus metrics exporter.
///
/// This starts an HTTP server that exposes metrics at `/metrics`.
///
/// # Errors
///
/// Returns an error if the metrics exporter fails to start (e.g., port already in use).
pub fn init_metrics(config: &MetricsConfig) -> Result<(), MetricsError> {
    PrometheusBuilder::new()
        .with_http_listener(config.listen_addr)
        .set_buckets(&config.latency_buckets)
        .map_err(|e| MetricsError::Configuration(e.to_string()))?
        .install()
        .map_err(|e| MetricsError::Installation(e.to_string()))?;

    tracing::info!(
        addr = %config.listen_addr,
        "Prometheus metrics exporter started"
    );

    Ok(())
}

/// Error type for metrics operations.
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    /// Failed to configure metrics exporter.
    #[error("metrics configuration error: {0}")]
    Configuration(String),
    /// Failed to install metrics exporter.
    #[error("metrics installation error: {0}")]
    Installation(String),
}

/// Record one strategy request.
///
/// # Arguments
///
/// * `operation` - `simulate` or `adjust`
/// * `outcome` - `ok` or the error reason (e.g. `INVALID_LEG`)
/// * `latency_seconds` - Service time in seconds
pub fn record_strategy_request(operation: &str, outcome: &str, latency_seconds: f64) {
    counter!(
        "strategy_requests_total",
        "operation" => operation.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);

    histogram!(
        "strategy_request_seconds",
        "operation" => operation.to_string()
    )
    .record(latency_seconds);
}

/// Record the size of an evaluated price grid.
#[allow(clippy::cast_precision_loss)]
pub fn record_grid_points(points: usize) {
    histogram!("strategy_grid_points").record(points as f64);
}
