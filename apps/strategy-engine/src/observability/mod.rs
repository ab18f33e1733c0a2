//! Observability module for metrics and logging.

mod logging;
mod metrics;

pub use logging::{LoggingError, build_filter, init_tracing};
pub use metrics::{
    MetricsConfig, MetricsError, init_metrics, record_grid_points, record_strategy_request,
};
