//! Configuration module for the strategy engine.
//!
//! Loads a YAML file with environment variable interpolation. Every section
//! has defaults, so a missing file or an empty document yields a working
//! configuration.
//!
//! # Usage
//!
//! ```rust,ignore
//! use strategy_engine::config::load_config;
//!
//! // Path from STRATEGY_ENGINE_CONFIG, falling back to config.yaml
//! let config = load_config(None)?;
//!
//! println!("HTTP port: {}", config.server.http_port);
//! ```

mod catalog;
mod observability;
mod server;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use catalog::CatalogConfig;
pub use observability::{LoggingConfig, MetricsSettings, ObservabilityConfig};
pub use server::ServerConfig;

pub use crate::domain::advisor::AdvisorConfig;
pub use crate::domain::payoff::{AnalysisConfig, GridConfig};

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "STRATEGY_ENGINE_CONFIG";

/// Config file used when neither an explicit path nor the env var is set.
pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        /// Path to the config file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse YAML configuration.
    #[error("Failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// Configuration validation failed.
    #[error("Config validation failed: {0}")]
    ValidationError(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Price grid construction.
    #[serde(default)]
    pub grid: GridConfig,
    /// Curve analysis tolerances.
    #[serde(default)]
    pub analysis: AnalysisConfig,
    /// Adjustment advisor thresholds.
    #[serde(default)]
    pub advisor: AdvisorConfig,
    /// Option chain catalog source.
    #[serde(default)]
    pub catalog: CatalogConfig,
    /// Logging and metrics.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

// ============================================
// Configuration Loading
// ============================================

/// Load configuration from a YAML file with environment variable interpolation.
///
/// The path is `path`, else `$STRATEGY_ENGINE_CONFIG`, else `config.yaml`.
/// A missing file yields the defaults.
///
/// # Errors
///
/// Returns a `ConfigError` if the file exists but cannot be read, parsed, or
/// validated.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let path = resolve_config_path(path);

    let contents = match std::fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!(path = %path, "Config file not found, using defaults");
            let config = Config::default();
            validate_config(&config)?;
            return Ok(config);
        }
        Err(source) => return Err(ConfigError::ReadError { path, source }),
    };

    load_config_from_string(&contents)
}

/// Config file path: `path`, else `$STRATEGY_ENGINE_CONFIG`, else `config.yaml`.
#[must_use]
pub fn resolve_config_path(path: Option<&str>) -> String {
    path.map_or_else(
        || std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string()),
        str::to_string,
    )
}

/// Load configuration from a YAML string (useful for testing).
///
/// # Errors
///
/// Returns a `ConfigError` if the YAML cannot be parsed or validated.
pub fn load_config_from_string(yaml: &str) -> Result<Config, ConfigError> {
    let interpolated = interpolate_env_vars(yaml);
    let config: Config = if interpolated.trim().is_empty() {
        Config::default()
    } else {
        serde_yaml_bw::from_str(&interpolated)?
    };
    validate_config(&config)?;
    Ok(config)
}

/// Interpolate environment variables in a string.
///
/// Supports both `${VAR}` and `${VAR:-default}` syntax.
#[allow(clippy::expect_used)] // Regex is compile-time constant
fn interpolate_env_vars(input: &str) -> String {
    use std::sync::OnceLock;

    static ENV_VAR_REGEX: OnceLock<regex::Regex> = OnceLock::new();

    let re = ENV_VAR_REGEX.get_or_init(|| {
        regex::Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
            .expect("env var regex is valid")
    });

    re.replace_all(input, |cap: &regex::Captures<'_>| {
        let default_value = cap.get(2).map_or("", |m| m.as_str());
        match std::env::var(&cap[1]) {
            Ok(v) if !v.is_empty() => v,
            _ => default_value.to_string(),
        }
    })
    .into_owned()
}

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError(message.into())
}

/// Validate configuration values.
fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let grid = &config.grid;
    if !(0.0..=1.0).contains(&grid.lower_band) {
        return Err(invalid("grid.lower_band must be between 0.0 and 1.0"));
    }
    if !grid.upper_band.is_finite() || grid.upper_band < 1.0 || grid.upper_band <= grid.lower_band {
        return Err(invalid(
            "grid.upper_band must be at least 1.0 and above grid.lower_band",
        ));
    }
    if !grid.strike_margin.is_finite() || grid.strike_margin < 0.0 {
        return Err(invalid("grid.strike_margin must be non-negative"));
    }
    if !(grid.step_fraction > 0.0 && grid.step_fraction < 1.0) {
        return Err(invalid("grid.step_fraction must be between 0.0 and 1.0 (exclusive)"));
    }
    if grid.max_points < 2 {
        return Err(invalid("grid.max_points must be at least 2"));
    }

    let analysis = &config.analysis;
    if !(analysis.slope_epsilon.is_finite() && analysis.slope_epsilon > 0.0) {
        return Err(invalid("analysis.slope_epsilon must be positive"));
    }
    if !(analysis.zero_tolerance.is_finite() && analysis.zero_tolerance >= 0.0) {
        return Err(invalid("analysis.zero_tolerance must be non-negative"));
    }
    if analysis.tail_points < 2 {
        return Err(invalid("analysis.tail_points must be at least 2"));
    }
    if analysis.parallel_threshold == 0 {
        return Err(invalid("analysis.parallel_threshold must be positive"));
    }

    let advisor = &config.advisor;
    if !(advisor.slope_threshold.is_finite() && advisor.slope_threshold > 0.0) {
        return Err(invalid("advisor.slope_threshold must be positive"));
    }
    for (name, value) in [
        ("advisor.proximity_pct", advisor.proximity_pct),
        ("advisor.moneyness_buffer", advisor.moneyness_buffer),
        ("advisor.balance_epsilon", advisor.balance_epsilon),
    ] {
        if !(0.0..1.0).contains(&value) {
            return Err(invalid(format!("{name} must be in [0.0, 1.0)")));
        }
    }

    if config.server.body_limit_bytes == 0 {
        return Err(invalid("server.body_limit_bytes must be positive"));
    }

    let valid_formats = ["json", "pretty"];
    let format = config.observability.logging.format.as_str();
    if !valid_formats.contains(&format) {
        return Err(invalid(format!(
            "observability.logging.format must be one of: {valid_formats:?}"
        )));
    }

    let metrics = &config.observability.metrics;
    if metrics.enabled && metrics.port == config.server.http_port {
        return Err(invalid(
            "observability.metrics.port and server.http_port must be different",
        ));
    }

    Ok(())
}
