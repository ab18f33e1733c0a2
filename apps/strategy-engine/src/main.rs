//! Strategy Engine Binary
//!
//! Serves the strategy simulate/adjust API and the option chain catalog.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin strategy-engine
//! ```
//!
//! # Environment Variables
//!
//! - `STRATEGY_ENGINE_CONFIG`: Config file path (default: config.yaml)
//! - `RUST_LOG`: Log filter (overrides `observability.logging.level`)
//!
//! Any `${VAR}` or `${VAR:-default}` reference inside the config file is
//! resolved from the environment, which is seeded from `.env` if present.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use strategy_engine::application::services::StrategyService;
use strategy_engine::config::{Config, load_config, resolve_config_path};
use strategy_engine::infrastructure::http::{AppState, create_router};
use strategy_engine::infrastructure::option_chain::JsonFileOptionChain;
use strategy_engine::observability::{MetricsConfig, init_metrics, init_tracing};
use tokio::net::TcpListener;
use tokio::signal;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();

    let config = load_config(None).context("failed to load configuration")?;
    init_tracing(&config.observability.logging).context("failed to initialize tracing")?;

    let config_path = resolve_config_path(None);
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %config_path,
        config_found = std::path::Path::new(&config_path).exists(),
        "Starting strategy engine"
    );

    if config.observability.metrics.enabled {
        let metrics = MetricsConfig::from_config(&config)?;
        init_metrics(&metrics)?;
    }

    let catalog = JsonFileOptionChain::load(&config.catalog.path).await;
    let state = AppState {
        service: Arc::new(StrategyService::from_config(&config)),
        catalog: Arc::new(catalog),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };
    let app = create_router(state, config.server.body_limit_bytes);

    let addr = http_addr(&config)?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!(%addr, "HTTP server listening");
    tracing::info!("  GET  /");
    tracing::info!("  GET  /health");
    tracing::info!("  GET  /options");
    tracing::info!("  POST /strategy/simulate");
    tracing::info!("  POST /strategy/adjust");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    tracing::info!("Strategy engine stopped");
    Ok(())
}

fn http_addr(config: &Config) -> anyhow::Result<SocketAddr> {
    let raw = format!("{}:{}", config.server.bind_address, config.server.http_port);
    raw.parse()
        .with_context(|| format!("invalid server address '{raw}'"))
}

/// Load `.env` from the working directory or the nearest ancestor.
fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    if let Ok(cwd) = std::env::current_dir() {
        let mut dir = cwd.as_path();
        while let Some(parent) = dir.parent() {
            let env_path = parent.join(".env");
            if env_path.exists() {
                let _ = dotenvy::from_path(&env_path);
                return;
            }
            dir = parent;
        }
    }
}

/// Wait for shutdown signal (SIGTERM or SIGINT).
#[allow(clippy::expect_used)]
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("signal handler installation is critical for graceful shutdown");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("SIGTERM handler installation is critical for graceful shutdown")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, initiating shutdown");
        }
    }
}
