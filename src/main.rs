//! Trend Aggregator — Binary Entrypoint
//! Boots the Axum HTTP server exposing /trends, /health, and /metrics.

use std::sync::Arc;

use shuttle_axum::ShuttleAxum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use trend_aggregator::api::{create_router, AppState};
use trend_aggregator::config;
use trend_aggregator::engine::Aggregator;
use trend_aggregator::metrics::Metrics;

/// Enable compact tracing logs in development only.
/// Activation requires BOTH:
///   - dev environment (debug build OR SHUTTLE_ENV in {local, development, dev})
///   - TREND_DEV_LOG=1
fn enable_dev_tracing() {
    let dev_flag = std::env::var("TREND_DEV_LOG")
        .ok()
        .is_some_and(|v| v == "1");

    let is_dev_env = cfg!(debug_assertions)
        || matches!(
            std::env::var("SHUTTLE_ENV")
                .unwrap_or_default()
                .to_ascii_lowercase()
                .as_str(),
            "local" | "development" | "dev"
        );

    if !(dev_flag && is_dev_env) {
        return;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("trend_aggregator=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments. This lets
    // TREND_CONFIG_PATH come from .env so config::load_default picks it up.
    let _ = dotenvy::dotenv();

    enable_dev_tracing();

    let cfg = config::load_default().expect("Failed to load engine config");
    let metrics = Metrics::init();

    let state = AppState {
        aggregator: Arc::new(Aggregator::from_config(cfg)),
    };
    let router = create_router(state).merge(metrics.router());

    Ok(router.into())
}
