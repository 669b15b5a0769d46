// src/metrics.rs
//! Prometheus wiring: one-time series registration plus the /metrics route.

use axum::{routing::get, Router};
use metrics::{describe_counter, describe_gauge, describe_histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

/// One-time metrics registration (so series show up on /metrics).
pub fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("trends_fetched_total", "Raw items parsed from adapters.");
        describe_counter!(
            "trends_dropped_total",
            "Raw items discarded during normalization."
        );
        describe_counter!("trends_dedup_total", "Items collapsed by deduplication.");
        describe_counter!(
            "trends_source_errors_total",
            "Adapter fetch/parse/timeout failures."
        );
        describe_histogram!("trends_parse_ms", "Adapter payload parse time in milliseconds.");
        describe_gauge!("trends_last_run_ts", "Unix ts of the last aggregation run.");
    });
}

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the Prometheus recorder; call once at startup, before the
    /// first aggregation run.
    pub fn init() -> Self {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .expect("prometheus: install recorder");
        ensure_metrics_described();
        Self { handle }
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}
