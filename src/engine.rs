// src/engine.rs
//! Aggregation engine: validates the request, dispatches to the adapter for
//! the requested source type, and runs the pipeline
//! normalize -> dedup -> score -> rank. Upstream failures degrade to fewer
//! or zero items; only invalid requests and internal scoring defects escape.

use chrono::Utc;
use metrics::{counter, gauge};
use std::time::Duration;

use crate::config::EngineConfig;
use crate::dedup::deduplicate;
use crate::error::{AggregateError, SourceError};
use crate::metrics::ensure_metrics_described;
use crate::model::{AggregationRequest, SourceType, TrendItem};
use crate::normalize::{normalize, short_hash};
use crate::rank::rank_and_limit;
use crate::score::score;
use crate::sources::{MarketAdapter, NewsAdapter, SocialAdapter, SourceAdapter};

/// Per-run accounting, for logs and telemetry.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct IngestReport {
    pub fetched: usize,
    pub dropped: usize,
    pub deduped: usize,
    pub source_failed: bool,
}

pub struct Aggregator {
    adapters: Vec<Box<dyn SourceAdapter>>,
    cfg: EngineConfig,
}

impl Aggregator {
    pub fn new(adapters: Vec<Box<dyn SourceAdapter>>, cfg: EngineConfig) -> Self {
        Self { adapters, cfg }
    }

    /// Wire up the three HTTP adapters from the configured feed endpoints.
    /// A source without an endpoint is simply absent and yields zero items.
    pub fn from_config(cfg: EngineConfig) -> Self {
        let mut adapters: Vec<Box<dyn SourceAdapter>> = Vec::new();
        if let Some(url) = cfg.sources.news_url.clone() {
            adapters.push(Box::new(NewsAdapter::from_url(url)));
        }
        if let Some(url) = cfg.sources.social_url.clone() {
            adapters.push(Box::new(SocialAdapter::from_url(url)));
        }
        if let Some(url) = cfg.sources.market_url.clone() {
            adapters.push(Box::new(MarketAdapter::from_url(url)));
        }
        Self::new(adapters, cfg)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.cfg
    }

    /// Public entry point: fetch, normalize, dedup, score, and rank trends
    /// for one source type. An empty result is a valid, successful outcome;
    /// `limit` of `None` means the default of 10.
    pub async fn fetch_trends(
        &self,
        source_type: &str,
        topic: Option<&str>,
        limit: Option<usize>,
    ) -> Result<Vec<TrendItem>, AggregateError> {
        self.fetch_trends_with_report(source_type, topic, limit)
            .await
            .map(|(items, _)| items)
    }

    /// Same pipeline, also returning the per-run accounting.
    pub async fn fetch_trends_with_report(
        &self,
        source_type: &str,
        topic: Option<&str>,
        limit: Option<usize>,
    ) -> Result<(Vec<TrendItem>, IngestReport), AggregateError> {
        ensure_metrics_described();
        let request = self.validate(source_type, topic, limit)?;

        let mut report = IngestReport::default();
        let raw = self.fetch_raw(&request, &mut report).await;
        report.fetched = raw.len();

        let now = Utc::now();

        // Normalize, dropping (and logging) items that cannot be coerced.
        let mut items = Vec::with_capacity(raw.len());
        for r in raw {
            match normalize(r.clone(), request.source_type, now, self.cfg.clock_skew_secs) {
                Ok(it) => items.push(it),
                Err(e) => {
                    report.dropped += 1;
                    counter!("trends_dropped_total").increment(1);
                    let id = short_hash(r.link.as_deref().unwrap_or_default());
                    tracing::warn!(%id, error = %e, source_type = %request.source_type, "dropping raw item");
                }
            }
        }

        let before = items.len();
        let items = deduplicate(items, &self.cfg.dedup);
        report.deduped = before - items.len();
        counter!("trends_dedup_total").increment(report.deduped as u64);

        // Score annotation happens exactly once per surviving item.
        let mut scored = items;
        for it in &mut scored {
            it.relevance_score = score(it, request.topic.as_deref(), now, &self.cfg.scoring);
        }

        let ranked = rank_and_limit(scored, request.limit)?;

        gauge!("trends_last_run_ts").set(now.timestamp() as f64);
        tracing::info!(
            source_type = %request.source_type,
            fetched = report.fetched,
            dropped = report.dropped,
            deduped = report.deduped,
            returned = ranked.len(),
            "aggregation run finished"
        );
        Ok((ranked, report))
    }

    fn validate(
        &self,
        source_type: &str,
        topic: Option<&str>,
        limit: Option<usize>,
    ) -> Result<AggregationRequest, AggregateError> {
        let source_type = SourceType::parse(source_type).ok_or_else(|| {
            AggregateError::InvalidRequest(format!(
                "unknown source_type '{source_type}' (expected news, social, or market)"
            ))
        })?;

        let limit = limit.unwrap_or(AggregationRequest::DEFAULT_LIMIT);
        if limit == 0 {
            return Err(AggregateError::InvalidRequest("limit must be positive".into()));
        }
        if limit > self.cfg.max_limit {
            return Err(AggregateError::InvalidRequest(format!(
                "limit {limit} exceeds the maximum of {}",
                self.cfg.max_limit
            )));
        }

        Ok(AggregationRequest {
            source_type,
            topic: topic.map(str::trim).filter(|t| !t.is_empty()).map(String::from),
            limit,
        })
    }

    /// Call the single adapter for the requested source type, bounded by the
    /// request-level timeout. Any failure here is recovered: logged, counted,
    /// and treated as zero items from that source.
    async fn fetch_raw(
        &self,
        request: &AggregationRequest,
        report: &mut IngestReport,
    ) -> Vec<crate::model::RawItem> {
        let Some(adapter) = self
            .adapters
            .iter()
            .find(|a| a.source_type() == request.source_type)
        else {
            tracing::warn!(source_type = %request.source_type, "no adapter configured");
            report.source_failed = true;
            return Vec::new();
        };

        // Dedup downstream can only shrink the batch, so over-fetch a bit.
        let limit_hint = request.limit.saturating_mul(3);
        let timeout = Duration::from_secs(self.cfg.fetch_timeout_secs);
        let fetched =
            tokio::time::timeout(timeout, adapter.fetch(request.topic.as_deref(), limit_hint))
                .await
                .unwrap_or_else(|_| {
                    Err(SourceError::Unavailable(format!(
                        "{} timed out after {}s",
                        adapter.name(),
                        self.cfg.fetch_timeout_secs
                    )))
                });

        match fetched {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(error = %e, provider = adapter.name(), "source failure, continuing with zero items");
                counter!("trends_source_errors_total").increment(1);
                report.source_failed = true;
                Vec::new()
            }
        }
    }
}
