// src/sources/mod.rs
//! Source adapters: one per upstream family. Each fetches raw records from
//! its provider and maps them into the shared `RawItem` envelope; all
//! canonical coercion happens later in the normalizer.

pub mod market;
pub mod news;
pub mod social;

use crate::error::SourceError;
use crate::model::{RawItem, SourceType};

pub use market::MarketAdapter;
pub use news::NewsAdapter;
pub use social::SocialAdapter;

/// Adapters may return more or fewer items than the hint; it only bounds
/// how much they bother to fetch/parse, never the final result size.
#[async_trait::async_trait]
pub trait SourceAdapter: Send + Sync {
    async fn fetch(
        &self,
        topic: Option<&str>,
        limit_hint: usize,
    ) -> Result<Vec<RawItem>, SourceError>;
    fn name(&self) -> &'static str;
    fn source_type(&self) -> SourceType;
}

/// Where an adapter reads its payload from. Fixture mode feeds a canned
/// payload string (tests, offline runs); Http mode hits the configured feed.
pub(crate) enum Mode {
    Fixture(String),
    Http { url: String, client: reqwest::Client },
}

impl Mode {
    pub(crate) fn http(url: impl Into<String>) -> Self {
        Mode::Http {
            url: url.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Resolve the payload body. Transport failures (connect, timeout,
    /// non-success status, body read) are all `Unavailable`; what the body
    /// *contains* is the adapter's parsing problem.
    pub(crate) async fn body(
        &self,
        provider: &'static str,
        query: &[(&str, String)],
    ) -> Result<String, SourceError> {
        match self {
            Mode::Fixture(s) => Ok(s.clone()),
            Mode::Http { url, client } => {
                let resp = client
                    .get(url)
                    .query(query)
                    .send()
                    .await
                    .and_then(reqwest::Response::error_for_status)
                    .map_err(|e| {
                        tracing::warn!(error = ?e, provider, "provider http error");
                        SourceError::Unavailable(format!("{provider}: {e}"))
                    })?;
                resp.text()
                    .await
                    .map_err(|e| SourceError::Unavailable(format!("{provider} body: {e}")))
            }
        }
    }
}

/// Trim a parsed batch to a sane multiple of the hint so one verbose feed
/// cannot flood the pipeline. Headroom is left for dedup losses downstream.
pub(crate) fn apply_limit_hint(items: &mut Vec<RawItem>, limit_hint: usize) {
    if limit_hint > 0 {
        items.truncate(limit_hint.saturating_mul(4));
    }
}
