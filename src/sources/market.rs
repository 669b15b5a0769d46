// src/sources/market.rs
//! Market adapter: JSON headline feeds keyed by ticker symbol. Timestamps
//! arrive as unix seconds; symbols (declared or `$CASH`-tagged in the
//! headline) become topic tags.

use async_trait::async_trait;
use metrics::{counter, histogram};
use once_cell::sync::OnceCell;
use regex::Regex;
use serde::Deserialize;

use crate::error::SourceError;
use crate::model::{RawItem, SourceType};
use crate::sources::{apply_limit_hint, Mode, SourceAdapter};

#[derive(Debug, Deserialize)]
struct MarketFeed {
    #[serde(default)]
    headlines: Vec<Headline>,
}

#[derive(Debug, Deserialize)]
struct Headline {
    id: Option<String>,
    symbol: Option<String>,
    headline: Option<String>,
    summary: Option<String>,
    url: Option<String>,
    /// Unix seconds.
    timestamp: Option<i64>,
}

/// Extract cashtags like `$DJI`, 1-5 letters, distinct and uppercased
/// without the `$`.
pub fn parse_cashtags(input: &str) -> Vec<String> {
    static RE_TAG: OnceCell<Regex> = OnceCell::new();
    let re = RE_TAG.get_or_init(|| Regex::new(r"(?i)(?P<tag>\$[a-z]{1,5})\b").unwrap());
    let mut tags = Vec::new();
    for caps in re.captures_iter(input) {
        if let Some(m) = caps.name("tag") {
            tags.push(m.as_str()[1..].to_ascii_uppercase());
        }
    }
    tags.sort();
    tags.dedup();
    tags
}

pub struct MarketAdapter {
    mode: Mode,
}

impl MarketAdapter {
    pub fn from_fixture(s: &str) -> Self {
        Self {
            mode: Mode::Fixture(s.to_string()),
        }
    }

    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            mode: Mode::http(url),
        }
    }

    fn parse_items_from_str(s: &str) -> Result<Vec<RawItem>, SourceError> {
        let t0 = std::time::Instant::now();
        let feed: MarketFeed = serde_json::from_str(s)
            .map_err(|e| SourceError::Malformed(format!("market json: {e}")))?;

        let mut out = Vec::with_capacity(feed.headlines.len());
        for h in feed.headlines {
            let mut tags = Vec::new();
            if let Some(sym) = h.symbol.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
                tags.push(sym.to_ascii_uppercase());
            }
            for tag in parse_cashtags(h.headline.as_deref().unwrap_or_default()) {
                if !tags.contains(&tag) {
                    tags.push(tag);
                }
            }
            out.push(RawItem {
                external_id: h.id,
                title: h.headline,
                text: h.summary,
                link: h.url,
                published: h.timestamp.map(|t| t.to_string()),
                tags,
            });
        }

        let ms = t0.elapsed().as_secs_f64() * 1_000.0;
        histogram!("trends_parse_ms").record(ms);
        counter!("trends_fetched_total").increment(out.len() as u64);
        Ok(out)
    }
}

#[async_trait]
impl SourceAdapter for MarketAdapter {
    async fn fetch(
        &self,
        topic: Option<&str>,
        limit_hint: usize,
    ) -> Result<Vec<RawItem>, SourceError> {
        let mut query = vec![("limit", limit_hint.to_string())];
        if let Some(t) = topic {
            query.push(("symbols", t.to_string()));
        }
        let body = self.mode.body(self.name(), &query).await?;
        let mut items = Self::parse_items_from_str(&body)?;
        apply_limit_hint(&mut items, limit_hint);
        Ok(items)
    }

    fn name(&self) -> &'static str {
        "market-headlines"
    }

    fn source_type(&self) -> SourceType {
        SourceType::Market
    }
}
