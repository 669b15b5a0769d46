// src/model.rs
//! Canonical data model: source types, raw adapter envelopes, and the
//! normalized Trend Item returned to callers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Upstream families the engine knows how to aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    News,
    Social,
    Market,
}

impl SourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::News => "news",
            SourceType::Social => "social",
            SourceType::Market => "market",
        }
    }

    /// Case-insensitive parse; `None` for anything outside the enum.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "news" => Some(SourceType::News),
            "social" => Some(SourceType::Social),
            "market" => Some(SourceType::Market),
            _ => None,
        }
    }
}

impl std::fmt::Display for SourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source-specific envelope emitted by an adapter, pre-normalization.
///
/// Field names upstream differ per source (RSS `description`, social
/// `content`, market `headline`); adapters map them into this loose bag and
/// the normalizer is the sole consumer that coerces it into a [`TrendItem`]
/// or rejects it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawItem {
    pub external_id: Option<String>,
    pub title: Option<String>,
    pub text: Option<String>,
    pub link: Option<String>,
    /// RFC2822, RFC3339, or unix seconds as a string, depending on source.
    pub published: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Canonical normalized record describing one piece of trend signal.
/// Immutable after creation except for `relevance_score`, which the scorer
/// annotates exactly once before ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendItem {
    pub source_id: String,
    pub source_type: SourceType,
    pub title: String,
    pub summary: String,
    pub url: String,
    pub published_at: DateTime<Utc>,
    pub relevance_score: f64,
    pub topics: Vec<String>,
}

impl TrendItem {
    pub fn age_secs(&self, now: DateTime<Utc>) -> i64 {
        (now - self.published_at).num_seconds().max(0)
    }
}

/// Validated caller input for one aggregation run.
#[derive(Debug, Clone)]
pub struct AggregationRequest {
    pub source_type: SourceType,
    pub topic: Option<String>,
    pub limit: usize,
}

impl AggregationRequest {
    pub const DEFAULT_LIMIT: usize = 10;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_type_parse_accepts_known_values_any_case() {
        assert_eq!(SourceType::parse("news"), Some(SourceType::News));
        assert_eq!(SourceType::parse(" SOCIAL "), Some(SourceType::Social));
        assert_eq!(SourceType::parse("Market"), Some(SourceType::Market));
        assert_eq!(SourceType::parse("weather"), None);
        assert_eq!(SourceType::parse(""), None);
    }

    #[test]
    fn source_type_serializes_lowercase() {
        let s = serde_json::to_string(&SourceType::Market).unwrap();
        assert_eq!(s, r#""market""#);
    }

    #[test]
    fn trend_item_round_trips_with_all_fields() {
        let item = TrendItem {
            source_id: "abc".into(),
            source_type: SourceType::News,
            title: "Title".into(),
            summary: String::new(),
            url: "https://example.test/a".into(),
            published_at: Utc::now(),
            relevance_score: 0.5,
            topics: vec!["ai".into()],
        };
        let json = serde_json::to_value(&item).unwrap();
        for key in [
            "source_id",
            "source_type",
            "title",
            "summary",
            "url",
            "published_at",
            "relevance_score",
            "topics",
        ] {
            assert!(json.get(key).is_some(), "missing key {key}");
        }
    }
}
