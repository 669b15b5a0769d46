// src/config.rs
//! Engine configuration: every tunable the pipeline uses (limits, timeouts,
//! dedup window, decay constants, topic weights) lives here and is passed
//! explicitly into the components, never read as ambient global state.

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

const ENV_PATH: &str = "TREND_CONFIG_PATH";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Hard cap on the caller-supplied `limit`, protecting upstream adapters
    /// from unbounded fan-out.
    pub max_limit: usize,
    /// Request-level timeout for one adapter fetch, in seconds.
    pub fetch_timeout_secs: u64,
    /// Tolerated clock skew for "published in the future" items, in seconds.
    pub clock_skew_secs: i64,
    pub sources: SourcesConfig,
    pub dedup: DedupConfig,
    pub scoring: ScoringConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_limit: 50,
            fetch_timeout_secs: 10,
            clock_skew_secs: 300,
            sources: SourcesConfig::default(),
            dedup: DedupConfig::default(),
            scoring: ScoringConfig::default(),
        }
    }
}

/// Upstream feed endpoints for the HTTP adapters.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    pub news_url: Option<String>,
    pub social_url: Option<String>,
    pub market_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DedupConfig {
    /// Two similarly-titled items within this window are the same event.
    pub window_secs: i64,
    /// Normalized-title similarity at or above which titles "match".
    /// 1.0 means exact match of the normalized forms.
    pub title_similarity: f64,
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            window_secs: 24 * 3600,
            title_similarity: 1.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Recency decay half-life in seconds: score halves per elapsed period.
    pub half_life_secs: i64,
    /// Items never score below this purely from age.
    pub recency_floor: f64,
    /// Weight of the text-overlap component when a topic is supplied.
    pub topic_weight: f64,
    /// Weight of the recency component when a topic is supplied.
    pub recency_weight: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            half_life_secs: 48 * 3600,
            recency_floor: 0.05,
            topic_weight: 0.7,
            recency_weight: 0.3,
        }
    }
}

/// Load config from an explicit path. Supports TOML or JSON formats.
pub fn load_from(path: &Path) -> Result<EngineConfig> {
    let content =
        fs::read_to_string(path).with_context(|| format!("reading config from {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    parse_config(&content, ext.as_str())
}

/// Load config using env var + fallbacks:
/// 1) $TREND_CONFIG_PATH
/// 2) config/trend_aggregator.toml
/// 3) config/trend_aggregator.json
/// 4) built-in defaults
pub fn load_default() -> Result<EngineConfig> {
    if let Ok(p) = std::env::var(ENV_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return load_from(&pb);
        } else {
            return Err(anyhow!("TREND_CONFIG_PATH points to non-existent path"));
        }
    }
    let toml_p = PathBuf::from("config/trend_aggregator.toml");
    if toml_p.exists() {
        return load_from(&toml_p);
    }
    let json_p = PathBuf::from("config/trend_aggregator.json");
    if json_p.exists() {
        return load_from(&json_p);
    }
    Ok(EngineConfig::default())
}

fn parse_config(s: &str, hint_ext: &str) -> Result<EngineConfig> {
    // Try TOML first if hinted or the content looks like toml.
    let try_toml = hint_ext == "toml" || s.contains('=');
    if try_toml {
        if let Ok(v) = toml::from_str::<EngineConfig>(s) {
            return Ok(v);
        }
    }
    if let Ok(v) = serde_json::from_str::<EngineConfig>(s) {
        return Ok(v);
    }
    if !try_toml {
        if let Ok(v) = toml::from_str::<EngineConfig>(s) {
            return Ok(v);
        }
    }
    Err(anyhow!("unsupported config format"))
}
