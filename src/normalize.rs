// src/normalize.rs
//! Coercion of source-specific raw envelopes into canonical Trend Items.
//! All text cleanup (entity decoding, tag stripping, whitespace collapsing)
//! and timestamp parsing for the pipeline lives here.

use chrono::{DateTime, TimeZone, Utc};
use once_cell::sync::OnceCell;
use regex::Regex;
use time::format_description::well_known::Rfc2822;
use time::OffsetDateTime;

use crate::error::NormalizeError;
use crate::model::{RawItem, SourceType, TrendItem};

/// Max characters kept for a cleaned summary.
const SUMMARY_CAP: usize = 1500;
/// Max characters of summary promoted into a fallback title.
const TITLE_FALLBACK_CAP: usize = 120;

/// Clean free text: decode HTML entities, strip tags, fold smart quotes,
/// collapse whitespace, trim, and cap length.
pub fn clean_text(s: &str) -> String {
    let mut out = html_escape::decode_html_entities(s).to_string();

    static RE_TAGS: OnceCell<Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| Regex::new(r"(?is)</?[^>]+>").unwrap());
    out = re_tags.replace_all(&out, " ").to_string();

    out = out
        .replace(['\u{201C}', '\u{201D}', '\u{00AB}', '\u{00BB}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'");

    static RE_WS: OnceCell<Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| Regex::new(r"\s+").unwrap());
    out = re_ws.replace_all(&out, " ").trim().to_string();

    if out.chars().count() > SUMMARY_CAP {
        out = out.chars().take(SUMMARY_CAP).collect();
    }
    out
}

/// Short, stable hex id derived from a locator; used as `source_id` fallback
/// when the upstream record carries no identifier, and as an anonymized item
/// id in logs.
pub fn short_hash(text: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

/// Parse an upstream timestamp: RFC3339, RFC2822 (RSS `pubDate`), or raw
/// unix seconds.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    // Feeds commonly use the obsolete named zones, which the Rfc2822 parser
    // rejects; fold them into a numeric offset first.
    let rfc2822 = raw
        .strip_suffix(" GMT")
        .or_else(|| raw.strip_suffix(" UTC"))
        .or_else(|| raw.strip_suffix(" UT"))
        .map(|head| format!("{head} +0000"))
        .unwrap_or_else(|| raw.to_string());
    if let Ok(dt) = OffsetDateTime::parse(&rfc2822, &Rfc2822) {
        return Utc.timestamp_opt(dt.unix_timestamp(), 0).single();
    }
    if let Ok(secs) = raw.parse::<i64>() {
        return Utc.timestamp_opt(secs, 0).single();
    }
    None
}

/// Coerce one raw envelope into a canonical item, or reject it.
///
/// Coercion rules: `title` falls back to a truncated summary (never to an
/// empty string; both missing is an error), `summary` may be empty but is
/// always present, `topics` default to an empty list, and the relevance
/// score is left at its unscored placeholder for the scorer to fill.
pub fn normalize(
    raw: RawItem,
    source_type: SourceType,
    now: DateTime<Utc>,
    clock_skew_secs: i64,
) -> Result<TrendItem, NormalizeError> {
    let url = raw
        .link
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(NormalizeError::MissingLink)?
        .to_string();

    let summary = raw.text.as_deref().map(clean_text).unwrap_or_default();

    let title = match raw.title.as_deref().map(clean_text) {
        Some(t) if !t.is_empty() => t,
        _ if !summary.is_empty() => truncate_chars(&summary, TITLE_FALLBACK_CAP),
        _ => return Err(NormalizeError::MissingText),
    };

    let published_raw = raw.published.as_deref().ok_or(NormalizeError::BadTimestamp)?;
    let published_at = parse_timestamp(published_raw).ok_or(NormalizeError::BadTimestamp)?;
    let ahead = (published_at - now).num_seconds();
    let published_at = if ahead > clock_skew_secs {
        return Err(NormalizeError::FutureTimestamp(ahead));
    } else if ahead > 0 {
        // Inside tolerance: clamp so downstream recency math never sees a
        // negative age.
        now
    } else {
        published_at
    };

    let source_id = raw
        .external_id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| short_hash(&url));

    let topics = raw
        .tags
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();

    Ok(TrendItem {
        source_id,
        source_type,
        title,
        summary,
        url,
        published_at,
        relevance_score: 0.0,
        topics,
    })
}

fn truncate_chars(s: &str, cap: usize) -> String {
    if s.chars().count() <= cap {
        s.to_string()
    } else {
        s.chars().take(cap).collect()
    }
}
