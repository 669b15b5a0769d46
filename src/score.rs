// src/score.rs
//! Relevance scoring: a bounded [0,1] blend of recency decay and, when the
//! caller supplies a topic, token overlap against title + summary + topics.

use chrono::{DateTime, Utc};
use once_cell::sync::OnceCell;
use regex::Regex;

use crate::config::ScoringConfig;
use crate::model::TrendItem;

/// Lowercased word tokens; `\w` with Unicode enabled.
pub fn tokenize(input: &str) -> Vec<String> {
    static RE_WORD: OnceCell<Regex> = OnceCell::new();
    let re = RE_WORD.get_or_init(|| Regex::new(r"(?u)\b\w+\b").unwrap());
    re.find_iter(input)
        .map(|m| m.as_str().to_lowercase())
        .collect()
}

/// Recency component: half-life decay over elapsed time with a floor, so
/// items never score exactly 0 purely from age. Clamped into [0,1].
pub fn recency_score(age_secs: i64, cfg: &ScoringConfig) -> f64 {
    let age = age_secs.max(0) as f64;
    let half_life = cfg.half_life_secs.max(1) as f64;
    let decay = 0.5_f64.powf(age / half_life);
    (cfg.recency_floor + (1.0 - cfg.recency_floor) * decay).clamp(0.0, 1.0)
}

/// Text component: fraction of topic tokens found among the item's title,
/// summary, and topic tags. An exact (case-insensitive) match of the whole
/// topic against a tag short-circuits to 1.0.
fn text_score(item: &TrendItem, topic: &str) -> f64 {
    let topic_trimmed = topic.trim();
    if item
        .topics
        .iter()
        .any(|t| t.trim().eq_ignore_ascii_case(topic_trimmed))
    {
        return 1.0;
    }

    let query = tokenize(topic_trimmed);
    if query.is_empty() {
        return 0.0;
    }

    let mut haystack = tokenize(&item.title);
    haystack.extend(tokenize(&item.summary));
    for tag in &item.topics {
        haystack.extend(tokenize(tag));
    }

    let hits = query.iter().filter(|q| haystack.contains(q)).count();
    hits as f64 / query.len() as f64
}

/// Compute the relevance score for one item. Always lands in [0,1].
///
/// Without a topic the score is recency alone; with a topic it is the
/// configured weighted blend of text overlap and recency.
pub fn score(
    item: &TrendItem,
    topic: Option<&str>,
    now: DateTime<Utc>,
    cfg: &ScoringConfig,
) -> f64 {
    let recency = recency_score(item.age_secs(now), cfg);
    let out = match topic.map(str::trim).filter(|t| !t.is_empty()) {
        None => recency,
        Some(topic) => cfg.topic_weight * text_score(item, topic) + cfg.recency_weight * recency,
    };
    out.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SourceType;
    use chrono::{Duration, TimeZone, Utc};

    fn item(title: &str, summary: &str, topics: &[&str], age_secs: i64) -> (TrendItem, DateTime<Utc>) {
        let now = Utc.with_ymd_and_hms(2026, 8, 1, 0, 0, 0).unwrap();
        let it = TrendItem {
            source_id: "s1".into(),
            source_type: SourceType::News,
            title: title.into(),
            summary: summary.into(),
            url: "https://x/1".into(),
            published_at: now - Duration::seconds(age_secs),
            relevance_score: 0.0,
            topics: topics.iter().map(|s| s.to_string()).collect(),
        };
        (it, now)
    }

    #[test]
    fn fresh_item_without_topic_scores_near_one() {
        let cfg = ScoringConfig::default();
        let (it, now) = item("Fresh", "", &[], 0);
        let s = score(&it, None, now, &cfg);
        assert!((s - 1.0).abs() < 1e-9);
    }

    #[test]
    fn recency_halves_per_half_life_and_never_hits_zero() {
        let cfg = ScoringConfig::default();
        let one = recency_score(cfg.half_life_secs, &cfg);
        let two = recency_score(2 * cfg.half_life_secs, &cfg);
        // Decay above the floor halves each period.
        let excess_one = one - cfg.recency_floor;
        let excess_two = two - cfg.recency_floor;
        assert!((excess_two - excess_one / 2.0).abs() < 1e-9);

        let ancient = recency_score(1000 * cfg.half_life_secs, &cfg);
        assert!(ancient >= cfg.recency_floor);
        assert!(ancient > 0.0);
    }

    #[test]
    fn topic_blend_uses_configured_weights() {
        let cfg = ScoringConfig::default();
        let (it, now) = item("AI models ship faster", "", &[], 0);
        // Full token overlap + fresh item: 0.7 * 1.0 + 0.3 * 1.0.
        let s = score(&it, Some("ai models"), now, &cfg);
        assert!((s - 1.0).abs() < 1e-9);

        let (miss, now) = item("Housing market cools", "", &[], 0);
        let s = score(&miss, Some("quantum computing"), now, &cfg);
        // No overlap: recency component only.
        assert!((s - 0.3).abs() < 1e-9);
    }

    #[test]
    fn exact_tag_match_short_circuits_text_component() {
        let cfg = ScoringConfig::default();
        let (tagged, now) = item("Unrelated headline", "", &["Fashion"], 3600);
        let (untagged, _) = item("Unrelated headline", "", &["sports"], 3600);
        let s_tagged = score(&tagged, Some("fashion"), now, &cfg);
        let s_untagged = score(&untagged, Some("fashion"), now, &cfg);
        assert!(s_tagged > s_untagged);
        assert!((s_tagged - (0.7 + 0.3 * recency_score(3600, &cfg))).abs() < 1e-9);
    }

    #[test]
    fn partial_overlap_scores_between_zero_and_full() {
        let cfg = ScoringConfig::default();
        let (it, now) = item("Rust release notes", "async improvements", &[], 0);
        let s = score(&it, Some("rust compiler"), now, &cfg);
        // One of two query tokens present: 0.7 * 0.5 + 0.3.
        assert!((s - 0.65).abs() < 1e-9);
    }

    #[test]
    fn blank_topic_is_treated_as_absent() {
        let cfg = ScoringConfig::default();
        let (it, now) = item("Anything", "", &[], 0);
        assert_eq!(score(&it, Some("   "), now, &cfg), score(&it, None, now, &cfg));
    }
}
