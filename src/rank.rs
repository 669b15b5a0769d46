// src/rank.rs
//! Final ordering and truncation, plus the defensive score-range check.

use crate::error::AggregateError;
use crate::model::TrendItem;

/// Sort descending by score, tie-break by `published_at` descending (newer
/// first), then by `source_id` ascending for determinism, and truncate to
/// `limit`. Fewer items than `limit` come back as-is; never padded.
///
/// Any score outside [0,1] (or NaN) fails with `ScoreOutOfRange` before
/// sorting: the scorer clamps its output, so an out-of-range value here is
/// an internal bug, not bad input.
pub fn rank_and_limit(
    mut items: Vec<TrendItem>,
    limit: usize,
) -> Result<Vec<TrendItem>, AggregateError> {
    for it in &items {
        if !(0.0..=1.0).contains(&it.relevance_score) || it.relevance_score.is_nan() {
            return Err(AggregateError::ScoreOutOfRange {
                source_id: it.source_id.clone(),
                score: it.relevance_score,
            });
        }
    }

    items.sort_by(|a, b| {
        b.relevance_score
            .total_cmp(&a.relevance_score)
            .then_with(|| b.published_at.cmp(&a.published_at))
            .then_with(|| a.source_id.cmp(&b.source_id))
    });
    items.truncate(limit);
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SourceType;
    use chrono::{TimeZone, Utc};

    fn item(id: &str, score: f64, ts: i64) -> TrendItem {
        TrendItem {
            source_id: id.into(),
            source_type: SourceType::Social,
            title: "t".into(),
            summary: String::new(),
            url: format!("https://x/{id}"),
            published_at: Utc.timestamp_opt(ts, 0).unwrap(),
            relevance_score: score,
            topics: vec![],
        }
    }

    #[test]
    fn sorts_by_score_then_recency_then_id() {
        let items = vec![
            item("b", 0.5, 100),
            item("a", 0.5, 100),
            item("c", 0.9, 50),
            item("d", 0.5, 200),
        ];
        let out = rank_and_limit(items, 10).unwrap();
        let ids: Vec<_> = out.iter().map(|i| i.source_id.as_str()).collect();
        assert_eq!(ids, vec!["c", "d", "a", "b"]);
    }

    #[test]
    fn truncates_to_limit_but_never_pads() {
        let items = vec![item("a", 0.9, 1), item("b", 0.8, 1), item("c", 0.7, 1)];
        assert_eq!(rank_and_limit(items.clone(), 2).unwrap().len(), 2);
        assert_eq!(rank_and_limit(items, 10).unwrap().len(), 3);
        assert!(rank_and_limit(vec![], 5).unwrap().is_empty());
    }

    #[test]
    fn out_of_range_or_nan_scores_are_a_defect() {
        let too_big = vec![item("a", 1.2, 1)];
        assert!(matches!(
            rank_and_limit(too_big, 5).unwrap_err(),
            AggregateError::ScoreOutOfRange { score, .. } if score > 1.0
        ));

        let nan = vec![item("a", f64::NAN, 1)];
        assert!(matches!(
            rank_and_limit(nan, 5).unwrap_err(),
            AggregateError::ScoreOutOfRange { .. }
        ));
    }
}
