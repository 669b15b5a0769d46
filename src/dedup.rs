// src/dedup.rs
//! Near-duplicate collapsing: the same story reported by multiple raw
//! entries survives as one representative item. Runs strictly before
//! scoring so duplicate signal is never double-counted.

use once_cell::sync::OnceCell;
use regex::Regex;
use strsim::normalized_levenshtein;

use crate::config::DedupConfig;
use crate::model::TrendItem;

/// Normalized form used for title comparison: lowercase, punctuation
/// stripped, whitespace collapsed.
pub fn title_key(title: &str) -> String {
    static RE_PUNCT: OnceCell<Regex> = OnceCell::new();
    let re_punct = RE_PUNCT.get_or_init(|| Regex::new(r"(?u)[^\w\s]+").unwrap());
    static RE_WS: OnceCell<Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| Regex::new(r"\s+").unwrap());

    let lowered = title.to_lowercase();
    let stripped = re_punct.replace_all(&lowered, " ");
    re_ws.replace_all(&stripped, " ").trim().to_string()
}

fn titles_match(a: &TrendItem, b: &TrendItem, cfg: &DedupConfig) -> bool {
    let (ka, kb) = (title_key(&a.title), title_key(&b.title));
    if ka == kb && !ka.is_empty() {
        return true;
    }
    // Optional fuzzy mode; at the default similarity of 1.0 only exact
    // normalized matches qualify, which the branch above already handled.
    cfg.title_similarity < 1.0 && normalized_levenshtein(&ka, &kb) >= cfg.title_similarity
}

fn is_duplicate(a: &TrendItem, b: &TrendItem, cfg: &DedupConfig) -> bool {
    if a.source_type != b.source_type {
        return false;
    }
    if a.url == b.url {
        return true;
    }
    let gap = (a.published_at - b.published_at).num_seconds().abs();
    gap <= cfg.window_secs && titles_match(a, b, cfg)
}

/// Merge a duplicate pair: keep the item with the richer (longer, non-empty)
/// summary, tie-break on the earlier `published_at`, and union the loser's
/// topics order-stably into the survivor.
fn merge(a: TrendItem, b: TrendItem) -> TrendItem {
    let a_wins = match a.summary.len().cmp(&b.summary.len()) {
        std::cmp::Ordering::Greater => true,
        std::cmp::Ordering::Less => false,
        std::cmp::Ordering::Equal => a.published_at <= b.published_at,
    };
    let (mut keeper, loser) = if a_wins { (a, b) } else { (b, a) };
    for topic in loser.topics {
        if !keeper.topics.contains(&topic) {
            keeper.topics.push(topic);
        }
    }
    keeper
}

/// Collapse duplicates, order-preserving over surviving representatives:
/// each survivor sits at the position of its group's first occurrence.
pub fn deduplicate(items: Vec<TrendItem>, cfg: &DedupConfig) -> Vec<TrendItem> {
    let mut survivors: Vec<TrendItem> = Vec::with_capacity(items.len());
    for item in items {
        match survivors.iter().position(|kept| is_duplicate(kept, &item, cfg)) {
            Some(i) => {
                let kept = survivors[i].clone();
                survivors[i] = merge(kept, item);
            }
            None => survivors.push(item),
        }
    }
    survivors
}
