// src/error.rs
//! Error taxonomy. Only `AggregateError` escapes to callers; source and
//! per-item failures are recovered inside the engine and degrade to fewer
//! (or zero) items.

use thiserror::Error;

/// Adapter-level failure. Non-fatal to an aggregation run: the engine logs
/// it and proceeds with zero items from that source.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("source unavailable: {0}")]
    Unavailable(String),
    #[error("source returned a malformed payload: {0}")]
    Malformed(String),
}

/// A single raw item could not be coerced into the canonical shape.
/// Drops only the offending item, never the batch.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("no title and no fallback text")]
    MissingText,
    #[error("missing link")]
    MissingLink,
    #[error("missing or unparsable timestamp")]
    BadTimestamp,
    #[error("timestamp is {0}s in the future, beyond skew tolerance")]
    FutureTimestamp(i64),
}

/// Failures surfaced to the caller of `fetch_trends`.
#[derive(Debug, Error)]
pub enum AggregateError {
    /// Malformed caller input. Fatal to the call, no partial work attempted.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    /// Internal invariant violation in scoring; a logic bug, not bad input.
    #[error("relevance score {score} out of [0,1] for item {source_id}")]
    ScoreOutOfRange { source_id: String, score: f64 },
}
