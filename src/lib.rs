// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod api;
pub mod config;
pub mod dedup;
pub mod engine;
pub mod error;
pub mod metrics;
pub mod model;
pub mod normalize;
pub mod rank;
pub mod score;
pub mod sources;

// ---- Re-exports for stable public API ----
pub use crate::config::EngineConfig;
pub use crate::engine::{Aggregator, IngestReport};
pub use crate::error::{AggregateError, NormalizeError, SourceError};
pub use crate::model::{AggregationRequest, RawItem, SourceType, TrendItem};
// Convenient access to the router: `trend_aggregator::api::create_router` or
// `trend_aggregator::create_router`.
pub use crate::api::{create_router, AppState};
