// src/api.rs
//! Thin JSON surface over the aggregation engine. Only `InvalidRequest`
//! maps to a client error; internal scoring defects are a 500.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tower_http::cors::CorsLayer;

use crate::engine::Aggregator;
use crate::error::AggregateError;

#[derive(Clone)]
pub struct AppState {
    pub aggregator: Arc<Aggregator>,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/trends", get(get_trends))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(serde::Deserialize)]
struct TrendsQuery {
    source_type: String,
    #[serde(default)]
    topic: Option<String>,
    #[serde(default)]
    limit: Option<usize>,
}

#[derive(serde::Serialize)]
struct ErrorBody {
    error: String,
}

async fn get_trends(
    State(state): State<AppState>,
    Query(q): Query<TrendsQuery>,
) -> Response {
    match state
        .aggregator
        .fetch_trends(&q.source_type, q.topic.as_deref(), q.limit)
        .await
    {
        Ok(items) => (StatusCode::OK, Json(items)).into_response(),
        Err(e @ AggregateError::InvalidRequest(_)) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorBody {
                error: e.to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "internal aggregation failure");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody {
                    error: "internal error".to_string(),
                }),
            )
                .into_response()
        }
    }
}
