// tests/api_http.rs
//
// HTTP-level tests for the public API Router without opening sockets.
// We exercise the router directly via tower::ServiceExt::oneshot.
//
// Covered:
// - GET /health
// - GET /trends happy path (fixture-fed adapters)
// - GET /trends with an invalid source_type -> 400

use std::sync::Arc;

use axum::{
    body::{self, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value as Json;
use tower::ServiceExt as _; // for `oneshot`

use trend_aggregator::sources::NewsAdapter;
use trend_aggregator::{create_router, Aggregator, AppState, EngineConfig};

const BODY_LIMIT: usize = 1024 * 1024; // 1MB, safe for tests

fn test_router() -> Router {
    let now = chrono::Utc::now()
        .format("%a, %d %b %Y %H:%M:%S +0000")
        .to_string();
    let feed = format!(
        r#"<?xml version="1.0"?>
<rss version="2.0"><channel><title>Wire</title>
  <item>
    <guid>n-1</guid>
    <title>Markets rally on rate pause</title>
    <link>https://news.test/a</link>
    <pubDate>{now}</pubDate>
    <description>Stocks climbed.</description>
  </item>
</channel></rss>"#
    );
    let aggregator = Aggregator::new(
        vec![Box::new(NewsAdapter::from_fixture(&feed))],
        EngineConfig::default(),
    );
    create_router(AppState {
        aggregator: Arc::new(aggregator),
    })
}

#[tokio::test]
async fn api_health_returns_200_and_ok_body() {
    let app = test_router();

    let req = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .expect("build GET /health");

    let resp = app.oneshot(req).await.expect("oneshot /health");
    assert_eq!(resp.status(), StatusCode::OK);

    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body")
        .to_vec();
    assert_eq!(String::from_utf8(bytes).expect("utf8").trim(), "ok");
}

#[tokio::test]
async fn api_trends_returns_ranked_items_as_json() {
    let app = test_router();

    let req = Request::builder()
        .method("GET")
        .uri("/trends?source_type=news&limit=5")
        .body(Body::empty())
        .expect("build GET /trends");

    let resp = app.oneshot(req).await.expect("oneshot /trends");
    assert_eq!(resp.status(), StatusCode::OK);

    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body");
    let json: Json = serde_json::from_slice(&bytes).expect("json body");
    let items = json.as_array().expect("array body");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["source_type"], "news");
    assert_eq!(items[0]["title"], "Markets rally on rate pause");
}

#[tokio::test]
async fn api_trends_rejects_unknown_source_type_with_400() {
    let app = test_router();

    let req = Request::builder()
        .method("GET")
        .uri("/trends?source_type=weather&limit=5")
        .body(Body::empty())
        .expect("build GET /trends");

    let resp = app.oneshot(req).await.expect("oneshot /trends");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body");
    let json: Json = serde_json::from_slice(&bytes).expect("json body");
    assert!(json["error"].as_str().unwrap().contains("source_type"));
}

#[tokio::test]
async fn api_trends_rejects_zero_limit_with_400() {
    let app = test_router();

    let req = Request::builder()
        .method("GET")
        .uri("/trends?source_type=news&limit=0")
        .body(Body::empty())
        .expect("build GET /trends");

    let resp = app.oneshot(req).await.expect("oneshot /trends");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
