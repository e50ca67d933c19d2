use axum::body::{to_bytes, Body};
use axum::http::Request;
use serde_json::{json, Value};
use tower::ServiceExt;

use super::*;

const BODY_LIMIT: usize = 64 * 1024;

fn dev_app() -> Router {
    let state = AppState {
        analyzer: Arc::new(Analyzer::default()),
    };
    build_app(state, BODY_LIMIT)
}

fn post_feed(body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/v1/analyze-feed")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

async fn json_body(response: axum::response::Response) -> Value {
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    serde_json::from_slice(&body).expect("json parse")
}

fn sample_payload(window: u64) -> Value {
    json!({
        "messages": [
            {
                "id": "msg_001",
                "content": "Adorei o produto!",
                "timestamp": "2025-09-10T10:00:00Z",
                "user_id": "user_123",
                "hashtags": ["#produto"],
                "reactions": 10,
                "shares": 2,
                "views": 100
            },
            {
                "id": "msg_002",
                "content": "Não gostei do atendimento",
                "timestamp": "2025-09-10T09:58:00Z",
                "user_id": "user_456",
                "hashtags": ["#atendimento"],
                "reactions": 1,
                "shares": 0,
                "views": 50
            }
        ],
        "time_window_minutes": window
    })
}

#[test]
fn api_error_validation_error_maps_to_bad_request() {
    let response = ApiError::new("req-1", "validation_error", "invalid input").into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[test]
fn api_error_unsupported_window_maps_to_unprocessable() {
    let response = ApiError::with_reason(
        "req-1",
        "unsupported_time_window",
        "UNSUPPORTED_TIME_WINDOW",
        "not supported",
    )
    .into_response();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[test]
fn error_body_omits_missing_reason() {
    let json = serde_json::to_value(ApiError::new("req-1", "internal_error", "boom")).expect("json");
    assert!(json["error"].get("reason").is_none());
}

#[tokio::test]
async fn health_reports_lexicon_version() {
    let response = dev_app()
        .oneshot(
            Request::builder()
                .uri("/api/v1/health")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["data"]["status"], "ok");
    assert_eq!(json["data"]["lexicon_version"], "pt-br-1");
}

#[tokio::test]
async fn analyze_feed_returns_analysis() {
    let response = dev_app()
        .oneshot(post_feed(&sample_payload(30)))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    let data = &json["data"];
    assert_eq!(data["messages_analyzed"], 2);
    assert_eq!(data["sentiment_distribution"]["positive"], 0.5);
    assert_eq!(data["sentiment_distribution"]["negative"], 0.5);
    assert_eq!(data["sentiments"][0]["label"], "positive");
    assert_eq!(data["sentiments"][1]["label"], "negative");
    assert_eq!(data["trending_topics"][0], "#produto");
    assert_eq!(data["influence_ranking"].as_array().map(Vec::len), Some(2));
    assert!(data["processing_time_ms"].is_u64());
    assert!(json["meta"]["request_id"].is_string());
}

#[tokio::test]
async fn analyze_feed_rejects_window_123_with_422() {
    let response = dev_app()
        .oneshot(post_feed(&sample_payload(123)))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = json_body(response).await;
    assert_eq!(json["error"]["code"], "unsupported_time_window");
    assert_eq!(json["error"]["reason"], "UNSUPPORTED_TIME_WINDOW");
}

#[tokio::test]
async fn analyze_feed_rejects_bad_timestamp_with_400() {
    let mut payload = sample_payload(30);
    payload["messages"][0]["timestamp"] = json!("10/09/2025 10:00");
    let response = dev_app()
        .oneshot(post_feed(&payload))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert_eq!(json["error"]["code"], "validation_error");
    assert_eq!(json["error"]["reason"], "INVALID_TIMESTAMP");
}

#[tokio::test]
async fn analyze_feed_rejects_malformed_json() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/analyze-feed")
        .header("content-type", "application/json")
        .body(Body::from("{\"messages\": ["))
        .expect("request");
    let response = dev_app().oneshot(request).await.expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert_eq!(json["error"]["reason"], "INVALID_JSON");
}

#[tokio::test]
async fn analyze_feed_rejects_oversized_body() {
    let payload = json!({
        "messages": [],
        "time_window_minutes": 30,
        "padding": "x".repeat(BODY_LIMIT + 1)
    });
    let response = dev_app()
        .oneshot(post_feed(&payload))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn analyze_feed_rejects_null_messages_with_400() {
    let payload = json!({ "messages": null, "time_window_minutes": 30 });
    let response = dev_app()
        .oneshot(post_feed(&payload))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert_eq!(json["error"]["code"], "validation_error");
    assert_eq!(json["error"]["reason"], "INVALID_INPUT");
}

#[tokio::test]
async fn analyze_feed_needs_no_token() {
    let request = post_feed(&sample_payload(30));
    assert!(request.headers().get(header::AUTHORIZATION).is_none());

    let response = dev_app().oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn repeated_requests_are_not_throttled() {
    let app = dev_app();
    for i in 0..150 {
        let response = app
            .clone()
            .oneshot(post_feed(&sample_payload(30)))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK, "request {i}");
    }
}

#[tokio::test]
async fn request_id_header_is_echoed() {
    let response = dev_app()
        .oneshot(
            Request::builder()
                .uri("/api/v1/health")
                .header("x-request-id", "req-abc")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(
        response
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok()),
        Some("req-abc")
    );
    let json = json_body(response).await;
    assert_eq!(json["meta"]["request_id"], "req-abc");
}
