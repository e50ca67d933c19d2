use std::sync::Arc;
use std::time::Instant;

use axum::{body::Bytes, extract::State, Extension, Json};
use feedscore_engine::{AnalysisError, AnalysisResult};
use serde::Serialize;
use serde_json::Value;

use crate::middleware::RequestId;

use super::validation::{parse_feed_request, RequestError};
use super::{ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct FeedAnalysis {
    #[serde(flatten)]
    pub analysis: AnalysisResult,
    pub processing_time_ms: u64,
}

pub(super) fn map_request_error(req_id: &str, error: &RequestError) -> ApiError {
    tracing::warn!(error = %error, "rejected feed batch");
    match error {
        RequestError::Invalid { reason, message } => {
            ApiError::with_reason(req_id, "validation_error", *reason, message.clone())
        }
        RequestError::Window(e @ AnalysisError::UnsupportedTimeWindow { .. }) => {
            ApiError::with_reason(req_id, "unsupported_time_window", e.code(), e.to_string())
        }
        RequestError::Window(e @ AnalysisError::InvalidTimeWindow) => {
            ApiError::with_reason(req_id, "validation_error", e.code(), e.to_string())
        }
    }
}

/// POST /api/v1/analyze-feed: score one batch of messages.
pub(super) async fn analyze_feed(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Bytes,
) -> Result<Json<ApiResponse<FeedAnalysis>>, ApiError> {
    let started = Instant::now();
    let rid = &req_id.0;

    let payload: Value = serde_json::from_slice(&body).map_err(|e| {
        tracing::warn!(error = %e, "rejected malformed JSON body");
        ApiError::with_reason(
            rid,
            "validation_error",
            "INVALID_JSON",
            format!("request body is not valid JSON: {e}"),
        )
    })?;
    let request = parse_feed_request(&payload).map_err(|e| map_request_error(rid, &e))?;

    let analyzer = Arc::clone(&state.analyzer);
    let analysis = tokio::task::spawn_blocking(move || {
        analyzer.analyze_feed(&request.messages, request.time_window_minutes)
    })
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "analysis task failed");
        ApiError::new(rid, "internal_error", "analysis failed")
    })?
    .map_err(|e| map_request_error(rid, &RequestError::Window(e)))?;

    let processing_time_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

    Ok(Json(ApiResponse {
        data: FeedAnalysis {
            analysis,
            processing_time_ms,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}
