//! Request payload validation for `POST /api/v1/analyze-feed`.
//!
//! The payload is checked field by field on a raw JSON value so each failure
//! carries a precise reason code. The unsupported window length is rejected
//! before any message is inspected.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDateTime, Utc};
use feedscore_core::Message;
use feedscore_engine::{AnalysisError, UNSUPPORTED_WINDOW_MINUTES};
use regex::Regex;
use serde_json::{Map, Value};
use thiserror::Error;

pub(super) const MAX_CONTENT_CHARS: usize = 280;

static USER_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^user_\w{3,}$").expect("valid user id regex"));

static TIMESTAMP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}Z$").expect("valid timestamp regex")
});

/// A validated feed batch.
#[derive(Debug)]
pub(super) struct FeedRequest {
    pub messages: Vec<Message>,
    pub time_window_minutes: u32,
}

#[derive(Debug, PartialEq, Eq, Error)]
pub(super) enum RequestError {
    #[error("{message}")]
    Invalid {
        reason: &'static str,
        message: String,
    },

    #[error(transparent)]
    Window(#[from] AnalysisError),
}

impl RequestError {
    fn input(message: impl Into<String>) -> Self {
        Self::Invalid {
            reason: "INVALID_INPUT",
            message: message.into(),
        }
    }

    fn field(name: &str) -> Self {
        Self::input(format!("field '{name}' is invalid"))
    }
}

/// Validate a decoded JSON payload into a [`FeedRequest`].
pub(super) fn parse_feed_request(payload: &Value) -> Result<FeedRequest, RequestError> {
    let Value::Object(body) = payload else {
        return Err(RequestError::input("payload must be a JSON object"));
    };

    let time_window_minutes = body
        .get("time_window_minutes")
        .and_then(Value::as_u64)
        .filter(|m| *m > 0)
        .and_then(|m| u32::try_from(m).ok())
        .ok_or_else(|| RequestError::field("time_window_minutes"))?;

    if time_window_minutes == UNSUPPORTED_WINDOW_MINUTES {
        return Err(AnalysisError::UnsupportedTimeWindow {
            minutes: time_window_minutes,
        }
        .into());
    }

    let messages = match body.get("messages") {
        None => Vec::new(),
        Some(Value::Array(raw)) => raw
            .iter()
            .enumerate()
            .map(|(index, value)| parse_message(index, value))
            .collect::<Result<Vec<_>, _>>()?,
        Some(_) => return Err(RequestError::field("messages")),
    };

    Ok(FeedRequest {
        messages,
        time_window_minutes,
    })
}

fn parse_message(index: usize, value: &Value) -> Result<Message, RequestError> {
    let Value::Object(raw) = value else {
        return Err(RequestError::input(format!("messages[{index}] must be an object")));
    };

    let id = raw
        .get("id")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| RequestError::field("id"))?;

    let content = raw
        .get("content")
        .and_then(Value::as_str)
        .ok_or_else(|| RequestError::field("content"))?;
    if content.chars().count() > MAX_CONTENT_CHARS {
        return Err(RequestError::input(format!(
            "field 'content' exceeds {MAX_CONTENT_CHARS} characters"
        )));
    }

    let user_id = raw
        .get("user_id")
        .and_then(Value::as_str)
        .filter(|s| USER_ID_RE.is_match(s))
        .ok_or_else(|| RequestError::field("user_id"))?;

    let timestamp = parse_timestamp(raw.get("timestamp"))?;
    let hashtags = parse_hashtags(raw.get("hashtags"))?;

    Ok(Message {
        id: id.to_string(),
        user_id: user_id.to_string(),
        content: content.to_string(),
        timestamp,
        reactions: counter(raw, "reactions")?,
        shares: counter(raw, "shares")?,
        views: counter(raw, "views")?,
        hashtags,
    })
}

/// Strict `YYYY-MM-DDTHH:MM:SSZ`, interpreted as UTC.
fn parse_timestamp(value: Option<&Value>) -> Result<DateTime<Utc>, RequestError> {
    let invalid = || RequestError::Invalid {
        reason: "INVALID_TIMESTAMP",
        message: "field 'timestamp' must be YYYY-MM-DDTHH:MM:SSZ".to_string(),
    };

    let raw = value
        .and_then(Value::as_str)
        .filter(|s| TIMESTAMP_RE.is_match(s))
        .ok_or_else(invalid)?;

    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%SZ")
        .map(|naive| naive.and_utc())
        .map_err(|_| invalid())
}

/// Absent or `null` hashtags mean none.
fn parse_hashtags(value: Option<&Value>) -> Result<Vec<String>, RequestError> {
    match value {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(tags)) => tags
            .iter()
            .map(|tag| {
                tag.as_str()
                    .filter(|t| t.starts_with('#'))
                    .map(str::to_string)
                    .ok_or_else(|| RequestError::field("hashtags"))
            })
            .collect(),
        Some(_) => Err(RequestError::field("hashtags")),
    }
}

/// Missing counters default to zero; present ones must be non-negative integers.
fn counter(raw: &Map<String, Value>, name: &str) -> Result<u64, RequestError> {
    match raw.get(name) {
        None => Ok(0),
        Some(value) => value.as_u64().ok_or_else(|| RequestError::field(name)),
    }
}
