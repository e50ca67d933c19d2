//! Burst, alternating-sentiment and synchronized-posting detection.
//!
//! Every detector is a pure function over timestamps and labels.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};

use crate::types::{AnomalyFlags, AnomalyKind, AnomalyReport, SentimentLabel};

pub const BURST_WINDOW_MINUTES: i64 = 5;
/// A user bursts when a window holds more than this many messages.
pub const BURST_THRESHOLD: usize = 10;
pub const ALTERNATING_RUN: usize = 10;
/// Maximum spread of a synchronized group (±2 s around its midpoint).
pub const SYNC_SPREAD_SECS: i64 = 4;
pub const SYNC_MIN_MESSAGES: usize = 3;

/// Largest number of timestamps that fit in any window of length `span`.
fn max_in_span(timestamps: &[DateTime<Utc>], span: Duration) -> usize {
    let mut sorted = timestamps.to_vec();
    sorted.sort_unstable();

    let mut start = 0;
    let mut best = 0;
    for end in 0..sorted.len() {
        while sorted[end] - sorted[start] > span {
            start += 1;
        }
        best = best.max(end - start + 1);
    }
    best
}

/// More than [`BURST_THRESHOLD`] messages inside any 5-minute window.
#[must_use]
pub fn detect_burst(timestamps: &[DateTime<Utc>]) -> bool {
    timestamps.len() > BURST_THRESHOLD
        && max_in_span(timestamps, Duration::minutes(BURST_WINDOW_MINUTES)) > BURST_THRESHOLD
}

/// A run of at least [`ALTERNATING_RUN`] time-ordered messages whose labels
/// alternate positive/negative. Neutral and meta messages break the run.
#[must_use]
pub fn detect_alternating(sequence: &[(DateTime<Utc>, SentimentLabel)]) -> bool {
    if sequence.len() < ALTERNATING_RUN {
        return false;
    }
    let mut ordered = sequence.to_vec();
    ordered.sort_by_key(|(ts, _)| *ts);

    let mut streak = 0_usize;
    let mut last: Option<SentimentLabel> = None;
    for (_, label) in ordered {
        match label {
            SentimentLabel::Positive | SentimentLabel::Negative => {
                streak = match last {
                    Some(prev) if prev != label => streak + 1,
                    _ => 1,
                };
                last = Some(label);
                if streak >= ALTERNATING_RUN {
                    return true;
                }
            }
            SentimentLabel::Neutral | SentimentLabel::Meta => {
                streak = 0;
                last = None;
            }
        }
    }
    false
}

/// At least [`SYNC_MIN_MESSAGES`] timestamps within a 4-second spread.
#[must_use]
pub fn detect_synchronized(timestamps: &[DateTime<Utc>]) -> bool {
    timestamps.len() >= SYNC_MIN_MESSAGES
        && max_in_span(timestamps, Duration::seconds(SYNC_SPREAD_SECS)) >= SYNC_MIN_MESSAGES
}

/// Run all detectors.
///
/// `per_user` maps each user to their `(timestamp, label)` sequence;
/// `all_timestamps` covers the whole in-window batch.
#[must_use]
pub fn detect_anomalies(
    per_user: &BTreeMap<&str, Vec<(DateTime<Utc>, SentimentLabel)>>,
    all_timestamps: &[DateTime<Utc>],
) -> AnomalyReport {
    let users: BTreeMap<String, AnomalyFlags> = per_user
        .iter()
        .map(|(user_id, sequence)| {
            let timestamps: Vec<DateTime<Utc>> = sequence.iter().map(|(ts, _)| *ts).collect();
            let flags = AnomalyFlags {
                burst: detect_burst(&timestamps),
                alternating: detect_alternating(sequence),
            };
            ((*user_id).to_string(), flags)
        })
        .collect();

    let synchronized_posting = detect_synchronized(all_timestamps);

    let anomaly_type = if users.values().any(|f| f.burst) {
        Some(AnomalyKind::Burst)
    } else if users.values().any(|f| f.alternating) {
        Some(AnomalyKind::AlternatingSentiment)
    } else if synchronized_posting {
        Some(AnomalyKind::SynchronizedPosting)
    } else {
        None
    };

    if let Some(kind) = anomaly_type {
        tracing::debug!(?kind, "anomaly detected");
    }

    AnomalyReport {
        users,
        synchronized_posting,
        anomaly_detected: anomaly_type.is_some(),
        anomaly_type,
    }
}
