use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use feedscore_core::Message;
use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, UNSUPPORTED_WINDOW_MINUTES};

/// How far past the reference time a timestamp may sit and still count.
pub const FUTURE_TOLERANCE_SECS: i64 = 5;

/// Time range a request analyzes.
///
/// A message is in-window iff
/// `reference_time - duration <= timestamp <= reference_time + 5s`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisWindow {
    reference_time: DateTime<Utc>,
    duration_minutes: u32,
}

impl AnalysisWindow {
    /// # Errors
    ///
    /// Returns [`AnalysisError::InvalidTimeWindow`] for a zero duration and
    /// [`AnalysisError::UnsupportedTimeWindow`] for the rejected window length.
    pub fn new(reference_time: DateTime<Utc>, duration_minutes: u32) -> Result<Self, AnalysisError> {
        if duration_minutes == 0 {
            return Err(AnalysisError::InvalidTimeWindow);
        }
        if duration_minutes == UNSUPPORTED_WINDOW_MINUTES {
            return Err(AnalysisError::UnsupportedTimeWindow {
                minutes: duration_minutes,
            });
        }
        Ok(Self {
            reference_time,
            duration_minutes,
        })
    }

    /// Window ending at the latest timestamp in the batch.
    ///
    /// Anchoring to the data keeps the result a pure function of the input.
    /// An empty batch has nothing to anchor to and uses the current time.
    ///
    /// # Errors
    ///
    /// Same as [`AnalysisWindow::new`].
    pub fn anchored_to_latest(
        messages: &[Message],
        duration_minutes: u32,
    ) -> Result<Self, AnalysisError> {
        let reference = messages
            .iter()
            .map(|m| m.timestamp)
            .max()
            .unwrap_or_else(Utc::now);
        Self::new(reference, duration_minutes)
    }

    #[must_use]
    pub fn reference_time(&self) -> DateTime<Utc> {
        self.reference_time
    }

    #[must_use]
    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    #[must_use]
    pub fn start(&self) -> DateTime<Utc> {
        self.reference_time - Duration::minutes(i64::from(self.duration_minutes))
    }

    #[must_use]
    pub fn end(&self) -> DateTime<Utc> {
        self.reference_time + Duration::seconds(FUTURE_TOLERANCE_SECS)
    }

    #[must_use]
    pub fn contains(&self, timestamp: DateTime<Utc>) -> bool {
        self.start() <= timestamp && timestamp <= self.end()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
    Meta,
}

impl SentimentLabel {
    /// Trending multiplier for a message carrying this label.
    #[must_use]
    pub fn trending_modifier(self) -> f64 {
        match self {
            Self::Positive => 1.2,
            Self::Negative => 0.8,
            Self::Neutral | Self::Meta => 1.0,
        }
    }
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Positive => write!(f, "positive"),
            Self::Negative => write!(f, "negative"),
            Self::Neutral => write!(f, "neutral"),
            Self::Meta => write!(f, "meta"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    pub message_id: String,
    pub score: f64,
    pub label: SentimentLabel,
}

/// Share of each label over non-meta messages. All zero when there are none.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SentimentDistribution {
    pub positive: f64,
    pub negative: f64,
    pub neutral: f64,
}

impl SentimentDistribution {
    #[must_use]
    pub fn from_labels<'a>(labels: impl IntoIterator<Item = &'a SentimentLabel>) -> Self {
        let (mut positive, mut negative, mut neutral) = (0_u32, 0_u32, 0_u32);
        for label in labels {
            match label {
                SentimentLabel::Positive => positive += 1,
                SentimentLabel::Negative => negative += 1,
                SentimentLabel::Neutral => neutral += 1,
                SentimentLabel::Meta => {}
            }
        }
        let total = positive + negative + neutral;
        if total == 0 {
            return Self::default();
        }
        let total = f64::from(total);
        Self {
            positive: f64::from(positive) / total,
            negative: f64::from(negative) / total,
            neutral: f64::from(neutral) / total,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfluenceResult {
    pub user_id: String,
    pub followers: u64,
    pub engagement_rate: f64,
    pub score: f64,
    pub is_mbras_employee: bool,
    pub is_candidate_awareness: bool,
    pub message_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HashtagWeight {
    pub hashtag: String,
    pub weight: f64,
    pub frequency: u64,
    /// Sum of the sentiment modifiers of every occurrence.
    pub sentiment_weight: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnomalyFlags {
    pub burst: bool,
    pub alternating: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyKind {
    Burst,
    AlternatingSentiment,
    SynchronizedPosting,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnomalyReport {
    pub users: BTreeMap<String, AnomalyFlags>,
    pub synchronized_posting: bool,
    pub anomaly_detected: bool,
    /// First detected kind in burst, alternating, synchronized order.
    pub anomaly_type: Option<AnomalyKind>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchFlags {
    pub mbras_employee: bool,
    pub special_pattern: bool,
    pub candidate_awareness: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub lexicon_version: String,
    pub messages_analyzed: usize,
    pub sentiment_distribution: SentimentDistribution,
    pub sentiments: Vec<SentimentResult>,
    pub engagement_score: f64,
    pub trending_topics: Vec<String>,
    pub top_hashtags: Vec<HashtagWeight>,
    pub influence_ranking: Vec<InfluenceResult>,
    pub anomalies: AnomalyReport,
    pub flags: BatchFlags,
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 9, 10, h, m, s).unwrap()
    }

    #[test]
    fn window_rejects_zero_minutes() {
        assert_eq!(
            AnalysisWindow::new(at(10, 0, 0), 0),
            Err(AnalysisError::InvalidTimeWindow)
        );
    }

    #[test]
    fn window_rejects_unsupported_length() {
        let err = AnalysisWindow::new(at(10, 0, 0), 123).unwrap_err();
        assert_eq!(err, AnalysisError::UnsupportedTimeWindow { minutes: 123 });
        assert_eq!(err.code(), "UNSUPPORTED_TIME_WINDOW");
    }

    #[test]
    fn window_boundaries_are_inclusive() {
        let window = AnalysisWindow::new(at(10, 30, 0), 30).unwrap();
        assert!(window.contains(at(10, 0, 0)), "start boundary");
        assert!(!window.contains(at(9, 59, 59)), "just before start");
        assert!(window.contains(at(10, 30, 5)), "future tolerance boundary");
        assert!(!window.contains(at(10, 30, 6)), "just past tolerance");
    }

    #[test]
    fn distribution_ignores_meta_labels() {
        let labels = [
            SentimentLabel::Positive,
            SentimentLabel::Meta,
            SentimentLabel::Neutral,
            SentimentLabel::Neutral,
            SentimentLabel::Negative,
        ];
        let dist = SentimentDistribution::from_labels(&labels);
        assert_eq!(dist.positive, 0.25);
        assert_eq!(dist.negative, 0.25);
        assert_eq!(dist.neutral, 0.5);
    }

    #[test]
    fn distribution_of_only_meta_is_all_zero() {
        let dist = SentimentDistribution::from_labels(&[SentimentLabel::Meta]);
        assert_eq!(dist, SentimentDistribution::default());
    }

    #[test]
    fn label_serializes_lowercase() {
        let json = serde_json::to_string(&SentimentLabel::Meta).expect("serialize");
        assert_eq!(json, "\"meta\"");
    }
}
