//! Hashtag weighting and top-N ranking.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::types::{HashtagWeight, SentimentLabel};

pub const TOP_HASHTAGS: usize = 5;
/// Floor on minutes-since-post so fresh posts get a large but finite weight.
pub const MIN_MINUTES_SINCE_POST: f64 = 0.01;
/// Hashtags longer than this many code points get a logarithmic boost.
pub const LENGTH_FACTOR_THRESHOLD: usize = 8;

/// `1 + 1 / max(minutes_since_post, 0.01)`.
#[must_use]
pub fn temporal_weight(reference_time: DateTime<Utc>, posted_at: DateTime<Utc>) -> f64 {
    let elapsed = reference_time - posted_at;
    #[allow(clippy::cast_precision_loss)]
    let seconds = elapsed.num_microseconds().map_or_else(
        || elapsed.num_seconds() as f64,
        |us| us as f64 / 1_000_000.0,
    );
    let minutes = (seconds / 60.0).max(MIN_MINUTES_SINCE_POST);
    1.0 + 1.0 / minutes
}

/// `log10(len) / log10(8)` for hashtags longer than 8 code points, else 1.
#[must_use]
pub fn length_factor(hashtag: &str) -> f64 {
    let len = hashtag.chars().count();
    if len > LENGTH_FACTOR_THRESHOLD {
        #[allow(clippy::cast_precision_loss)]
        let len = len as f64;
        len.log10() / 8.0_f64.log10()
    } else {
        1.0
    }
}

/// Accumulates per-hashtag weights over non-meta messages.
#[derive(Debug, Clone)]
pub struct TrendingAggregator {
    reference_time: DateTime<Utc>,
    entries: BTreeMap<String, HashtagWeight>,
}

impl TrendingAggregator {
    #[must_use]
    pub fn new(reference_time: DateTime<Utc>) -> Self {
        Self {
            reference_time,
            entries: BTreeMap::new(),
        }
    }

    /// Add every hashtag occurrence of one message. Meta messages are skipped.
    pub fn add<S: AsRef<str>>(&mut self, hashtags: &[S], posted_at: DateTime<Utc>, label: SentimentLabel) {
        if label == SentimentLabel::Meta {
            return;
        }
        let temporal = temporal_weight(self.reference_time, posted_at);
        let modifier = label.trending_modifier();

        for tag in hashtags {
            let tag = tag.as_ref();
            let weight = temporal * modifier * length_factor(tag);
            let entry = self
                .entries
                .entry(tag.to_string())
                .or_insert_with(|| HashtagWeight {
                    hashtag: tag.to_string(),
                    weight: 0.0,
                    frequency: 0,
                    sentiment_weight: 0.0,
                });
            entry.weight += weight;
            entry.frequency += 1;
            entry.sentiment_weight += modifier;
        }
    }

    /// Ranked entries, at most [`TOP_HASHTAGS`].
    #[must_use]
    pub fn finish(self) -> Vec<HashtagWeight> {
        let mut ranked: Vec<HashtagWeight> = self.entries.into_values().collect();
        ranked.sort_by(compare_hashtags);
        ranked.truncate(TOP_HASHTAGS);
        ranked
    }
}

/// Weight desc, frequency desc, sentiment weight desc, hashtag asc.
fn compare_hashtags(a: &HashtagWeight, b: &HashtagWeight) -> Ordering {
    b.weight
        .total_cmp(&a.weight)
        .then_with(|| b.frequency.cmp(&a.frequency))
        .then_with(|| b.sentiment_weight.total_cmp(&a.sentiment_weight))
        .then_with(|| a.hashtag.cmp(&b.hashtag))
}
