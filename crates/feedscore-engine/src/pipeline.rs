//! Feed analysis orchestration.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use feedscore_core::Message;
use rayon::prelude::*;

use crate::anomaly::detect_anomalies;
use crate::error::AnalysisError;
use crate::influence::{engagement_rate, rank_influence, InfluenceScorer, CANDIDATE_AWARENESS_SCORE};
use crate::lexicon::Lexicon;
use crate::rules::{is_mbras_employee, RuleSet};
use crate::scorer::{mentions_meta_phrase, SentimentScorer};
use crate::trending::TrendingAggregator;
use crate::types::{
    AnalysisResult, AnalysisWindow, BatchFlags, InfluenceResult, SentimentDistribution,
    SentimentLabel, SentimentResult,
};

/// Content length (code points) of the special pattern flag.
pub const SPECIAL_PATTERN_LENGTH: usize = 42;
pub const DEFAULT_PARALLEL_MIN_BATCH: usize = 64;

/// Exactly 42 code points and mentions the employee marker.
#[must_use]
pub fn is_special_pattern(content: &str) -> bool {
    content.chars().count() == SPECIAL_PATTERN_LENGTH && content.to_lowercase().contains("mbras")
}

/// Scores feed batches against a fixed lexicon and rule table.
///
/// Holds no per-request state; one instance can serve concurrent callers.
#[derive(Debug, Clone)]
pub struct Analyzer {
    lexicon: Arc<Lexicon>,
    rules: RuleSet,
    parallel_min_batch: usize,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(Arc::new(Lexicon::portuguese()))
    }
}

impl Analyzer {
    #[must_use]
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self {
            lexicon,
            rules: RuleSet::standard(),
            parallel_min_batch: DEFAULT_PARALLEL_MIN_BATCH,
        }
    }

    #[must_use]
    pub fn with_rules(mut self, rules: RuleSet) -> Self {
        self.rules = rules;
        self
    }

    /// Batches with at least `min` in-window messages score sentiment on the
    /// rayon pool. `0` always goes parallel.
    #[must_use]
    pub fn with_parallel_min_batch(mut self, min: usize) -> Self {
        self.parallel_min_batch = min;
        self
    }

    #[must_use]
    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Validate the window length, anchor the window to the batch, and analyze.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError`] for a rejected window length. Nothing is
    /// scored in that case.
    pub fn analyze_feed(
        &self,
        messages: &[Message],
        time_window_minutes: u32,
    ) -> Result<AnalysisResult, AnalysisError> {
        let window = AnalysisWindow::anchored_to_latest(messages, time_window_minutes)?;
        Ok(self.analyze(messages, &window))
    }

    /// Run the full analysis for one batch.
    ///
    /// 1. Keep only in-window messages.
    /// 2. Score sentiment per message (parallel for large batches, order kept).
    /// 3. Group by user; score influence and rank.
    /// 4. Aggregate hashtags over non-meta messages.
    /// 5. Run the anomaly detectors.
    ///
    /// An empty in-window set yields zeroed and empty outputs.
    #[must_use]
    pub fn analyze(&self, messages: &[Message], window: &AnalysisWindow) -> AnalysisResult {
        let in_window: Vec<&Message> = messages
            .iter()
            .filter(|m| window.contains(m.timestamp))
            .collect();

        tracing::debug!(
            received = messages.len(),
            in_window = in_window.len(),
            window_minutes = window.duration_minutes(),
            reference_time = %window.reference_time(),
            "applied analysis window"
        );

        let sentiments = self.score_sentiments(&in_window);
        let labels: Vec<SentimentLabel> = sentiments.iter().map(|s| s.label).collect();

        let sentiment_distribution = SentimentDistribution::from_labels(&labels);

        // Barrier: everything below needs every per-message label.
        let mut per_user: BTreeMap<&str, Vec<(&Message, SentimentLabel)>> = BTreeMap::new();
        for (msg, label) in in_window.iter().zip(&labels) {
            per_user
                .entry(msg.user_id.as_str())
                .or_default()
                .push((*msg, *label));
        }

        let influence_ranking = self.rank_users(&per_user);

        let mut trending = TrendingAggregator::new(window.reference_time());
        for (msg, label) in in_window.iter().zip(&labels) {
            trending.add(msg.hashtags.as_slice(), msg.timestamp, *label);
        }
        let top_hashtags = trending.finish();
        let trending_topics = top_hashtags.iter().map(|h| h.hashtag.clone()).collect();

        let sequences: BTreeMap<&str, Vec<(DateTime<Utc>, SentimentLabel)>> = per_user
            .iter()
            .map(|(user, items)| {
                let seq: Vec<_> = items.iter().map(|(m, l)| (m.timestamp, *l)).collect();
                (*user, seq)
            })
            .collect();
        let all_timestamps: Vec<DateTime<Utc>> = in_window.iter().map(|m| m.timestamp).collect();
        let anomalies = detect_anomalies(&sequences, &all_timestamps);

        let flags = batch_flags(&in_window);
        let engagement_score = batch_engagement(&in_window, flags.candidate_awareness);

        tracing::info!(
            messages = in_window.len(),
            users = influence_ranking.len(),
            hashtags = top_hashtags.len(),
            anomaly = anomalies.anomaly_detected,
            lexicon = %self.lexicon.version,
            "feed analyzed"
        );

        AnalysisResult {
            lexicon_version: self.lexicon.version.clone(),
            messages_analyzed: in_window.len(),
            sentiment_distribution,
            sentiments,
            engagement_score,
            trending_topics,
            top_hashtags,
            influence_ranking,
            anomalies,
            flags,
        }
    }

    fn score_sentiments(&self, in_window: &[&Message]) -> Vec<SentimentResult> {
        let scorer = SentimentScorer::new(&self.lexicon);
        let score_one = |msg: &&Message| {
            let (score, label) = scorer.score(&msg.content, is_mbras_employee(&msg.user_id));
            SentimentResult {
                message_id: msg.id.clone(),
                score,
                label,
            }
        };

        if in_window.len() >= self.parallel_min_batch {
            tracing::debug!(count = in_window.len(), "scoring sentiment on rayon pool");
            in_window.par_iter().map(score_one).collect()
        } else {
            in_window.iter().map(score_one).collect()
        }
    }

    fn rank_users(
        &self,
        per_user: &BTreeMap<&str, Vec<(&Message, SentimentLabel)>>,
    ) -> Vec<InfluenceResult> {
        let scorer = InfluenceScorer::new(&self.rules);
        let mut ranking: Vec<InfluenceResult> = per_user
            .iter()
            .map(|(user_id, items)| {
                let messages: Vec<&Message> = items.iter().map(|(m, _)| *m).collect();
                scorer.score_user(user_id, &messages)
            })
            .collect();
        rank_influence(&mut ranking);
        ranking
    }
}

fn batch_flags(in_window: &[&Message]) -> BatchFlags {
    in_window.iter().fold(BatchFlags::default(), |flags, m| BatchFlags {
        mbras_employee: flags.mbras_employee || is_mbras_employee(&m.user_id),
        special_pattern: flags.special_pattern || is_special_pattern(&m.content),
        candidate_awareness: flags.candidate_awareness || mentions_meta_phrase(&m.content),
    })
}

/// Batch-wide interactions over views, or the fixed score under candidate awareness.
fn batch_engagement(in_window: &[&Message], candidate_awareness: bool) -> f64 {
    if candidate_awareness {
        return CANDIDATE_AWARENESS_SCORE;
    }
    let (interactions, views) = in_window.iter().fold((0_u64, 0_u64), |(i, v), m| {
        (i.saturating_add(m.interactions()), v.saturating_add(m.views))
    });
    engagement_rate(interactions, views)
}

/// Analyze with the built-in lexicon and standard rules.
#[must_use]
pub fn analyze(messages: &[Message], window: &AnalysisWindow) -> AnalysisResult {
    Analyzer::default().analyze(messages, window)
}
