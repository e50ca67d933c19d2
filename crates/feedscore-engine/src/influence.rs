//! Per-user influence: hashed reach plus windowed engagement.

use feedscore_core::Message;
use sha2::{Digest, Sha256};

use crate::rules::{is_mbras_employee, RuleSet};
use crate::scorer::mentions_meta_phrase;
use crate::types::InfluenceResult;

pub const FOLLOWER_MODULUS: u64 = 10_000;
pub const FOLLOWER_FLOOR: u64 = 100;
pub const FOLLOWER_WEIGHT: f64 = 0.4;
pub const ENGAGEMENT_WEIGHT: f64 = 0.6;
/// Interaction totals that are a non-zero multiple of this get the golden boost.
pub const GOLDEN_INTERACTION_STEP: u64 = 7;
/// Reported score for users whose posts mention the meta phrase.
pub const CANDIDATE_AWARENESS_SCORE: f64 = 9.42;

/// `1 + 1/φ` with `φ = (1 + √5) / 2`.
#[must_use]
pub fn golden_boost() -> f64 {
    let phi = (1.0 + 5.0_f64.sqrt()) / 2.0;
    1.0 + 1.0 / phi
}

/// Follower count derived from SHA-256 of the exact `user_id` bytes.
///
/// The digest is read as one big-endian unsigned integer and reduced modulo
/// 10 000 byte by byte, so no big-integer type is needed.
#[must_use]
pub fn hashed_followers(user_id: &str) -> u64 {
    let digest = Sha256::digest(user_id.as_bytes());
    let remainder = digest
        .iter()
        .fold(0_u64, |acc, &byte| (acc * 256 + u64::from(byte)) % FOLLOWER_MODULUS);
    remainder + FOLLOWER_FLOOR
}

/// Interactions over views; zero when there are no views.
#[must_use]
pub fn engagement_rate(interactions: u64, views: u64) -> f64 {
    if views == 0 {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let rate = interactions as f64 / views as f64;
    rate
}

#[derive(Debug, Clone, Copy)]
pub struct InfluenceScorer<'a> {
    rules: &'a RuleSet,
}

impl<'a> InfluenceScorer<'a> {
    #[must_use]
    pub fn new(rules: &'a RuleSet) -> Self {
        Self { rules }
    }

    #[must_use]
    pub fn followers(&self, user_id: &str) -> u64 {
        self.rules.resolve_followers(user_id, hashed_followers)
    }

    /// Score one user from their in-window messages.
    #[must_use]
    pub fn score_user(&self, user_id: &str, messages: &[&Message]) -> InfluenceResult {
        let followers = self.followers(user_id);

        let (interactions, views) = messages.iter().fold((0_u64, 0_u64), |(i, v), m| {
            (i.saturating_add(m.interactions()), v.saturating_add(m.views))
        });

        let mut engagement = engagement_rate(interactions, views);
        if interactions > 0 && interactions % GOLDEN_INTERACTION_STEP == 0 {
            engagement *= golden_boost();
        }

        #[allow(clippy::cast_precision_loss)]
        let base = followers as f64 * FOLLOWER_WEIGHT + engagement * ENGAGEMENT_WEIGHT;
        let adjusted = self.rules.adjust_score(user_id, base);

        let is_candidate_awareness = messages.iter().any(|m| mentions_meta_phrase(&m.content));
        let score = if is_candidate_awareness {
            CANDIDATE_AWARENESS_SCORE
        } else {
            adjusted
        };

        InfluenceResult {
            user_id: user_id.to_string(),
            followers,
            engagement_rate: engagement,
            score,
            is_mbras_employee: is_mbras_employee(user_id),
            is_candidate_awareness,
            message_count: messages.len(),
        }
    }
}

/// Sort by score descending, then user id ascending.
pub fn rank_influence(results: &mut [InfluenceResult]) {
    results.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.user_id.cmp(&b.user_id))
    });
}
