//! Lexicon scorer with a fixed modifier order.
//!
//! Per polar token: intensifier chain, then negation parity, then the
//! employee boost. The sum is divided by the word-token count.

use crate::lexicon::{Lexicon, LexiconRole};
use crate::text::{analyze_text, fold_case};
use crate::types::SentimentLabel;

/// Self-referential phrase that marks a message as `meta`.
pub const META_PHRASE: &str = "teste técnico mbras";

pub const INTENSIFIER_FACTOR: f64 = 1.5;
/// Number of tokens after a negation whose polarity it flips.
pub const NEGATION_SCOPE: usize = 3;
pub const EMPLOYEE_POSITIVE_FACTOR: f64 = 2.0;
pub const CLASSIFICATION_THRESHOLD: f64 = 0.1;

/// True when the whole content is the meta phrase (case-insensitive).
#[must_use]
pub fn is_meta_message(content: &str) -> bool {
    fold_case(content.trim()) == META_PHRASE
}

/// True when the meta phrase appears anywhere in the content.
#[must_use]
pub fn mentions_meta_phrase(content: &str) -> bool {
    fold_case(content).contains(META_PHRASE)
}

#[must_use]
pub fn classify(score: f64) -> SentimentLabel {
    if score > CLASSIFICATION_THRESHOLD {
        SentimentLabel::Positive
    } else if score < -CLASSIFICATION_THRESHOLD {
        SentimentLabel::Negative
    } else {
        SentimentLabel::Neutral
    }
}

/// Scores message content against a borrowed lexicon.
#[derive(Debug, Clone, Copy)]
pub struct SentimentScorer<'a> {
    lexicon: &'a Lexicon,
}

impl<'a> SentimentScorer<'a> {
    #[must_use]
    pub fn new(lexicon: &'a Lexicon) -> Self {
        Self { lexicon }
    }

    /// Score one message and classify it.
    ///
    /// `is_employee` enables the positive-contribution boost.
    #[must_use]
    pub fn score(&self, content: &str, is_employee: bool) -> (f64, SentimentLabel) {
        if is_meta_message(content) {
            return (0.0, SentimentLabel::Meta);
        }

        let text = analyze_text(content);
        if text.words.is_empty() {
            return (0.0, SentimentLabel::Neutral);
        }

        let sum = self.contribution_sum(&text.lexicon_view, is_employee);
        #[allow(clippy::cast_precision_loss)]
        let score = sum / text.words.len() as f64;
        (score, classify(score))
    }

    /// Sum of adjusted per-token contributions over a folded token sequence.
    #[must_use]
    pub fn contribution_sum(&self, lexicon_view: &[String], is_employee: bool) -> f64 {
        let negations: Vec<usize> = lexicon_view
            .iter()
            .enumerate()
            .filter(|(_, tok)| self.lexicon.role(tok) == Some(LexiconRole::Negation))
            .map(|(idx, _)| idx)
            .collect();

        let mut sum = 0.0_f64;
        let mut pending_intensity = 1.0_f64;

        for (idx, tok) in lexicon_view.iter().enumerate() {
            let polarity = match self.lexicon.role(tok) {
                Some(LexiconRole::Intensifier) => {
                    pending_intensity *= INTENSIFIER_FACTOR;
                    continue;
                }
                Some(LexiconRole::Positive) => 1.0,
                Some(LexiconRole::Negative) => -1.0,
                Some(LexiconRole::Negation) | None => continue,
            };

            let mut contribution = polarity * pending_intensity;
            pending_intensity = 1.0;

            let covering = negations
                .iter()
                .filter(|&&neg| neg < idx && idx - neg <= NEGATION_SCOPE)
                .count();
            if covering % 2 == 1 {
                contribution = -contribution;
            }

            if is_employee && contribution > 0.0 {
                contribution *= EMPLOYEE_POSITIVE_FACTOR;
            }

            sum += contribution;
        }

        sum
    }
}
