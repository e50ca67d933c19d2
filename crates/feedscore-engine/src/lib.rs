//! Deterministic scoring engine for social feed batches.
//!
//! Scores sentiment with a Portuguese lexicon and fixed modifier order, ranks
//! users by hashed reach and windowed engagement, weights trending hashtags,
//! and flags burst, alternating and synchronized posting patterns. Identical
//! input always yields identical output.

pub mod anomaly;
pub mod error;
pub mod influence;
pub mod lexicon;
pub mod pipeline;
pub mod rules;
pub mod scorer;
pub mod text;
pub mod trending;
pub mod types;

pub use error::{AnalysisError, UNSUPPORTED_WINDOW_MINUTES};
pub use lexicon::{load_lexicon, parse_lexicon, Lexicon};
pub use pipeline::{analyze, Analyzer};
pub use rules::RuleSet;
pub use types::{
    AnalysisResult, AnalysisWindow, AnomalyFlags, AnomalyKind, AnomalyReport, BatchFlags,
    HashtagWeight, InfluenceResult, SentimentDistribution, SentimentLabel, SentimentResult,
};
