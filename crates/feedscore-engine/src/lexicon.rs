//! Sentiment lexicon: immutable, versioned word lists.
//!
//! The built-in lexicon targets Portuguese social posts. A replacement can be
//! loaded from YAML once at startup and shared behind an `Arc`.

use std::collections::BTreeSet;
use std::path::Path;

use feedscore_core::ConfigError;
use serde::{Deserialize, Serialize};

use crate::text::fold_for_matching;

const POSITIVE_WORDS: &[&str] = &[
    "adorei",
    "gostei",
    "bom",
    "otimo",
    "excelente",
    "perfeito",
    "maravilhoso",
    "incrivel",
    "fantastico",
    "positivo",
    "top",
];

const NEGATIVE_WORDS: &[&str] = &[
    "ruim",
    "terrivel",
    "pessimo",
    "horrivel",
    "odiei",
    "detestei",
    "negativo",
    "pior",
];

const INTENSIFIERS: &[&str] = &[
    "muito",
    "super",
    "mega",
    "ultra",
    "extremamente",
    "bem",
    "bastante",
];

const NEGATIONS: &[&str] = &["nao", "nunca", "jamais", "nem"];

/// Role a folded token plays in scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexiconRole {
    Positive,
    Negative,
    Intensifier,
    Negation,
}

/// Four disjoint sets of folded words.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lexicon {
    pub version: String,
    pub positive: BTreeSet<String>,
    pub negative: BTreeSet<String>,
    #[serde(default)]
    pub intensifiers: BTreeSet<String>,
    #[serde(default)]
    pub negations: BTreeSet<String>,
}

impl Lexicon {
    /// The built-in Portuguese lexicon.
    #[must_use]
    pub fn portuguese() -> Self {
        let set = |words: &[&str]| words.iter().map(|w| (*w).to_string()).collect();
        Self {
            version: "pt-br-1".to_string(),
            positive: set(POSITIVE_WORDS),
            negative: set(NEGATIVE_WORDS),
            intensifiers: set(INTENSIFIERS),
            negations: set(NEGATIONS),
        }
    }

    /// Look up a token that is already in folded form.
    #[must_use]
    pub fn role(&self, folded: &str) -> Option<LexiconRole> {
        if self.positive.contains(folded) {
            Some(LexiconRole::Positive)
        } else if self.negative.contains(folded) {
            Some(LexiconRole::Negative)
        } else if self.intensifiers.contains(folded) {
            Some(LexiconRole::Intensifier)
        } else if self.negations.contains(folded) {
            Some(LexiconRole::Negation)
        } else {
            None
        }
    }

    fn fold_entries(self) -> Self {
        let fold = |set: BTreeSet<String>| {
            set.into_iter()
                .map(|w| fold_for_matching(w.trim()))
                .collect::<BTreeSet<_>>()
        };
        Self {
            version: self.version.trim().to_string(),
            positive: fold(self.positive),
            negative: fold(self.negative),
            intensifiers: fold(self.intensifiers),
            negations: fold(self.negations),
        }
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::portuguese()
    }
}

/// Load and validate a lexicon from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_lexicon(path: &Path) -> Result<Lexicon, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LexiconFileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_lexicon(&content)
}

/// Parse, fold and validate a YAML lexicon document.
///
/// Entries are folded with the same normalizer used on message tokens, so
/// `"Ótimo"` in the file matches `"otimo"` in content.
///
/// # Errors
///
/// Returns `ConfigError` if the YAML is malformed or fails validation.
pub fn parse_lexicon(yaml: &str) -> Result<Lexicon, ConfigError> {
    let raw: Lexicon = serde_yaml::from_str(yaml)?;
    let lexicon = raw.fold_entries();
    validate_lexicon(&lexicon)?;
    Ok(lexicon)
}

fn validate_lexicon(lexicon: &Lexicon) -> Result<(), ConfigError> {
    if lexicon.version.is_empty() {
        return Err(ConfigError::Validation(
            "lexicon version must be non-empty".to_string(),
        ));
    }
    if lexicon.positive.is_empty() || lexicon.negative.is_empty() {
        return Err(ConfigError::Validation(
            "lexicon needs at least one positive and one negative word".to_string(),
        ));
    }

    let sets = [
        ("positive", &lexicon.positive),
        ("negative", &lexicon.negative),
        ("intensifiers", &lexicon.intensifiers),
        ("negations", &lexicon.negations),
    ];

    for (name, set) in &sets {
        if set.iter().any(String::is_empty) {
            return Err(ConfigError::Validation(format!(
                "{name} contains a blank entry"
            )));
        }
    }

    for (i, (left_name, left)) in sets.iter().enumerate() {
        for (right_name, right) in &sets[i + 1..] {
            if let Some(word) = left.intersection(right).next() {
                return Err(ConfigError::Validation(format!(
                    "'{word}' appears in both {left_name} and {right_name}"
                )));
            }
        }
    }

    Ok(())
}
