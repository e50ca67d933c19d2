//! Normalization and tokenization of message content.
//!
//! Tokens keep their original surface; the lexicon view is a parallel,
//! folded sequence used only for lookups.

use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:#\w+(?:-\w+)*)|\b\w+\b").expect("valid token regex"));

/// A token in original order and casing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    Word(&'a str),
    Hashtag(&'a str),
}

impl<'a> Token<'a> {
    #[must_use]
    pub fn as_str(&self) -> &'a str {
        match self {
            Token::Word(s) | Token::Hashtag(s) => s,
        }
    }
}

/// Word tokens of a message. Inline hashtags are dropped; trending reads the
/// message's declared hashtag list instead.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenizedContent {
    /// Word tokens as written. Their count is the sentiment denominator.
    pub words: Vec<String>,
    /// Folded form of each entry in `words`, index-aligned.
    pub lexicon_view: Vec<String>,
}

/// Split content into word and hashtag tokens.
#[must_use]
pub fn tokenize(content: &str) -> Vec<Token<'_>> {
    TOKEN_RE
        .find_iter(content)
        .map(|m| {
            let s = m.as_str();
            if s.starts_with('#') {
                Token::Hashtag(s)
            } else {
                Token::Word(s)
            }
        })
        .collect()
}

/// Tokenize content and derive the lexicon view of its word tokens.
#[must_use]
pub fn analyze_text(content: &str) -> TokenizedContent {
    let mut out = TokenizedContent::default();
    for token in tokenize(content) {
        if let Token::Word(word) = token {
            out.lexicon_view.push(fold_for_matching(word));
            out.words.push(word.to_string());
        }
    }
    out
}

/// Lowercase, decompose (NFKD) and drop combining marks.
///
/// `"Não"` and `"NAO"` both fold to `"nao"`.
#[must_use]
pub fn fold_for_matching(text: &str) -> String {
    text.to_lowercase()
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .collect()
}

/// NFKD with combining marks removed, case untouched.
#[must_use]
pub fn strip_marks(text: &str) -> String {
    text.nfkd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Case-insensitive comparison form that keeps diacritics (NFC, lowercase).
#[must_use]
pub fn fold_case(text: &str) -> String {
    text.nfc().collect::<String>().to_lowercase()
}
