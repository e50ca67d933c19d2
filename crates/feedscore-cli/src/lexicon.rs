//! `lexicon` command: show or validate the word lists in use.

use std::path::Path;

use anyhow::Context;
use feedscore_engine::{load_lexicon, Lexicon};

/// Load the lexicon at `path`, or the built-in one.
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed, or fails validation.
pub(crate) fn resolve_lexicon(path: Option<&Path>) -> anyhow::Result<Lexicon> {
    match path {
        Some(path) => {
            let lexicon = load_lexicon(path)
                .with_context(|| format!("loading lexicon from {}", path.display()))?;
            tracing::info!(path = %path.display(), version = %lexicon.version, "loaded lexicon");
            Ok(lexicon)
        }
        None => Ok(Lexicon::portuguese()),
    }
}

pub(crate) fn summary(lexicon: &Lexicon) -> String {
    format!(
        "lexicon {}: {} positive, {} negative, {} intensifiers, {} negations",
        lexicon.version,
        lexicon.positive.len(),
        lexicon.negative.len(),
        lexicon.intensifiers.len(),
        lexicon.negations.len()
    )
}

pub(crate) fn run_lexicon(lexicon: &Lexicon, check: bool) -> anyhow::Result<()> {
    if check {
        println!("{}", summary(lexicon));
    } else {
        print!("{}", serde_yaml::to_string(lexicon)?);
    }
    Ok(())
}
