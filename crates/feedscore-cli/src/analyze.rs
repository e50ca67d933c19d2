//! `analyze` command: score a batch file with the engine.

use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use feedscore_core::Message;
use feedscore_engine::{AnalysisResult, Analyzer, Lexicon};
use serde::Deserialize;

/// Batch file layout: either a bare message array or an object carrying
/// `messages` and an optional `time_window_minutes`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum FeedFile {
    Batch {
        messages: Vec<Message>,
        #[serde(default)]
        time_window_minutes: Option<u32>,
    },
    Messages(Vec<Message>),
}

impl FeedFile {
    fn into_parts(self) -> (Vec<Message>, Option<u32>) {
        match self {
            Self::Batch {
                messages,
                time_window_minutes,
            } => (messages, time_window_minutes),
            Self::Messages(messages) => (messages, None),
        }
    }
}

pub(crate) fn read_feed(input: &Path) -> anyhow::Result<FeedFile> {
    let raw = if input == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("reading batch from stdin")?;
        buf
    } else {
        std::fs::read_to_string(input)
            .with_context(|| format!("reading batch file {}", input.display()))?
    };
    serde_json::from_str(&raw).context("batch is not a valid message list")
}

/// Analyze a parsed batch. `window` wins over the file's own window.
///
/// # Errors
///
/// Returns an error when neither source provides a window, or the window is
/// rejected by the engine.
pub(crate) fn analyze_batch(
    analyzer: &Analyzer,
    feed: FeedFile,
    window: Option<u32>,
) -> anyhow::Result<AnalysisResult> {
    let (messages, file_window) = feed.into_parts();
    let minutes = window
        .or(file_window)
        .context("no time window given; pass --window or set time_window_minutes")?;
    let result = analyzer
        .analyze_feed(&messages, minutes)
        .with_context(|| format!("analysis rejected for a {minutes}-minute window"))?;
    Ok(result)
}

pub(crate) fn run_analyze(
    lexicon: Lexicon,
    parallel_min_batch: usize,
    input: &Path,
    window: Option<u32>,
    pretty: bool,
) -> anyhow::Result<()> {
    let analyzer = Analyzer::new(Arc::new(lexicon)).with_parallel_min_batch(parallel_min_batch);
    let feed = read_feed(input)?;
    let result = analyze_batch(&analyzer, feed, window)?;

    let rendered = if pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };
    println!("{rendered}");
    Ok(())
}
