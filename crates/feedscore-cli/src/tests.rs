use std::io::Write;

use feedscore_engine::{Analyzer, Lexicon, SentimentLabel};

use super::*;
use crate::analyze::{analyze_batch, read_feed, FeedFile};

fn batch_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(contents.as_bytes()).expect("write batch");
    file
}

const BATCH: &str = r##"{
    "time_window_minutes": 30,
    "messages": [
        {
            "id": "m1",
            "user_id": "user_alice",
            "content": "adorei o produto",
            "timestamp": "2025-09-10T10:00:00Z",
            "hashtags": ["#produto"],
            "reactions": 3,
            "views": 30
        }
    ]
}"##;

#[test]
fn parses_analyze_command() {
    let cli = Cli::try_parse_from(["feedscore-cli", "analyze", "--input", "feed.json", "-w", "60"])
        .expect("expected valid cli args");

    match cli.command {
        Commands::Analyze {
            input,
            window,
            pretty,
        } => {
            assert_eq!(input, PathBuf::from("feed.json"));
            assert_eq!(window, Some(60));
            assert!(!pretty);
        }
        Commands::Lexicon { .. } => panic!("expected analyze"),
    }
}

#[test]
fn parses_global_lexicon_flag_after_subcommand() {
    let cli = Cli::try_parse_from(["feedscore-cli", "lexicon", "--check", "--lexicon", "lex.yaml"])
        .expect("expected valid cli args");
    assert_eq!(cli.lexicon, Some(PathBuf::from("lex.yaml")));
    assert!(matches!(cli.command, Commands::Lexicon { check: true }));
}

#[test]
fn analyze_requires_input() {
    assert!(Cli::try_parse_from(["feedscore-cli", "analyze"]).is_err());
}

#[test]
fn subcommand_is_required() {
    assert!(Cli::try_parse_from(["feedscore-cli"]).is_err());
}

#[test]
fn reads_batch_object_and_uses_its_window() {
    let file = batch_file(BATCH);
    let feed = read_feed(file.path()).expect("feed");
    let result = analyze_batch(&Analyzer::default(), feed, None).expect("analysis");

    assert_eq!(result.messages_analyzed, 1);
    assert_eq!(result.sentiments[0].label, SentimentLabel::Positive);
    assert_eq!(result.trending_topics, vec!["#produto".to_string()]);
    assert_eq!(result.engagement_score, 0.1);
}

#[test]
fn reads_bare_message_array() {
    let file = batch_file(
        r#"[{"id": "m1", "user_id": "user_bob", "content": "ruim", "timestamp": "2025-09-10T10:00:00Z"}]"#,
    );
    let feed = read_feed(file.path()).expect("feed");
    assert!(matches!(feed, FeedFile::Messages(ref m) if m.len() == 1));

    let result = analyze_batch(&Analyzer::default(), feed, Some(15)).expect("analysis");
    assert_eq!(result.sentiments[0].label, SentimentLabel::Negative);
}

#[test]
fn bare_array_without_window_is_an_error() {
    let file = batch_file("[]");
    let feed = read_feed(file.path()).expect("feed");
    let err = analyze_batch(&Analyzer::default(), feed, None).unwrap_err();
    assert!(err.to_string().contains("no time window"));
}

#[test]
fn unsupported_window_is_reported() {
    let file = batch_file(BATCH);
    let feed = read_feed(file.path()).expect("feed");
    let err = analyze_batch(&Analyzer::default(), feed, Some(123)).unwrap_err();
    assert!(format!("{err:#}").contains("not supported"));
}

#[test]
fn malformed_batch_is_an_error() {
    let file = batch_file("{\"messages\": 5}");
    assert!(read_feed(file.path()).is_err());
}

#[test]
fn missing_lexicon_file_is_an_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let missing = dir.path().join("nope.yaml");
    assert!(lexicon::resolve_lexicon(Some(&missing)).is_err());
}

#[test]
fn custom_lexicon_file_is_loaded() {
    let file = batch_file("version: custom-1\npositive: [legal]\nnegative: [chato]\n");
    let lexicon = lexicon::resolve_lexicon(Some(file.path())).expect("lexicon");
    assert_eq!(lexicon.version, "custom-1");
    assert_eq!(
        lexicon::summary(&lexicon),
        "lexicon custom-1: 1 positive, 1 negative, 0 intensifiers, 0 negations"
    );
}

#[test]
fn default_lexicon_is_portuguese() {
    let lexicon = lexicon::resolve_lexicon(None).expect("lexicon");
    assert_eq!(lexicon, Lexicon::portuguese());
}
