mod analyze;
mod lexicon;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "feedscore-cli")]
#[command(about = "Score social feed batches offline")]
struct Cli {
    /// YAML lexicon replacing the built-in word lists
    #[arg(long, global = true)]
    lexicon: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Analyze a JSON batch file and print the result as JSON
    Analyze {
        /// Batch file; `-` reads stdin
        #[arg(long, short)]
        input: PathBuf,

        /// Window length in minutes (overrides the file's `time_window_minutes`)
        #[arg(long, short)]
        window: Option<u32>,

        /// Pretty-print the output
        #[arg(long)]
        pretty: bool,
    },
    /// Print the active lexicon as YAML
    Lexicon {
        /// Only validate and print a one-line summary
        #[arg(long)]
        check: bool,
    },
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = feedscore_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let lexicon_path = cli.lexicon.or_else(|| config.lexicon_path.clone());
    let lexicon = lexicon::resolve_lexicon(lexicon_path.as_deref())?;

    match cli.command {
        Commands::Analyze {
            input,
            window,
            pretty,
        } => analyze::run_analyze(
            lexicon,
            config.parallel_min_batch,
            &input,
            window,
            pretty,
        ),
        Commands::Lexicon { check } => lexicon::run_lexicon(&lexicon, check),
    }
}

#[cfg(test)]
mod tests;
