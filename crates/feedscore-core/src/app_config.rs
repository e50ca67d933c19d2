use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Optional YAML lexicon replacing the built-in word lists.
    pub lexicon_path: Option<PathBuf>,
    /// Batches with at least this many in-window messages score sentiment
    /// on the rayon pool; smaller batches stay on the calling thread.
    pub parallel_min_batch: usize,
    pub max_body_bytes: usize,
}
