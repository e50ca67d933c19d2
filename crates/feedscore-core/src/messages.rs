use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One validated post from an incoming feed batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub user_id: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub reactions: u64,
    #[serde(default)]
    pub shares: u64,
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub hashtags: Vec<String>,
}

impl Message {
    /// Reactions plus shares.
    #[must_use]
    pub fn interactions(&self) -> u64 {
        self.reactions.saturating_add(self.shares)
    }
}
