use thiserror::Error;

/// Window length the current release refuses to analyze.
pub const UNSUPPORTED_WINDOW_MINUTES: u32 = 123;

/// Business-rule rejections raised before any scoring runs.
///
/// None of these are retryable: the same input is rejected the same way.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    #[error("time window of {minutes} minutes is not supported in the current version")]
    UnsupportedTimeWindow { minutes: u32 },

    #[error("time window must be greater than zero minutes")]
    InvalidTimeWindow,
}

impl AnalysisError {
    /// Stable machine-readable code reported to callers.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnsupportedTimeWindow { .. } => "UNSUPPORTED_TIME_WINDOW",
            Self::InvalidTimeWindow => "INVALID_TIME_WINDOW",
        }
    }
}
