//! Footage error types.

use thiserror::Error;

pub type FootageResult<T> = Result<T, FootageError>;

#[derive(Debug, Error)]
pub enum FootageError {
    #[error("Pexels API key is not configured (set PEXELS_API_KEY)")]
    MissingApiKey,

    #[error("Search for '{term}' timed out")]
    Timeout { term: String },

    #[error("Search for '{term}' timed out after {attempts} attempts")]
    RetriesExhausted { term: String, attempts: u32 },

    #[error("No videos found for '{0}'")]
    NoResults(String),

    #[error("No qualifying videos found for '{0}'")]
    NoQualifyingVideos(String),

    #[error("No footage found for search terms {0:?}")]
    NoFootageFound(Vec<String>),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl FootageError {
    /// Whether the request ran out of time and may be retried.
    pub fn is_timeout(&self) -> bool {
        match self {
            FootageError::Timeout { .. } => true,
            FootageError::Network(e) => e.is_timeout(),
            _ => false,
        }
    }

    /// Whether the error aborts the whole selection instead of moving on to
    /// the next search term.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            FootageError::MissingApiKey
                | FootageError::RetriesExhausted { .. }
                | FootageError::NoFootageFound(_)
        )
    }
}
