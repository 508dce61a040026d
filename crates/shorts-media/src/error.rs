//! Error types for media operations.

use thiserror::Error;

/// Result type for media operations.
pub type MediaResult<T> = Result<T, MediaError>;

/// Errors that can occur in the media engines.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("Speech synthesis failed: {message}")]
    SynthesisFailed { message: String },

    #[error("Audio transcoding failed: {message}")]
    TranscodeFailed { message: String },

    #[error("Transcription failed: {message}")]
    TranscriptionFailed { message: String },

    #[error("Rendering failed: {message}")]
    RenderFailed { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MediaError {
    pub fn synthesis_failed(message: impl Into<String>) -> Self {
        Self::SynthesisFailed {
            message: message.into(),
        }
    }

    pub fn transcode_failed(message: impl Into<String>) -> Self {
        Self::TranscodeFailed {
            message: message.into(),
        }
    }

    pub fn transcription_failed(message: impl Into<String>) -> Self {
        Self::TranscriptionFailed {
            message: message.into(),
        }
    }

    pub fn render_failed(message: impl Into<String>) -> Self {
        Self::RenderFailed {
            message: message.into(),
        }
    }
}
