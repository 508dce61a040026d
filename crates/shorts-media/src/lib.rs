//! Media seams for the short video pipeline.
//!
//! This crate provides:
//! - Async traits for the speech, transcoding, transcription and rendering engines
//! - Caption building from token-level transcriptions
//! - Job-scoped temporary file tracking with guaranteed cleanup

pub mod captions;
pub mod engines;
pub mod error;
pub mod temp;

pub use captions::{build_captions, CaptionBuilder, NON_SPEECH_MARKER_PREFIX};
pub use engines::{AudioTranscoder, SpeechAudio, SpeechSynthesizer, Transcriber, VideoRenderer};
pub use error::{MediaError, MediaResult};
pub use temp::TempFiles;
