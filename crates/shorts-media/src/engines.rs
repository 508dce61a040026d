//! Engine traits for speech, transcoding, transcription and rendering.
//!
//! The pipeline only talks to these traits; concrete engines (TTS models,
//! FFmpeg, whisper, the video compositor) live with the host application.

use async_trait::async_trait;
use std::path::Path;

use shorts_models::{Composition, JobId, TranscriptionRecord};

use crate::error::MediaResult;

/// Raw synthesized narration.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeechAudio {
    /// Encoded audio as produced by the synthesizer
    pub data: Vec<u8>,
    /// Length of the spoken audio in seconds
    pub duration_seconds: f64,
}

impl SpeechAudio {
    pub fn new(data: Vec<u8>, duration_seconds: f64) -> Self {
        Self {
            data,
            duration_seconds,
        }
    }
}

/// Text-to-speech engine.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize `text` with the given voice.
    async fn generate(&self, text: &str, voice: &str) -> MediaResult<SpeechAudio>;
}

/// Audio transcoder producing the renditions the pipeline needs.
#[async_trait]
pub trait AudioTranscoder: Send + Sync {
    /// Write a normalized rendition suitable for transcription (16 kHz mono WAV).
    async fn normalize(&self, audio: &SpeechAudio, dest: &Path) -> MediaResult<()>;

    /// Write a compressed, streaming-friendly rendition for the renderer.
    async fn encode(&self, audio: &SpeechAudio, dest: &Path) -> MediaResult<()>;
}

/// Speech-to-text engine with token-level timestamps.
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, audio_path: &Path) -> MediaResult<Vec<TranscriptionRecord>>;
}

/// Video compositor.
#[async_trait]
pub trait VideoRenderer: Send + Sync {
    /// Render `composition` for `job_id`, writing the video to `output_path`.
    async fn render(
        &self,
        composition: &Composition,
        job_id: &JobId,
        output_path: &Path,
    ) -> MediaResult<()>;
}
