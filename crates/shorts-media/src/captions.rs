//! Caption building from token-level transcriptions.
//!
//! Whisper emits sub-word tokens; a token that continues a word has no
//! leading space. Tokens are merged back into words so each caption shows a
//! whole word with the timing of all its pieces.

use shorts_models::{Caption, TranscriptionRecord, TranscriptionToken};

/// Prefix of internal non-speech tokens (`[_BEG_]`, `[_TT_150]`, ...).
pub const NON_SPEECH_MARKER_PREFIX: &str = "[_";

/// Incrementally merges transcription tokens into captions.
#[derive(Debug, Default)]
pub struct CaptionBuilder {
    captions: Vec<Caption>,
}

impl CaptionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add every token of a record. Records with empty text are ignored.
    pub fn push_record(&mut self, record: &TranscriptionRecord) {
        if record.text.is_empty() {
            return;
        }

        for token in &record.tokens {
            self.push_token(token);
        }
    }

    fn push_token(&mut self, token: &TranscriptionToken) {
        if token.text.starts_with(NON_SPEECH_MARKER_PREFIX) {
            return;
        }

        if let Some(prev) = self.captions.last_mut() {
            if !token.text.starts_with(' ') && !prev.text.ends_with(' ') {
                prev.text.push_str(&token.text);
                prev.end_ms = token.offsets.to;
                return;
            }
        }

        self.captions.push(Caption::new(
            token.text.clone(),
            token.offsets.from,
            token.offsets.to,
        ));
    }

    /// Captions emitted so far.
    pub fn captions(&self) -> &[Caption] {
        &self.captions
    }

    pub fn finish(self) -> Vec<Caption> {
        self.captions
    }
}

/// Build captions for a whole transcription.
pub fn build_captions(records: &[TranscriptionRecord]) -> Vec<Caption> {
    let mut builder = CaptionBuilder::new();
    for record in records {
        builder.push_record(record);
    }
    builder.finish()
}
