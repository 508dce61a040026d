//! Speech-to-text output with token-level timestamps.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Start and end of a span, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct Offsets {
    pub from: i64,
    pub to: i64,
}

impl Offsets {
    pub fn new(from: i64, to: i64) -> Self {
        Self { from, to }
    }
}

/// A sub-word token. Word boundaries are marked by a leading space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TranscriptionToken {
    pub text: String,
    pub offsets: Offsets,
}

impl TranscriptionToken {
    pub fn new(text: impl Into<String>, from: i64, to: i64) -> Self {
        Self {
            text: text.into(),
            offsets: Offsets::new(from, to),
        }
    }
}

/// One transcribed segment with its tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TranscriptionRecord {
    pub text: String,
    pub offsets: Offsets,
    #[serde(default)]
    pub tokens: Vec<TranscriptionToken>,
}
