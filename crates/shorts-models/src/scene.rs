//! Scene models: script input, render options and composed scenes.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{Music, MusicMood};

/// One scene of the script as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Validate)]
pub struct SceneInput {
    /// Text spoken over the scene
    #[validate(length(min = 1, message = "scene text must not be empty"))]
    pub text: String,

    /// Stock footage search terms, most relevant first
    #[validate(length(min = 1, message = "at least one search term is required"))]
    pub search_terms: Vec<String>,
}

impl SceneInput {
    pub fn new(text: impl Into<String>, search_terms: Vec<String>) -> Self {
        Self {
            text: text.into(),
            search_terms,
        }
    }
}

/// Render options for a job.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RenderConfig {
    /// Silence appended after the last scene, in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding_back_ms: Option<u64>,

    /// Mood of the background track
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub music: Option<MusicMood>,
}

impl RenderConfig {
    pub fn with_padding_back_ms(mut self, padding_back_ms: u64) -> Self {
        self.padding_back_ms = Some(padding_back_ms);
        self
    }

    pub fn with_music(mut self, mood: MusicMood) -> Self {
        self.music = Some(mood);
        self
    }

    /// Padding in seconds, zero when unset.
    pub fn padding_back_seconds(&self) -> f64 {
        self.padding_back_ms.map(|ms| ms as f64 / 1000.0).unwrap_or(0.0)
    }
}

/// A request to create a short, validated before a job is issued.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Validate)]
pub struct ShortRequest {
    #[validate(length(min = 1, message = "at least one scene is required"), nested)]
    pub scenes: Vec<SceneInput>,

    #[serde(default)]
    pub config: RenderConfig,
}

impl ShortRequest {
    pub fn new(scenes: Vec<SceneInput>, config: RenderConfig) -> Self {
        Self { scenes, config }
    }
}

/// A single caption, timed in milliseconds relative to its scene audio.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Caption {
    pub text: String,
    pub start_ms: i64,
    pub end_ms: i64,
}

impl Caption {
    pub fn new(text: impl Into<String>, start_ms: i64, end_ms: i64) -> Self {
        Self {
            text: text.into(),
            start_ms,
            end_ms,
        }
    }
}

/// Narration audio of a composed scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SceneAudio {
    /// URL the renderer fetches the audio from
    pub url: String,

    /// Accounted duration in seconds (includes end padding on the last scene)
    pub duration_seconds: f64,
}

/// A fully prepared scene, ready for the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Scene {
    pub captions: Vec<Caption>,

    /// Stock footage URL
    pub video: String,

    pub audio: SceneAudio,
}

/// Everything the renderer needs to produce the final video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Composition {
    pub music: Music,
    pub scenes: Vec<Scene>,

    /// Total video length in milliseconds
    pub duration_ms: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding_back_ms: Option<u64>,
}
