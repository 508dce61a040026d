//! Shared data models for the short video generator.
//!
//! This crate provides Serde-serializable types for:
//! - Jobs, job ids and job states
//! - Scene inputs, render configuration and composed scenes
//! - Captions and transcription records
//! - Stock footage items and background music

pub mod footage;
pub mod job;
pub mod music;
pub mod scene;
pub mod transcript;
pub mod video;

// Re-export common types
pub use footage::FootageItem;
pub use job::{Job, JobId, JobState};
pub use music::{Music, MusicMood, MusicMoodParseError};
pub use scene::{Caption, Composition, RenderConfig, Scene, SceneAudio, SceneInput, ShortRequest};
pub use transcript::{Offsets, TranscriptionRecord, TranscriptionToken};
pub use video::VideoStatus;
