//! Background music definitions.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Mood tag of a background track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum MusicMood {
    Sad,
    Melancholic,
    Happy,
    Euphoric,
    Excited,
    Chill,
    Uneasy,
    Angry,
    Dark,
    Hopeful,
    Contemplative,
    Funny,
}

impl MusicMood {
    /// All available moods.
    pub const ALL: &'static [MusicMood] = &[
        MusicMood::Sad,
        MusicMood::Melancholic,
        MusicMood::Happy,
        MusicMood::Euphoric,
        MusicMood::Excited,
        MusicMood::Chill,
        MusicMood::Uneasy,
        MusicMood::Angry,
        MusicMood::Dark,
        MusicMood::Hopeful,
        MusicMood::Contemplative,
        MusicMood::Funny,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MusicMood::Sad => "sad",
            MusicMood::Melancholic => "melancholic",
            MusicMood::Happy => "happy",
            MusicMood::Euphoric => "euphoric",
            MusicMood::Excited => "excited",
            MusicMood::Chill => "chill",
            MusicMood::Uneasy => "uneasy",
            MusicMood::Angry => "angry",
            MusicMood::Dark => "dark",
            MusicMood::Hopeful => "hopeful",
            MusicMood::Contemplative => "contemplative",
            MusicMood::Funny => "funny",
        }
    }
}

impl fmt::Display for MusicMood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MusicMood {
    type Err = MusicMoodParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        MusicMood::ALL
            .iter()
            .copied()
            .find(|mood| mood.as_str() == wanted)
            .ok_or_else(|| MusicMoodParseError(s.to_string()))
    }
}

#[derive(Debug, Error)]
#[error("Unknown music mood: {0}")]
pub struct MusicMoodParseError(String);

/// A track from the music catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Music {
    /// File name of the track in the catalog
    pub file: String,

    /// URL the renderer fetches the track from
    pub url: String,

    /// Start of the usable segment, in seconds
    #[serde(default)]
    pub start: f64,

    /// End of the usable segment, in seconds
    #[serde(default)]
    pub end: f64,

    /// Mood tag
    pub mood: MusicMood,
}

impl Music {
    pub fn new(file: impl Into<String>, url: impl Into<String>, mood: MusicMood) -> Self {
        Self {
            file: file.into(),
            url: url.into(),
            start: 0.0,
            end: 0.0,
            mood,
        }
    }

    /// Set the usable segment of the track.
    pub fn with_segment(mut self, start: f64, end: f64) -> Self {
        self.start = start;
        self.end = end;
        self
    }
}
