//! Background music selection.

use std::collections::BTreeSet;

use rand::seq::IndexedRandom;
use rand::Rng;
use tracing::debug;

use shorts_models::{Music, MusicMood};

use crate::error::{WorkerError, WorkerResult};

/// Picks background tracks from a fixed catalog.
#[derive(Debug, Clone, Default)]
pub struct MusicSelector {
    tracks: Vec<Music>,
}

impl MusicSelector {
    pub fn new(tracks: Vec<Music>) -> Self {
        Self { tracks }
    }

    pub fn tracks(&self) -> &[Music] {
        &self.tracks
    }

    /// Pick a random track, restricted to `mood` when given.
    pub fn select<R>(
        &self,
        video_duration_seconds: f64,
        mood: Option<MusicMood>,
        rng: &mut R,
    ) -> WorkerResult<Music>
    where
        R: Rng + ?Sized,
    {
        let candidates: Vec<&Music> = self
            .tracks
            .iter()
            .filter(|track| mood.map_or(true, |m| track.mood == m))
            .collect();

        let selected = candidates
            .choose(rng)
            .map(|track| (*track).clone())
            .ok_or_else(|| WorkerError::NoMatchingMusic {
                mood: mood.map_or_else(|| "any".to_string(), |m| m.to_string()),
            })?;

        debug!(
            file = %selected.file,
            mood = %selected.mood,
            candidates = candidates.len(),
            video_duration_seconds,
            "Selected music"
        );
        Ok(selected)
    }

    /// Moods present in the catalog.
    pub fn moods(&self) -> BTreeSet<MusicMood> {
        self.tracks.iter().map(|track| track.mood).collect()
    }
}
