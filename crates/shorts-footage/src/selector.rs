//! Stock footage selection.
//!
//! Search terms are tried in random order, followed by a few generic
//! fallback terms. The first term with at least one qualifying clip wins and
//! one of its qualifying clips is picked at random. Timeouts retry the same
//! term against a budget shared by the whole selection; any other per-term
//! failure moves on to the next term.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;
use tracing::{debug, error, warn};

use shorts_models::FootageItem;

use crate::error::{FootageError, FootageResult};
use crate::provider::FootageProvider;
use crate::types::ProviderVideo;

/// Generic terms tried after the scene's own terms.
pub const JOKER_TERMS: &[&str] = &["nature", "globe", "space", "ocean"];

/// Frame rate clip durations are normalized to.
pub const NORMAL_FRAME_RATE: f64 = 25.0;

/// Required rendition size (portrait full HD).
pub const HD_WIDTH: u32 = 1080;
pub const HD_HEIGHT: u32 = 1920;

/// Selection configuration.
#[derive(Debug, Clone)]
pub struct SelectorConfig {
    /// Upper bound for a single provider request
    pub request_timeout: Duration,
    /// Timeouts tolerated per selection before giving up
    pub retry_budget: u32,
    /// Extra seconds a clip must last beyond the narration
    pub duration_buffer_seconds: f64,
    /// Fallback terms
    pub joker_terms: Vec<String>,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_millis(5000),
            retry_budget: 3,
            duration_buffer_seconds: 3.0,
            joker_terms: JOKER_TERMS.iter().map(|t| t.to_string()).collect(),
        }
    }
}

impl SelectorConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            request_timeout: Duration::from_millis(
                std::env::var("PEXELS_TIMEOUT_MS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(5000),
            ),
            retry_budget: std::env::var("PEXELS_RETRY_BUDGET")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(3),
            ..defaults
        }
    }
}

/// Picks a stock clip for a scene.
pub struct FootageSelector {
    provider: Arc<dyn FootageProvider>,
    config: SelectorConfig,
}

impl FootageSelector {
    pub fn new(provider: Arc<dyn FootageProvider>, config: SelectorConfig) -> Self {
        Self { provider, config }
    }

    pub fn config(&self) -> &SelectorConfig {
        &self.config
    }

    /// Find a clip lasting at least `min_duration_seconds` plus the safety
    /// buffer whose id is not in `exclude_ids`.
    pub async fn find_video<R>(
        &self,
        search_terms: &[String],
        min_duration_seconds: f64,
        exclude_ids: &HashSet<String>,
        rng: &mut R,
    ) -> FootageResult<FootageItem>
    where
        R: Rng + Send + ?Sized,
    {
        let candidates = self.candidate_terms(search_terms, rng);
        let required_seconds = min_duration_seconds + self.config.duration_buffer_seconds;
        let mut timeouts = 0u32;

        for term in &candidates {
            loop {
                match self.search_term(term, required_seconds, exclude_ids, rng).await {
                    Ok(item) => {
                        debug!(term = %term, footage_id = %item.id, "Selected footage");
                        return Ok(item);
                    }
                    Err(e) if e.is_timeout() => {
                        metrics::counter!("shorts_footage_timeouts_total").increment(1);
                        if timeouts < self.config.retry_budget {
                            timeouts += 1;
                            warn!(term = %term, retry = timeouts, "Footage search timed out, retrying");
                            continue;
                        }
                        error!(term = %term, retries = timeouts, "Footage search timed out, retry limit reached");
                        return Err(FootageError::RetriesExhausted {
                            term: term.clone(),
                            attempts: timeouts + 1,
                        });
                    }
                    Err(e) if e.is_fatal() => {
                        error!(term = %term, "Footage search failed: {}", e);
                        return Err(e);
                    }
                    Err(e) => {
                        warn!(term = %term, "No footage for term: {}", e);
                        break;
                    }
                }
            }
        }

        error!(terms = ?search_terms, "No footage found for any search term");
        Err(FootageError::NoFootageFound(search_terms.to_vec()))
    }

    /// Shuffled scene terms followed by shuffled fallback terms.
    fn candidate_terms<R>(&self, search_terms: &[String], rng: &mut R) -> Vec<String>
    where
        R: Rng + ?Sized,
    {
        let mut terms = search_terms.to_vec();
        terms.shuffle(rng);

        let mut jokers = self.config.joker_terms.clone();
        jokers.shuffle(rng);

        terms.extend(jokers);
        terms
    }

    async fn search_term<R>(
        &self,
        term: &str,
        required_seconds: f64,
        exclude_ids: &HashSet<String>,
        rng: &mut R,
    ) -> FootageResult<FootageItem>
    where
        R: Rng + Send + ?Sized,
    {
        metrics::counter!("shorts_footage_searches_total").increment(1);
        debug!(
            term,
            provider = self.provider.name(),
            required_seconds,
            "Searching footage"
        );

        let videos = tokio::time::timeout(self.config.request_timeout, self.provider.search(term))
            .await
            .map_err(|_| FootageError::Timeout {
                term: term.to_string(),
            })??;

        if videos.is_empty() {
            return Err(FootageError::NoResults(term.to_string()));
        }

        let qualifying = qualifying_videos(&videos, required_seconds, exclude_ids);
        qualifying
            .choose(rng)
            .cloned()
            .ok_or_else(|| FootageError::NoQualifyingVideos(term.to_string()))
    }
}

/// Duration corrected for clips shot below the normal frame rate.
pub fn effective_duration(video: &ProviderVideo) -> f64 {
    match video.frame_rate {
        Some(fps) if fps < NORMAL_FRAME_RATE => video.duration_seconds * (fps / NORMAL_FRAME_RATE),
        _ => video.duration_seconds,
    }
}

/// Clips that are not excluded, last at least `required_seconds` and offer a
/// portrait full HD rendition.
pub fn qualifying_videos(
    videos: &[ProviderVideo],
    required_seconds: f64,
    exclude_ids: &HashSet<String>,
) -> Vec<FootageItem> {
    videos
        .iter()
        .filter(|video| !exclude_ids.contains(&video.id) && !video.files.is_empty())
        .filter(|video| effective_duration(video) >= required_seconds)
        .filter_map(|video| {
            video
                .files
                .iter()
                .find(|f| {
                    f.quality.as_deref() == Some("hd") && f.width == HD_WIDTH && f.height == HD_HEIGHT
                })
                .map(|f| FootageItem {
                    id: video.id.clone(),
                    url: f.link.clone(),
                    width: f.width,
                    height: f.height,
                })
        })
        .collect()
}
