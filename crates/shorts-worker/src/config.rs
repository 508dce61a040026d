//! Worker configuration.

use std::path::PathBuf;
use std::time::Duration;

use shorts_queue::DEFAULT_LEDGER_CAPACITY;

/// Worker configuration.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Root directory for per-job temporary audio files
    pub temp_dir: PathBuf,
    /// Directory rendered videos are written to
    pub videos_dir: PathBuf,
    /// Base URL the renderer uses to fetch temporary audio
    pub public_base_url: String,
    /// Speech synthesis voice
    pub voice: String,
    /// Seed for term shuffling and clip/music picks; random when unset
    pub rng_seed: Option<u64>,
    /// Graceful shutdown timeout
    pub shutdown_timeout: Duration,
    /// Finished job records kept for `job_state`
    pub ledger_capacity: usize,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            temp_dir: PathBuf::from("/tmp/shorts/temp"),
            videos_dir: PathBuf::from("/tmp/shorts/videos"),
            public_base_url: "http://localhost:3123".to_string(),
            voice: "af_heart".to_string(),
            rng_seed: None,
            shutdown_timeout: Duration::from_secs(30),
            ledger_capacity: DEFAULT_LEDGER_CAPACITY,
        }
    }
}

impl WorkerConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            temp_dir: std::env::var("SHORTS_TEMP_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("/tmp/shorts/temp")),
            videos_dir: std::env::var("SHORTS_VIDEOS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("/tmp/shorts/videos")),
            public_base_url: std::env::var("SHORTS_PUBLIC_URL")
                .unwrap_or_else(|_| "http://localhost:3123".to_string()),
            voice: std::env::var("SHORTS_VOICE").unwrap_or_else(|_| "af_heart".to_string()),
            rng_seed: std::env::var("SHORTS_RNG_SEED")
                .ok()
                .and_then(|s| s.parse().ok()),
            shutdown_timeout: Duration::from_secs(
                std::env::var("SHORTS_SHUTDOWN_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            ),
            ledger_capacity: std::env::var("SHORTS_LEDGER_CAPACITY")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_LEDGER_CAPACITY),
        }
    }

    /// URL of a temporary audio file of `job_id`.
    pub fn temp_audio_url(&self, job_id: &str, file_name: &str) -> String {
        format!(
            "{}/api/tmp/{}/{}",
            self.public_base_url.trim_end_matches('/'),
            job_id,
            file_name
        )
    }
}
