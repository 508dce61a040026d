//! Worker error types.

use thiserror::Error;

pub type WorkerResult<T> = Result<T, WorkerError>;

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("Invalid request: {0}")]
    InvalidRequest(#[from] validator::ValidationErrors),

    #[error("Scene {index} failed: {source}")]
    SceneFailed {
        index: usize,
        #[source]
        source: Box<WorkerError>,
    },

    #[error("No music available for mood '{mood}'")]
    NoMatchingMusic { mood: String },

    #[error("Job panicked: {0}")]
    JobPanicked(String),

    #[error("Footage error: {0}")]
    Footage(#[from] shorts_footage::FootageError),

    #[error("Media error: {0}")]
    Media(#[from] shorts_media::MediaError),

    #[error("Storage error: {0}")]
    Storage(#[from] shorts_storage::StorageError),

    #[error("Queue error: {0}")]
    Queue(#[from] shorts_queue::QueueError),
}

impl WorkerError {
    pub fn scene_failed(index: usize, source: WorkerError) -> Self {
        Self::SceneFailed {
            index,
            source: Box::new(source),
        }
    }

    /// The innermost error, looking through scene wrappers.
    pub fn root(&self) -> &WorkerError {
        match self {
            WorkerError::SceneFailed { source, .. } => source.root(),
            other => other,
        }
    }

    /// Whether a requested video does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, WorkerError::Storage(e) if e.is_not_found())
    }
}
