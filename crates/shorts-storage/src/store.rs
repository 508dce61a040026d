//! Rendered video store on the local filesystem.

use std::io;
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, info};

use shorts_models::JobId;

use crate::error::{StorageError, StorageResult};

/// Stores one `<job id>.mp4` per rendered job in a single directory.
#[derive(Debug, Clone)]
pub struct VideoStore {
    videos_dir: PathBuf,
}

impl VideoStore {
    pub fn new(videos_dir: impl Into<PathBuf>) -> Self {
        Self {
            videos_dir: videos_dir.into(),
        }
    }

    /// Create the videos directory if needed.
    pub async fn init(&self) -> StorageResult<()> {
        fs::create_dir_all(&self.videos_dir).await?;
        Ok(())
    }

    pub fn videos_dir(&self) -> &Path {
        &self.videos_dir
    }

    /// Path the video for `id` is rendered to.
    pub fn video_path(&self, id: &JobId) -> PathBuf {
        self.videos_dir.join(format!("{}.mp4", id.as_str()))
    }

    /// Whether a rendered video exists for `id`.
    pub async fn exists(&self, id: &JobId) -> bool {
        fs::try_exists(self.video_path(id)).await.unwrap_or(false)
    }

    /// Read the rendered video.
    pub async fn read(&self, id: &JobId) -> StorageResult<Vec<u8>> {
        match fs::read(self.video_path(id)).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(id.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Delete the rendered video. Deleting a missing video is not an error.
    pub async fn delete(&self, id: &JobId) -> StorageResult<()> {
        match fs::remove_file(self.video_path(id)).await {
            Ok(()) => {
                info!(video_id = %id, "Deleted video file");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(video_id = %id, "Video file already absent");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}
