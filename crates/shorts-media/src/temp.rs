//! Job-scoped temporary files.
//!
//! Every path handed out by [`TempFiles::allocate`] is removed by
//! [`TempFiles::cleanup`], or by `Drop` if the owning future fails, is
//! cancelled or panics before cleanup runs.

use std::io;
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, warn};

use crate::error::MediaResult;

/// Tracks the temporary files of one job inside its own directory.
#[derive(Debug)]
pub struct TempFiles {
    dir: PathBuf,
    paths: Vec<PathBuf>,
    released: bool,
}

impl TempFiles {
    /// Create the job directory `root/scope` and start tracking it.
    pub async fn create(root: impl AsRef<Path>, scope: &str) -> MediaResult<Self> {
        let dir = root.as_ref().join(scope);
        fs::create_dir_all(&dir).await?;

        Ok(Self {
            dir,
            paths: Vec::new(),
            released: false,
        })
    }

    /// Directory holding this job's files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Register a file name inside the job directory and return its path.
    ///
    /// The path is tracked before anything is written to it, so partially
    /// written files are cleaned up too.
    pub fn allocate(&mut self, file_name: &str) -> PathBuf {
        let path = self.dir.join(file_name);
        self.paths.push(path.clone());
        path
    }

    /// Paths handed out so far.
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Remove every tracked file and the job directory.
    pub async fn cleanup(mut self) {
        for path in &self.paths {
            if let Err(e) = fs::remove_file(path).await {
                log_removal_error(path, &e);
            }
        }

        if let Err(e) = fs::remove_dir(&self.dir).await {
            log_removal_error(&self.dir, &e);
        }

        debug!(
            dir = %self.dir.display(),
            files = self.paths.len(),
            "Removed temporary files"
        );
        self.released = true;
    }
}

impl Drop for TempFiles {
    fn drop(&mut self) {
        if self.released {
            return;
        }

        for path in &self.paths {
            if let Err(e) = std::fs::remove_file(path) {
                log_removal_error(path, &e);
            }
        }
        if let Err(e) = std::fs::remove_dir(&self.dir) {
            log_removal_error(&self.dir, &e);
        }
    }
}

fn log_removal_error(path: &Path, e: &io::Error) {
    // Files that were registered but never written are expected.
    if e.kind() != io::ErrorKind::NotFound {
        warn!(path = %path.display(), "Failed to remove temporary file: {}", e);
    }
}
