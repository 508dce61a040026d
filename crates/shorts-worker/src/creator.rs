//! Entry point for creating short videos.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{info, warn};
use validator::Validate;

use shorts_models::{Job, JobId, MusicMood, RenderConfig, SceneInput, ShortRequest, VideoStatus};
use shorts_queue::{job_queue_with_capacity, JobQueue, JobRecord};

use crate::error::WorkerResult;
use crate::executor::JobExecutor;
use crate::processor::ProcessingContext;

/// Accepts short video requests and serves their results.
///
/// Owns the job queue and the single worker task draining it.
pub struct ShortCreator {
    queue: JobQueue,
    ctx: Arc<ProcessingContext>,
    shutdown: watch::Sender<bool>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl ShortCreator {
    /// Prepare the video store and start the worker task.
    pub async fn start(ctx: ProcessingContext) -> WorkerResult<Self> {
        ctx.store.init().await?;

        let ctx = Arc::new(ctx);
        let (queue, receiver) = job_queue_with_capacity(ctx.config.ledger_capacity);
        let (shutdown, shutdown_rx) = watch::channel(false);

        let executor = JobExecutor::new(Arc::clone(&ctx), receiver, shutdown_rx);
        let worker = tokio::spawn(executor.run());

        info!(
            videos_dir = %ctx.store.videos_dir().display(),
            tracks = ctx.music.tracks().len(),
            "Short creator started"
        );

        Ok(Self {
            queue,
            ctx,
            shutdown,
            worker: Mutex::new(Some(worker)),
        })
    }

    /// Validate a script and queue it for rendering.
    pub async fn enqueue(
        &self,
        scenes: Vec<SceneInput>,
        config: RenderConfig,
    ) -> WorkerResult<JobId> {
        let request = ShortRequest::new(scenes, config);
        request.validate()?;

        let job = Job::new(request.scenes, request.config);
        let id = self.queue.enqueue(job).await?;
        metrics::counter!("shorts_jobs_enqueued_total").increment(1);
        Ok(id)
    }

    /// Processing while queued or rendering, Ready once the video exists.
    pub async fn status(&self, id: &JobId) -> VideoStatus {
        if self.queue.contains(id).await {
            VideoStatus::Processing
        } else if self.ctx.store.exists(id).await {
            VideoStatus::Ready
        } else {
            VideoStatus::Failed
        }
    }

    /// Last known state of a job submitted to this process.
    pub async fn job_state(&self, id: &JobId) -> Option<JobRecord> {
        self.queue.record(id).await
    }

    /// Zero-based queue position; 0 is the job being rendered.
    pub async fn queue_position(&self, id: &JobId) -> Option<usize> {
        self.queue.position(id).await
    }

    pub async fn get_video(&self, id: &JobId) -> WorkerResult<Vec<u8>> {
        Ok(self.ctx.store.read(id).await?)
    }

    /// Remove a rendered video and its job record. A missing video is not an error.
    pub async fn delete_video(&self, id: &JobId) -> WorkerResult<()> {
        self.ctx.store.delete(id).await?;
        self.queue.forget(id).await;
        info!(job_id = %id, "Deleted video");
        Ok(())
    }

    pub fn video_path(&self, id: &JobId) -> PathBuf {
        self.ctx.store.video_path(id)
    }

    pub fn list_music_tags(&self) -> BTreeSet<MusicMood> {
        self.ctx.music.moods()
    }

    /// Stop the worker after the job in flight, if any, finishes.
    ///
    /// Jobs still waiting are recorded as failed and report `Failed`.
    pub async fn shutdown(&self) {
        let _ = self.shutdown.send(true);

        let Some(handle) = self.worker.lock().await.take() else {
            return;
        };

        match tokio::time::timeout(self.ctx.config.shutdown_timeout, handle).await {
            Ok(Ok(())) => info!("Short creator stopped"),
            Ok(Err(e)) => warn!("Worker task ended abnormally: {}", e),
            Err(_) => warn!(
                timeout_secs = self.ctx.config.shutdown_timeout.as_secs(),
                "Timed out waiting for the worker to stop"
            ),
        }
    }
}
