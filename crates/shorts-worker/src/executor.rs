//! Job executor.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::watch;
use tracing::{error, info, warn};

use shorts_models::Job;
use shorts_queue::JobReceiver;

use crate::error::{WorkerError, WorkerResult};
use crate::processor::{process_job, ProcessingContext};

/// Drains the job queue one job at a time.
///
/// There is exactly one executor per queue, so at most one pipeline is
/// active at any moment.
pub struct JobExecutor {
    ctx: Arc<ProcessingContext>,
    receiver: JobReceiver,
    shutdown: watch::Receiver<bool>,
}

impl JobExecutor {
    pub fn new(
        ctx: Arc<ProcessingContext>,
        receiver: JobReceiver,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            ctx,
            receiver,
            shutdown,
        }
    }

    /// Process jobs until shutdown is signalled or every producer is gone.
    ///
    /// Jobs still queued at that point are recorded as failed.
    pub async fn run(mut self) {
        info!("Starting job executor");

        loop {
            tokio::select! {
                biased;

                changed = self.shutdown.changed() => {
                    if changed.is_err() || *self.shutdown.borrow() {
                        info!("Shutdown signal received, stopping executor");
                        break;
                    }
                }
                next = self.receiver.next() => {
                    match next {
                        Some(job) => {
                            self.receiver.start(&job.id).await;
                            self.execute_job(job).await;
                        }
                        None => {
                            info!("Job queue closed, stopping executor");
                            break;
                        }
                    }
                }
            }
        }

        let dropped = self.receiver.close("Worker shut down before the job ran").await;
        info!(dropped, "Job executor stopped");
    }

    /// Run one job to completion and record its outcome.
    ///
    /// The job runs in its own task so a panic fails that job only.
    async fn execute_job(&self, job: Job) {
        let id = job.id.clone();
        let started = Instant::now();
        info!(job_id = %id, scenes = job.scene_count(), "Processing job");

        let ctx = Arc::clone(&self.ctx);
        let handle = tokio::spawn(async move { process_job(&ctx, &job).await });
        let result: WorkerResult<_> = match handle.await {
            Ok(result) => result,
            Err(e) => Err(WorkerError::JobPanicked(e.to_string())),
        };

        let elapsed = started.elapsed().as_secs_f64();
        let outcome = match result {
            Ok(path) => {
                info!(job_id = %id, path = %path.display(), elapsed_secs = elapsed, "Job completed");
                metrics::counter!("shorts_jobs_completed_total", "outcome" => "success").increment(1);
                Ok(())
            }
            Err(e) => {
                if matches!(e, WorkerError::JobPanicked(_)) {
                    error!(job_id = %id, "Job panicked: {}", e);
                } else {
                    warn!(job_id = %id, elapsed_secs = elapsed, "Job failed: {}", e);
                }
                metrics::counter!("shorts_jobs_completed_total", "outcome" => "failure").increment(1);
                Err(e.to_string())
            }
        };
        metrics::histogram!("shorts_job_duration_seconds").record(elapsed);

        self.receiver.complete(&id, outcome).await;
    }
}
