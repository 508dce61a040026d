//! FIFO job queue backed by an unbounded channel.
//!
//! Producers hold a cloneable [`JobQueue`]; exactly one [`JobReceiver`]
//! consumes it. An id stays pending from `enqueue` until the receiver calls
//! [`JobReceiver::complete`], so a job reports as pending while it waits and
//! while it runs. The ledger keeps at most `ledger_capacity` finished
//! records; the oldest are evicted first.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use tracing::{debug, info, warn};

use shorts_models::{Job, JobId, JobState};

use crate::error::{QueueError, QueueResult};
use crate::job::JobRecord;

/// Finished records kept by [`job_queue`].
pub const DEFAULT_LEDGER_CAPACITY: usize = 1000;

#[derive(Debug)]
struct QueueState {
    /// Pending ids in processing order; the head is in flight once received
    pending: VecDeque<JobId>,
    ledger: HashMap<JobId, JobRecord>,
    /// Ids with a terminal ledger record, oldest first
    finished: VecDeque<JobId>,
    ledger_capacity: usize,
}

impl QueueState {
    fn new(ledger_capacity: usize) -> Self {
        Self {
            pending: VecDeque::new(),
            ledger: HashMap::new(),
            finished: VecDeque::new(),
            ledger_capacity,
        }
    }

    fn report_depth(&self) {
        metrics::gauge!("shorts_queue_depth").set(self.pending.len() as f64);
    }

    /// Record a terminal state and evict the oldest finished records over capacity.
    fn finish(&mut self, id: &JobId, state: JobState, error: Option<String>) {
        self.pending.retain(|p| p != id);
        self.ledger
            .entry(id.clone())
            .or_insert_with(JobRecord::queued)
            .transition(state, error);

        self.finished.retain(|f| f != id);
        self.finished.push_back(id.clone());
        while self.finished.len() > self.ledger_capacity {
            if let Some(evicted) = self.finished.pop_front() {
                self.ledger.remove(&evicted);
            }
        }
    }
}

/// Create a connected queue and its single receiver.
pub fn job_queue() -> (JobQueue, JobReceiver) {
    job_queue_with_capacity(DEFAULT_LEDGER_CAPACITY)
}

/// Like [`job_queue`], keeping at most `ledger_capacity` finished records.
pub fn job_queue_with_capacity(ledger_capacity: usize) -> (JobQueue, JobReceiver) {
    let (sender, receiver) = mpsc::unbounded_channel();
    let state = Arc::new(Mutex::new(QueueState::new(ledger_capacity)));

    (
        JobQueue {
            sender,
            state: Arc::clone(&state),
        },
        JobReceiver { receiver, state },
    )
}

/// Producer side of the queue.
#[derive(Debug, Clone)]
pub struct JobQueue {
    sender: mpsc::UnboundedSender<Job>,
    state: Arc<Mutex<QueueState>>,
}

impl JobQueue {
    /// Append a job to the tail of the queue.
    pub async fn enqueue(&self, job: Job) -> QueueResult<JobId> {
        let id = job.id.clone();
        let scenes = job.scene_count();

        // Registration and send happen under one lock so pending order always
        // matches channel order.
        let mut state = self.state.lock().await;
        if state.pending.contains(&id) {
            warn!(job_id = %id, "Duplicate job rejected");
            return Err(QueueError::Duplicate(id.to_string()));
        }

        self.sender.send(job).map_err(|_| QueueError::Closed)?;
        state.pending.push_back(id.clone());
        state.ledger.insert(id.clone(), JobRecord::queued());
        state.report_depth();

        info!(
            job_id = %id,
            scenes,
            position = state.pending.len() - 1,
            "Enqueued job"
        );
        Ok(id)
    }

    /// Whether `id` is waiting or being processed.
    pub async fn contains(&self, id: &JobId) -> bool {
        self.state.lock().await.pending.contains(id)
    }

    /// Zero-based position of `id` in the queue; 0 is the job in flight.
    pub async fn position(&self, id: &JobId) -> Option<usize> {
        self.state.lock().await.pending.iter().position(|p| p == id)
    }

    /// Number of pending jobs, including the one in flight.
    pub async fn len(&self) -> usize {
        self.state.lock().await.pending.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Ledger record for `id`, if it was enqueued in this process.
    pub async fn record(&self, id: &JobId) -> Option<JobRecord> {
        self.state.lock().await.ledger.get(id).cloned()
    }

    /// Drop the finished record of `id`. Records of pending jobs are kept.
    pub async fn forget(&self, id: &JobId) {
        let mut state = self.state.lock().await;
        if state.pending.contains(id) {
            return;
        }
        state.ledger.remove(id);
        state.finished.retain(|f| f != id);
    }

    /// Number of ledger records held.
    pub async fn ledger_len(&self) -> usize {
        self.state.lock().await.ledger.len()
    }

    /// Whether the receiver is gone and no more jobs will be processed.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

/// Consumer side of the queue. There is exactly one per queue.
#[derive(Debug)]
pub struct JobReceiver {
    receiver: mpsc::UnboundedReceiver<Job>,
    state: Arc<Mutex<QueueState>>,
}

impl JobReceiver {
    /// Wait for the next job.
    ///
    /// Returns `None` once every producer is dropped and the queue is drained.
    /// Cancel safe: a job is only taken off the channel when this resolves.
    /// Call [`JobReceiver::start`] before running it.
    pub async fn next(&mut self) -> Option<Job> {
        self.receiver.recv().await
    }

    /// Mark a received job as processing.
    pub async fn start(&self, id: &JobId) {
        let mut state = self.state.lock().await;
        if let Some(record) = state.ledger.get_mut(id) {
            record.transition(JobState::Processing, None);
        }
        debug!(job_id = %id, "Dequeued job");
    }

    /// Remove a finished job from the pending set and record its outcome.
    pub async fn complete(&self, id: &JobId, outcome: Result<(), String>) {
        let mut state = self.state.lock().await;

        let (job_state, error) = match outcome {
            Ok(()) => (JobState::Completed, None),
            Err(e) => (JobState::Failed, Some(e)),
        };
        state.finish(id, job_state, error);
        state.report_depth();

        debug!(job_id = %id, state = %job_state, remaining = state.pending.len(), "Job removed from queue");
    }

    /// Stop accepting jobs and fail every job still pending with `reason`.
    ///
    /// Returns the number of jobs failed. Later `enqueue` calls fail with
    /// [`QueueError::Closed`].
    pub async fn close(&mut self, reason: &str) -> usize {
        self.receiver.close();
        while self.receiver.try_recv().is_ok() {}

        let mut state = self.state.lock().await;
        let dropped: Vec<JobId> = state.pending.iter().cloned().collect();
        for id in &dropped {
            state.finish(id, JobState::Failed, Some(reason.to_string()));
        }
        state.report_depth();

        if !dropped.is_empty() {
            warn!(jobs = dropped.len(), reason, "Failed pending jobs on close");
        }
        dropped.len()
    }
}
