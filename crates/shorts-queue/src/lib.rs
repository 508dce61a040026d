//! In-process job queue.
//!
//! This crate provides:
//! - A FIFO of jobs consumed by a single receiver
//! - Pending membership and queue position for status queries
//! - A bounded, volatile ledger of job states (lost on restart)

pub mod error;
pub mod job;
pub mod queue;

pub use error::{QueueError, QueueResult};
pub use job::JobRecord;
pub use queue::{job_queue, job_queue_with_capacity, JobQueue, JobReceiver, DEFAULT_LEDGER_CAPACITY};
