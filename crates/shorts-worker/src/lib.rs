//! Short video generation worker.
//!
//! This crate provides:
//! - `ShortCreator`, the entry point callers enqueue scripts with
//! - A single-task job executor draining the in-process queue in FIFO order
//! - The per-scene pipeline (speech, captions, footage, music, render)
//! - Music selection by mood
//! - Structured job logging and tracing setup

pub mod config;
pub mod creator;
pub mod error;
pub mod executor;
pub mod logging;
pub mod music;
pub mod processor;

pub use config::WorkerConfig;
pub use creator::ShortCreator;
pub use error::{WorkerError, WorkerResult};
pub use executor::JobExecutor;
pub use logging::{init_tracing, load_env, JobLogger};
pub use music::MusicSelector;
pub use processor::{process_job, Engines, ProcessingContext};
