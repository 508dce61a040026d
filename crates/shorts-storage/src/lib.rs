//! Local storage for rendered videos.
//!
//! This crate provides:
//! - Artifact paths keyed by job id
//! - Existence checks, reads and deletion

pub mod error;
pub mod store;

pub use error::{StorageError, StorageResult};
pub use store::VideoStore;
