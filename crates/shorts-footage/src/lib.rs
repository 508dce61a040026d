//! Stock footage search and clip selection.
//!
//! This crate provides:
//! - The `FootageProvider` seam and its Pexels HTTP implementation
//! - `FootageSelector`, which walks shuffled search terms with generic
//!   fallback terms, retries timeouts and picks a qualifying vertical clip

pub mod client;
pub mod error;
pub mod provider;
pub mod selector;
pub mod types;

pub use client::{PexelsClient, PexelsConfig};
pub use error::{FootageError, FootageResult};
pub use provider::FootageProvider;
pub use selector::{effective_duration, qualifying_videos, FootageSelector, SelectorConfig};
pub use types::{ProviderVideo, VideoFile};
