//! Footage provider seam.

use async_trait::async_trait;

use crate::error::FootageResult;
use crate::types::ProviderVideo;

/// A stock footage search backend.
///
/// Implementations return every hit for `term` in portrait orientation and
/// leave filtering to the selector.
#[async_trait]
pub trait FootageProvider: Send + Sync {
    async fn search(&self, term: &str) -> FootageResult<Vec<ProviderVideo>>;

    /// Provider name for logging.
    fn name(&self) -> &'static str;
}

