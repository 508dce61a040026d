//! Ledger records for queued jobs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shorts_models::JobState;

/// Last known state of a job in this process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    pub state: JobState,

    /// Failure reason, set when `state` is `Failed`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    pub updated_at: DateTime<Utc>,
}

impl JobRecord {
    pub fn queued() -> Self {
        Self {
            state: JobState::Queued,
            error: None,
            updated_at: Utc::now(),
        }
    }

    pub(crate) fn transition(&mut self, state: JobState, error: Option<String>) {
        self.state = state;
        self.error = error;
        self.updated_at = Utc::now();
    }
}
