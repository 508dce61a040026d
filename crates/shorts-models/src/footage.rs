//! Stock footage models.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A stock footage clip chosen for a scene.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct FootageItem {
    /// Provider-side clip id, unique per provider
    pub id: String,

    /// Direct link to the chosen file variant
    pub url: String,

    pub width: u32,
    pub height: u32,
}
