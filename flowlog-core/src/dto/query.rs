//! Query parameters for log listing

use serde::{Deserialize, Serialize};

/// `?cursor=...&limit=...` on the list endpoints
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListQuery {
    /// Opaque token returned as `nextPage` by a previous call
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,

    /// Maximum entries to return; the server applies its default when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}
