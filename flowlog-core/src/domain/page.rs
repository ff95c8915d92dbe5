//! Paginated result sets

use serde::{Deserialize, Serialize};

/// One page of a larger ordered result
///
/// `next_page` is `None` exactly when `payload` reaches the end of the
/// matched collection. It serializes as `null` rather than being omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub payload: Vec<T>,
    pub next_page: Option<String>,
}

impl<T> Page<T> {
    pub fn empty() -> Self {
        Self {
            payload: Vec::new(),
            next_page: None,
        }
    }

    pub fn is_last(&self) -> bool {
        self.next_page.is_none()
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self::empty()
    }
}
