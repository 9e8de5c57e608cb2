//! Cursor pagination types for history endpoints.
//!
//! Transaction history is paginated with an opaque keyset cursor rather
//! than page numbers, so a page walk stays stable while new rows are
//! appended at the head.

use serde::{Deserialize, Serialize};

/// Maximum number of items a single page may return.
pub const MAX_PAGE_LIMIT: u64 = 100;

/// Request parameters for cursor-paginated queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CursorRequest {
    /// Maximum number of items to return.
    #[serde(default = "default_limit")]
    pub limit: u64,
    /// Opaque cursor from a previous page, absent for the first page.
    #[serde(default)]
    pub cursor: Option<String>,
}

fn default_limit() -> u64 {
    20
}

impl Default for CursorRequest {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            cursor: None,
        }
    }
}

impl CursorRequest {
    /// Returns the effective limit, clamped to `1..=MAX_PAGE_LIMIT`.
    #[must_use]
    pub fn clamped_limit(&self) -> u64 {
        self.limit.clamp(1, MAX_PAGE_LIMIT)
    }
}

/// Response wrapper for cursor-paginated data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CursorPage<T> {
    /// The items in this page, newest first.
    pub data: Vec<T>,
    /// Cursor for the next page, `None` when the history is exhausted.
    pub next_cursor: Option<String>,
}

impl<T> CursorPage<T> {
    /// Creates a new cursor page.
    #[must_use]
    pub fn new(data: Vec<T>, next_cursor: Option<String>) -> Self {
        Self { data, next_cursor }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limit() {
        let req = CursorRequest::default();
        assert_eq!(req.limit, 20);
        assert!(req.cursor.is_none());
    }

    #[test]
    fn test_clamped_limit() {
        let req = CursorRequest {
            limit: 0,
            cursor: None,
        };
        assert_eq!(req.clamped_limit(), 1);

        let req = CursorRequest {
            limit: 5000,
            cursor: None,
        };
        assert_eq!(req.clamped_limit(), MAX_PAGE_LIMIT);

        let req = CursorRequest {
            limit: 25,
            cursor: None,
        };
        assert_eq!(req.clamped_limit(), 25);
    }

    #[test]
    fn test_page_exhausted_has_no_cursor() {
        let page: CursorPage<u32> = CursorPage::new(vec![1, 2, 3], None);
        assert_eq!(page.data.len(), 3);
        assert!(page.next_cursor.is_none());
    }
}
