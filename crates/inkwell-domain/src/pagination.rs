//! Pagination, cursor, and sort direction types.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Generic sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Sort {
    Desc,
    Asc,
}

/// Offset pagination parameters shared across all list endpoints.
///
/// - `per_page`: 1–100, default 20
/// - `page`: ≥ 1, default 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    #[serde(default = "default_per_page", rename = "per-page")]
    pub per_page: u32,
    #[serde(default = "default_page")]
    pub page: u32,
}

fn default_per_page() -> u32 {
    20
}

fn default_page() -> u32 {
    1
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            per_page: default_per_page(),
            page: default_page(),
        }
    }
}

impl PageRequest {
    /// Clamp `per_page` to the valid range 1–100 and `page` to ≥ 1.
    ///
    /// Call after deserializing from query params to enforce bounds.
    pub fn clamped(self) -> Self {
        Self {
            per_page: self.per_page.clamp(1, 100),
            page: self.page.max(1),
        }
    }

    /// Row offset of the first item on this page.
    pub fn offset(self) -> u64 {
        let p = self.clamped();
        ((p.page - 1) * p.per_page) as u64
    }
}

/// Cursor pagination parameters for feed-style endpoints.
///
/// `after` is the id of the last row the caller has already seen; the next
/// window starts strictly after it. `None` starts from the newest row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CursorRequest {
    #[serde(default)]
    pub after: Option<Uuid>,
    #[serde(default = "default_per_page")]
    pub limit: u32,
}

impl CursorRequest {
    /// Clamp `limit` to the valid range 1–100.
    pub fn clamped(self) -> Self {
        Self {
            after: self.after,
            limit: self.limit.clamp(1, 100),
        }
    }
}

/// One window of a cursor-paginated result.
///
/// `next` is the cursor to pass as `after` for the following window, absent
/// when this window reached the end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CursorPage<T> {
    pub items: Vec<T>,
    pub next: Option<Uuid>,
}
