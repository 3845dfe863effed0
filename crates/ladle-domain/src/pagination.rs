//! Pagination types shared by all list endpoints.

use serde::{Deserialize, Serialize};

/// Pagination parameters shared across all list endpoints.
///
/// - `limit`: page size, 1–100, default 6
/// - `page`: ≥ 1, default 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default = "default_page")]
    pub page: u32,
}

fn default_limit() -> u32 {
    6
}

fn default_page() -> u32 {
    1
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            page: default_page(),
        }
    }
}

impl PageRequest {
    /// Clamp `limit` to the valid range 1–100 and `page` to ≥ 1.
    ///
    /// Call after deserializing from query params to enforce bounds.
    pub fn clamped(self) -> Self {
        Self {
            limit: self.limit.clamp(1, 100),
            page: self.page.max(1),
        }
    }

    /// Row offset of the first item on this page.
    ///
    /// Computed in u64 so a huge `page` cannot overflow.
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }

    /// Whether a page after this one exists for `count` total rows.
    pub fn has_next(&self, count: u64) -> bool {
        self.offset() + u64::from(self.limit) < count
    }
}

/// One page of results together with the total row count.
#[derive(Debug, Clone)]
pub struct Paginated<T> {
    pub count: u64,
    pub items: Vec<T>,
}
