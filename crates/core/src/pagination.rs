//! Offset pagination shared by the list and search endpoints.

use serde::Serialize;

/// Fixed page size for every paginated project listing.
pub const PAGE_SIZE: i64 = 12;

/// A 1-based page request. Anything unparsable or below 1 becomes page 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: i64,
}

impl PageRequest {
    pub fn new(page: i64) -> Self {
        Self { page: page.max(1) }
    }

    /// Lenient parse of a `?page=` query value.
    pub fn from_query(raw: Option<&str>) -> Self {
        let page = raw
            .and_then(|p| p.trim().parse::<i64>().ok())
            .unwrap_or(1);
        Self::new(page)
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn limit(&self) -> i64 {
        PAGE_SIZE
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(PAGE_SIZE)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1)
    }
}

/// Pagination metadata returned alongside a page of results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub total: i64,
    pub page: i64,
    pub pages: i64,
    pub limit: i64,
}

impl Pagination {
    pub fn new(total: i64, request: PageRequest) -> Self {
        let limit = request.limit();
        Self {
            total,
            page: request.page(),
            pages: (total + limit - 1) / limit,
            limit,
        }
    }
}
