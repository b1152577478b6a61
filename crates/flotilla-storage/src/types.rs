//! Shared pagination and filter types used by the repository traits.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use flotilla_core::PayableSource;

/// A page request from a list endpoint.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PageRequest {
    /// 1-based page number.
    pub page: u32,
    /// Rows per page.
    pub per_page: u32,
}

impl PageRequest {
    pub const DEFAULT_PER_PAGE: u32 = 25;
    pub const MAX_PER_PAGE: u32 = 200;

    /// Builds a request, clamping out-of-range values instead of failing.
    #[must_use]
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.clamp(1, Self::MAX_PER_PAGE),
        }
    }

    /// SQL OFFSET for this page.
    #[must_use]
    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.per_page)
    }

    /// SQL LIMIT for this page.
    #[must_use]
    pub fn limit(&self) -> i64 {
        i64::from(self.per_page)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, Self::DEFAULT_PER_PAGE)
    }
}

/// One page of results plus the total count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub per_page: u32,
    pub total: i64,
}

impl<T> Page<T> {
    #[must_use]
    pub fn new(items: Vec<T>, request: PageRequest, total: i64) -> Self {
        Self {
            items,
            page: request.page,
            per_page: request.per_page,
            total,
        }
    }

    /// Whether pages beyond this one exist.
    #[must_use]
    pub fn has_more(&self) -> bool {
        i64::from(self.page) * i64::from(self.per_page) < self.total
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            per_page: self.per_page,
            total: self.total,
        }
    }
}

/// Filters accepted by the trip list endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TripFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub project_id: Option<Uuid>,
    pub vehicle_id: Option<Uuid>,
}

/// Filters accepted by the payables list endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PayableFilter {
    pub source: Option<PayableSource>,
    /// Only rows past due date with a nonzero balance, as of this date.
    pub overdue_as_of: Option<NaiveDate>,
    pub provider_identification: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_request_clamps() {
        let req = PageRequest::new(0, 0);
        assert_eq!(req.page, 1);
        assert_eq!(req.per_page, 1);

        let req = PageRequest::new(3, 10_000);
        assert_eq!(req.per_page, PageRequest::MAX_PER_PAGE);
    }

    #[test]
    fn test_page_request_offset() {
        let req = PageRequest::new(3, 25);
        assert_eq!(req.offset(), 50);
        assert_eq!(req.limit(), 25);
    }

    #[test]
    fn test_page_has_more() {
        let req = PageRequest::new(1, 10);
        let page = Page::new(vec![0u8; 10], req, 25);
        assert!(page.has_more());

        let req = PageRequest::new(3, 10);
        let page = Page::new(vec![0u8; 5], req, 25);
        assert!(!page.has_more());
    }

    #[test]
    fn test_page_map_preserves_metadata() {
        let page = Page::new(vec![1, 2, 3], PageRequest::new(2, 3), 9).map(|n| n * 2);
        assert_eq!(page.items, vec![2, 4, 6]);
        assert_eq!(page.page, 2);
        assert_eq!(page.total, 9);
    }
}
