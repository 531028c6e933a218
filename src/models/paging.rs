//! Pagination types
//!
//! Skip/limit parameters for listings and the envelope that pairs a page of
//! items with the total count.

use serde::{Deserialize, Serialize};

/// Pagination parameters expressed as skip/limit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ListParams {
    /// Rows to skip before the first returned item
    pub skip: i64,
    /// Maximum rows to return
    pub limit: i64,
}

impl ListParams {
    /// Create parameters, clamping negatives to zero and the limit to `max`.
    pub fn new(skip: i64, limit: i64) -> Self {
        Self {
            skip: skip.max(0),
            limit: limit.clamp(0, Self::MAX_LIMIT),
        }
    }

    /// Hard cap on page size.
    pub const MAX_LIMIT: i64 = 100;
}

impl Default for ListParams {
    fn default() -> Self {
        Self { skip: 0, limit: 20 }
    }
}

/// A page of items together with the total row count for the scope.
#[derive(Debug, Clone, Serialize)]
pub struct PagedResult<T> {
    pub items: Vec<T>,
    /// Total matching rows across all pages
    pub total: i64,
    pub skip: i64,
    pub limit: i64,
}

impl<T> PagedResult<T> {
    pub fn new(items: Vec<T>, total: i64, params: &ListParams) -> Self {
        Self {
            items,
            total,
            skip: params.skip,
            limit: params.limit,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether rows exist beyond this page.
    pub fn has_more(&self) -> bool {
        self.skip + (self.items.len() as i64) < self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_params_clamping() {
        let params = ListParams::new(-5, 50);
        assert_eq!(params.skip, 0);
        assert_eq!(params.limit, 50);

        let params = ListParams::new(10, 500);
        assert_eq!(params.limit, ListParams::MAX_LIMIT);

        let params = ListParams::new(0, -1);
        assert_eq!(params.limit, 0);
    }

    #[test]
    fn test_paged_result_has_more() {
        let params = ListParams::new(0, 2);
        let page = PagedResult::new(vec![1, 2], 5, &params);
        assert!(page.has_more());
        assert_eq!(page.len(), 2);

        let params = ListParams::new(4, 2);
        let page = PagedResult::new(vec![5], 5, &params);
        assert!(!page.has_more());
    }

    #[test]
    fn test_paged_result_empty() {
        let params = ListParams::new(0, 10);
        let page: PagedResult<i64> = PagedResult::new(vec![], 0, &params);
        assert!(page.is_empty());
        assert!(!page.has_more());
    }
}
