//! Pagination types for list endpoints.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::config::{DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// Pagination query parameters, reusable across all list endpoints
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationParams {
    /// 1-indexed page number
    #[serde(default = "default_page")]
    pub page: u64,
    /// Items per page
    #[serde(default = "default_limit")]
    pub limit: u64,
}

fn default_page() -> u64 {
    DEFAULT_PAGE_NUMBER
}

fn default_limit() -> u64 {
    DEFAULT_PAGE_SIZE
}

impl PaginationParams {
    /// Zero-indexed page for the database paginator
    pub fn page_index(&self) -> u64 {
        self.page.saturating_sub(1)
    }

    /// Get limit capped at maximum
    pub fn limit(&self) -> u64 {
        self.limit.clamp(1, MAX_PAGE_SIZE)
    }
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE_NUMBER,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Pagination metadata attached to list responses
#[derive(Debug, Serialize, ToSchema)]
pub struct PageMeta {
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
    pub total_data: u64,
}

impl PageMeta {
    /// Build metadata from the request parameters and a total row count
    pub fn new(params: &PaginationParams, total: u64) -> Self {
        let limit = params.limit();
        let total_pages = total.div_ceil(limit);

        Self {
            page: params.page,
            limit,
            total_pages,
            total_data: total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_index_is_zero_based() {
        let params = PaginationParams { page: 3, limit: 10 };
        assert_eq!(params.page_index(), 2);
    }

    #[test]
    fn page_index_saturates_at_zero() {
        let params = PaginationParams { page: 0, limit: 10 };
        assert_eq!(params.page_index(), 0);
    }

    #[test]
    fn limit_is_capped() {
        let params = PaginationParams { page: 1, limit: 10_000 };
        assert_eq!(params.limit(), MAX_PAGE_SIZE);
    }

    #[test]
    fn meta_rounds_total_pages_up() {
        let params = PaginationParams { page: 1, limit: 10 };
        let meta = PageMeta::new(&params, 21);
        assert_eq!(meta.total_pages, 3);
        assert_eq!(meta.total_data, 21);
    }

    #[test]
    fn meta_for_empty_result() {
        let params = PaginationParams::default();
        let meta = PageMeta::new(&params, 0);
        assert_eq!(meta.total_pages, 0);
    }
}
