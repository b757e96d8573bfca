//! 分页相关的数据结构

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::OrderResponse;

const DEFAULT_PAGE_SIZE: i64 = 20;
const MAX_PAGE_SIZE: i64 = 100;

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct PaginationParams {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: Some(1),
            page_size: Some(DEFAULT_PAGE_SIZE),
        }
    }
}

impl PaginationParams {
    pub fn new(page: Option<u32>, per_page: Option<u32>) -> Self {
        Self {
            page: page.map(|p| p as i64),
            page_size: per_page.map(|p| p as i64),
        }
    }

    pub fn get_page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn get_limit(&self) -> i64 {
        self.page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }

    pub fn get_offset(&self) -> i64 {
        (self.get_page() - 1) * self.get_limit()
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[aliases(PaginatedOrderResponse = PaginatedResponse<OrderResponse>)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, page: i64, page_size: i64, total: i64) -> Self {
        let total_pages = if total == 0 {
            1
        } else {
            (total + page_size - 1) / page_size
        };
        Self {
            data,
            page,
            page_size,
            total,
            total_pages,
        }
    }

    pub fn empty(params: &PaginationParams) -> Self {
        Self::new(Vec::new(), params.get_page(), params.get_limit(), 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_params() {
        let params = PaginationParams::new(Some(2), Some(10));
        assert_eq!(params.get_page(), 2);
        assert_eq!(params.get_limit(), 10);
        assert_eq!(params.get_offset(), 10);
    }

    #[test]
    fn test_pagination_params_defaults() {
        let params = PaginationParams::new(None, None);
        assert_eq!(params.get_page(), 1);
        assert_eq!(params.get_limit(), 20);
        assert_eq!(params.get_offset(), 0);
    }

    #[test]
    fn test_pagination_params_clamped() {
        let params = PaginationParams::new(Some(0), Some(1000));
        assert_eq!(params.get_page(), 1);
        assert_eq!(params.get_limit(), 100);

        let params = PaginationParams::new(Some(3), Some(0));
        assert_eq!(params.get_limit(), 1);
        assert_eq!(params.get_offset(), 2);
    }

    #[test]
    fn test_paginated_response_total_pages() {
        let page: PaginatedResponse<i32> = PaginatedResponse::new(vec![], 2, 10, 25);
        assert_eq!(page.total_pages, 3);

        let page: PaginatedResponse<i32> = PaginatedResponse::empty(&PaginationParams::default());
        assert_eq!(page.total, 0);
        assert_eq!(page.total_pages, 1);
    }
}
