//! Response envelopes shared by every JSON endpoint

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::shared::{PaginatedResult, PaginationParams};

/// Standard API envelope
///
/// On success: `{"success": true, "data": {...}}`,
/// on failure: `{"success": false, "data": null, "error": "..."}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    /// Payload; `null` on error
    pub data: Option<T>,
    /// Error description; omitted on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Empty payload for operations without return data
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct EmptyData {}

/// Paging query parameters
#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
pub struct PageQuery {
    /// Page number, 1-based. Default: 1
    pub page: Option<u32>,
    /// Items per page (1-100). Default: 20
    pub limit: Option<u32>,
}

impl PageQuery {
    pub fn to_params(&self) -> PaginationParams {
        PaginationParams::new(self.page, self.limit)
    }
}

/// Paginated list
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    /// Total matching items across all pages
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
}

impl<T> PaginatedResponse<T> {
    pub fn from_result<U>(result: PaginatedResult<U>, f: impl FnMut(U) -> T) -> Self {
        Self {
            items: result.items.into_iter().map(f).collect(),
            total: result.total,
            page: result.page,
            limit: result.limit,
            total_pages: result.total_pages,
        }
    }
}
