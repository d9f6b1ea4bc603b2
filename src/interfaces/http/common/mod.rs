//! Shared HTTP building blocks: envelopes, error mapping, validated JSON

pub mod error;
pub mod response;
pub mod validated_json;

pub use error::{ApiError, ApiResult};
pub use response::{ApiResponse, EmptyData, PageQuery, PaginatedResponse};
pub use validated_json::{validation_error, ValidatedJson};
