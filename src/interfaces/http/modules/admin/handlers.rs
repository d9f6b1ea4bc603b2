//! Admin API handlers
//!
//! Mounted behind `auth_middleware` + `require_admin`.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::dto::DashboardDto;
use crate::application::Services;
use crate::domain::OrderStatus;
use crate::interfaces::http::common::{
    ApiError, ApiResponse, ApiResult, EmptyData, PaginatedResponse, ValidatedJson,
};
use crate::interfaces::http::modules::orders::{ListOrdersParams, OrderDto, UpdateStatusRequest};
use crate::interfaces::http::modules::products::{
    CreateProductRequest, ProductDto, UpdateProductRequest,
};
use crate::shared::PaginationParams;

#[utoipa::path(
    get,
    path = "/api/v1/admin/dashboard",
    tag = "Admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Shop statistics", body = ApiResponse<DashboardDto>),
        (status = 403, description = "Admin only")
    )
)]
pub async fn dashboard(State(services): State<Services>) -> ApiResult<DashboardDto> {
    let dashboard = services.orders.dashboard().await?;
    Ok(Json(ApiResponse::success(DashboardDto::from(dashboard))))
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/orders",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(ListOrdersParams),
    responses(
        (status = 200, description = "All orders, newest first", body = ApiResponse<PaginatedResponse<OrderDto>>),
        (status = 400, description = "Unknown status filter")
    )
)]
pub async fn list_orders(
    State(services): State<Services>,
    Query(params): Query<ListOrdersParams>,
) -> ApiResult<PaginatedResponse<OrderDto>> {
    let status = params
        .status
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(str::parse::<OrderStatus>)
        .transpose()
        .map_err(ApiError::from)?;

    let result = services
        .orders
        .list_orders(status, PaginationParams::new(params.page, params.limit))
        .await?;

    Ok(Json(ApiResponse::success(PaginatedResponse::from_result(
        result,
        OrderDto::from,
    ))))
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/orders/{id}",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order", body = ApiResponse<OrderDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn order_detail(
    State(services): State<Services>,
    Path(id): Path<String>,
) -> ApiResult<OrderDto> {
    let order = services.orders.order_detail(&id).await?;
    Ok(Json(ApiResponse::success(OrderDto::from(order))))
}

#[utoipa::path(
    put,
    path = "/api/v1/admin/orders/{id}/status",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Order ID")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status updated (or unchanged)", body = ApiResponse<OrderDto>),
        (status = 404, description = "Not found"),
        (status = 409, description = "Transition not allowed")
    )
)]
pub async fn update_order_status(
    State(services): State<Services>,
    Path(id): Path<String>,
    Json(request): Json<UpdateStatusRequest>,
) -> ApiResult<OrderDto> {
    let order = services.orders.update_status(&id, request.status).await?;
    Ok(Json(ApiResponse::success(OrderDto::from(order))))
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/products",
    tag = "Admin",
    security(("bearer_auth" = [])),
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created", body = ApiResponse<ProductDto>),
        (status = 400, description = "Invalid image"),
        (status = 409, description = "Name already used"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create_product(
    State(services): State<Services>,
    ValidatedJson(request): ValidatedJson<CreateProductRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ProductDto>>), ApiError> {
    let product = services
        .catalog
        .create_product(request.into_new_product()?)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(ProductDto::from(product))),
    ))
}

#[utoipa::path(
    put,
    path = "/api/v1/admin/products/{id}",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Product ID")),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Product updated", body = ApiResponse<ProductDto>),
        (status = 404, description = "Not found"),
        (status = 409, description = "Name already used")
    )
)]
pub async fn update_product(
    State(services): State<Services>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateProductRequest>,
) -> ApiResult<ProductDto> {
    let product = services
        .catalog
        .update_product(&id, request.into_changes()?)
        .await?;
    Ok(Json(ApiResponse::success(ProductDto::from(product))))
}

#[utoipa::path(
    delete,
    path = "/api/v1/admin/products/{id}",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product retired and removed from carts", body = ApiResponse<EmptyData>),
        (status = 404, description = "Not found")
    )
)]
pub async fn retire_product(
    State(services): State<Services>,
    Path(id): Path<String>,
) -> ApiResult<EmptyData> {
    services.catalog.retire_product(&id).await?;
    Ok(Json(ApiResponse::success(EmptyData {})))
}
