//! Catalog API handlers (public)

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};

use super::dto::{ListProductsParams, ProductDto};
use crate::application::Services;
use crate::interfaces::http::common::{ApiError, ApiResponse, ApiResult, PaginatedResponse};
use crate::shared::PaginationParams;

#[utoipa::path(
    get,
    path = "/api/v1/products",
    tag = "Products",
    params(ListProductsParams),
    responses(
        (status = 200, description = "Available products, ordered by name", body = ApiResponse<PaginatedResponse<ProductDto>>)
    )
)]
pub async fn list_products(
    State(services): State<Services>,
    Query(params): Query<ListProductsParams>,
) -> ApiResult<PaginatedResponse<ProductDto>> {
    let search = params
        .search
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    let result = services
        .catalog
        .list_products(search, params.featured, PaginationParams::new(params.page, params.limit))
        .await?;

    Ok(Json(ApiResponse::success(PaginatedResponse::from_result(
        result,
        ProductDto::from,
    ))))
}

#[utoipa::path(
    get,
    path = "/api/v1/products/featured",
    tag = "Products",
    responses(
        (status = 200, description = "Featured products", body = ApiResponse<Vec<ProductDto>>)
    )
)]
pub async fn featured_products(State(services): State<Services>) -> ApiResult<Vec<ProductDto>> {
    let products = services.catalog.featured_products().await?;
    Ok(Json(ApiResponse::success(
        products.into_iter().map(ProductDto::from).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/products/{id}",
    tag = "Products",
    params(("id" = String, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product", body = ApiResponse<ProductDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_product(
    State(services): State<Services>,
    Path(id): Path<String>,
) -> ApiResult<ProductDto> {
    let product = services.catalog.get_product(&id).await?;
    Ok(Json(ApiResponse::success(ProductDto::from(product))))
}

#[utoipa::path(
    get,
    path = "/api/v1/products/{id}/image",
    tag = "Products",
    params(("id" = String, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Raw image bytes with its stored content type"),
        (status = 404, description = "Product has no image")
    )
)]
pub async fn product_image(
    State(services): State<Services>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let image = services.catalog.product_image(&id).await?;
    Ok((
        [
            (header::CONTENT_TYPE, image.content_type),
            (header::CACHE_CONTROL, "public, max-age=3600".to_string()),
        ],
        image.data,
    )
        .into_response())
}
