//! Cart and checkout API handlers (signed-in users)

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};

use super::dto::{AddToCartRequest, CartDto, CartLineDto, CheckoutRequest, UpdateQuantityRequest};
use crate::application::Services;
use crate::interfaces::http::common::{ApiError, ApiResponse, ApiResult, EmptyData, ValidatedJson};
use crate::interfaces::http::middleware::AuthenticatedUser;
use crate::interfaces::http::modules::orders::CheckoutReceiptDto;

#[utoipa::path(
    get,
    path = "/api/v1/cart",
    tag = "Cart",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Active cart", body = ApiResponse<CartDto>),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn view_cart(
    State(services): State<Services>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiResult<CartDto> {
    let view = services.cart.view_cart(&user.user_id).await?;
    Ok(Json(ApiResponse::success(CartDto::from(view))))
}

#[utoipa::path(
    post,
    path = "/api/v1/cart",
    tag = "Cart",
    security(("bearer_auth" = [])),
    request_body = AddToCartRequest,
    responses(
        (status = 201, description = "Line created or incremented", body = ApiResponse<CartLineDto>),
        (status = 400, description = "Invalid options or unavailable product"),
        (status = 404, description = "Product not found")
    )
)]
pub async fn add_item(
    State(services): State<Services>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<AddToCartRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CartLineDto>>), ApiError> {
    let line = services
        .cart
        .add_item(&user.user_id, &request.product_id, request.options, request.quantity)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(CartLineDto::from(line))),
    ))
}

#[utoipa::path(
    patch,
    path = "/api/v1/cart/{line_id}",
    tag = "Cart",
    security(("bearer_auth" = [])),
    params(("line_id" = String, Path, description = "Cart line ID")),
    request_body = UpdateQuantityRequest,
    responses(
        (status = 200, description = "Quantity updated", body = ApiResponse<CartLineDto>),
        (status = 400, description = "Quantity above the limit"),
        (status = 404, description = "Line not found")
    )
)]
pub async fn update_quantity(
    State(services): State<Services>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(line_id): Path<String>,
    Json(request): Json<UpdateQuantityRequest>,
) -> ApiResult<CartLineDto> {
    let line = services
        .cart
        .update_quantity(&user.user_id, &line_id, request.quantity())
        .await?;
    Ok(Json(ApiResponse::success(CartLineDto::from(line))))
}

#[utoipa::path(
    delete,
    path = "/api/v1/cart/{line_id}",
    tag = "Cart",
    security(("bearer_auth" = [])),
    params(("line_id" = String, Path, description = "Cart line ID")),
    responses(
        (status = 200, description = "Line removed", body = ApiResponse<EmptyData>),
        (status = 404, description = "Line not found")
    )
)]
pub async fn remove_line(
    State(services): State<Services>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(line_id): Path<String>,
) -> ApiResult<EmptyData> {
    services.cart.remove_line(&user.user_id, &line_id).await?;
    Ok(Json(ApiResponse::success(EmptyData {})))
}

#[utoipa::path(
    post,
    path = "/api/v1/cart/checkout",
    tag = "Cart",
    security(("bearer_auth" = [])),
    request_body = CheckoutRequest,
    responses(
        (status = 201, description = "Order placed", body = ApiResponse<CheckoutReceiptDto>),
        (status = 400, description = "Empty selection or unavailable product"),
        (status = 404, description = "Unknown cart line"),
        (status = 409, description = "Cart changed since it was displayed")
    )
)]
pub async fn checkout(
    State(services): State<Services>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<CheckoutRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CheckoutReceiptDto>>), ApiError> {
    let receipt = services
        .cart
        .checkout(&user.user_id, request.line_ids, request.expected_total_cents)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(CheckoutReceiptDto::from(receipt))),
    ))
}
