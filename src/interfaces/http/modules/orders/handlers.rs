//! Order history handlers (signed-in users)

use axum::{
    extract::{Path, State},
    Extension, Json,
};

use super::dto::OrderDto;
use crate::application::Services;
use crate::interfaces::http::common::{ApiResponse, ApiResult};
use crate::interfaces::http::middleware::AuthenticatedUser;

#[utoipa::path(
    get,
    path = "/api/v1/orders",
    tag = "Orders",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Own orders, newest first", body = ApiResponse<Vec<OrderDto>>),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn order_history(
    State(services): State<Services>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiResult<Vec<OrderDto>> {
    let orders = services.orders.history(&user.user_id).await?;
    Ok(Json(ApiResponse::success(
        orders.into_iter().map(OrderDto::from).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/orders/{id}",
    tag = "Orders",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order", body = ApiResponse<OrderDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_order(
    State(services): State<Services>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> ApiResult<OrderDto> {
    let order = services.orders.order_for_user(&user.user_id, &id).await?;
    Ok(Json(ApiResponse::success(OrderDto::from(order))))
}
