//! User API handlers
//!
//! Public profiles for signed-in users, profile pictures and the admin
//! user list.

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    Extension, Json,
};

use super::dto::{ListUsersParams, PublicProfileDto, UserDto};
use crate::application::Services;
use crate::domain::{GetUserDto, UserRole};
use crate::interfaces::http::common::{
    ApiError, ApiResponse, ApiResult, EmptyData, PaginatedResponse, ValidatedJson,
};
use crate::interfaces::http::middleware::AuthenticatedUser;
use crate::interfaces::http::modules::auth::UserInfo;
use crate::interfaces::http::modules::products::ImagePayload;

#[utoipa::path(
    get,
    path = "/api/v1/users/{username}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("username" = String, Path, description = "Username")),
    responses(
        (status = 200, description = "Public profile", body = ApiResponse<PublicProfileDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_profile(
    State(services): State<Services>,
    Path(username): Path<String>,
) -> ApiResult<PublicProfileDto> {
    let user = services.users.profile(&username).await?;
    Ok(Json(ApiResponse::success(PublicProfileDto::from(user))))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{username}/image",
    tag = "Users",
    params(("username" = String, Path, description = "Username")),
    responses(
        (status = 200, description = "Raw image bytes with its stored content type"),
        (status = 404, description = "User has no picture")
    )
)]
pub async fn profile_image(
    State(services): State<Services>,
    Path(username): Path<String>,
) -> Result<Response, ApiError> {
    let image = services.users.profile_image(&username).await?;
    Ok((
        [
            (header::CONTENT_TYPE, image.content_type),
            (header::CACHE_CONTROL, "public, max-age=3600".to_string()),
        ],
        image.data,
    )
        .into_response())
}

#[utoipa::path(
    put,
    path = "/api/v1/auth/me/image",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = ImagePayload,
    responses(
        (status = 200, description = "Picture stored", body = ApiResponse<UserInfo>),
        (status = 400, description = "Bad image"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn upload_my_image(
    State(services): State<Services>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(payload): ValidatedJson<ImagePayload>,
) -> ApiResult<UserInfo> {
    let updated = services
        .users
        .update_image(&user.user_id, payload.decode()?)
        .await?;
    Ok(Json(ApiResponse::success(UserInfo::from(updated))))
}

#[utoipa::path(
    delete,
    path = "/api/v1/auth/me/image",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Picture removed", body = ApiResponse<EmptyData>),
        (status = 404, description = "No picture to remove")
    )
)]
pub async fn delete_my_image(
    State(services): State<Services>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiResult<EmptyData> {
    services.users.remove_image(&user.user_id).await?;
    Ok(Json(ApiResponse::success(EmptyData {})))
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/users",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(ListUsersParams),
    responses(
        (status = 200, description = "User list", body = ApiResponse<PaginatedResponse<UserDto>>),
        (status = 403, description = "Admin only")
    )
)]
pub async fn list_users(
    State(services): State<Services>,
    Query(params): Query<ListUsersParams>,
) -> ApiResult<PaginatedResponse<UserDto>> {
    let role = params
        .role
        .as_deref()
        .filter(|r| !r.is_empty())
        .map(str::parse::<UserRole>)
        .transpose()
        .map_err(ApiError::from)?;

    let dto = GetUserDto {
        search: params.search,
        role,
        page: Some(params.page),
        page_size: Some(params.page_size),
        sort_by: params.sort_by,
    };

    let result = services.users.list_users(dto).await?;
    Ok(Json(ApiResponse::success(PaginatedResponse::from_result(
        result,
        UserDto::from,
    ))))
}
