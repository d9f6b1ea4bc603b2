//! Customer feedback form

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::application::Services;
use crate::interfaces::http::common::{ApiError, ApiResponse, EmptyData, ValidatedJson};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct FeedbackRequest {
    #[validate(length(min = 1, max = 100, message = "name is required"))]
    pub name: String,
    #[validate(email(message = "invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, max = 2000, message = "feedback must be 1-2000 characters"))]
    pub feedback: String,
}

#[utoipa::path(
    post,
    path = "/api/v1/feedback",
    tag = "Feedback",
    request_body = FeedbackRequest,
    responses(
        (status = 202, description = "Feedback forwarded to the shop", body = ApiResponse<EmptyData>),
        (status = 422, description = "Validation error"),
        (status = 503, description = "Email delivery failed")
    )
)]
pub async fn submit_feedback(
    State(services): State<Services>,
    ValidatedJson(request): ValidatedJson<FeedbackRequest>,
) -> Result<(StatusCode, Json<ApiResponse<EmptyData>>), ApiError> {
    services
        .feedback
        .submit(&request.name, &request.email, &request.feedback)
        .await?;
    Ok((StatusCode::ACCEPTED, Json(ApiResponse::success(EmptyData {}))))
}
