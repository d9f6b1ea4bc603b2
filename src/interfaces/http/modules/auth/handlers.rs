//! Authentication API handlers
//!
//! Sign-up and password reset are two-step flows: an e-mailed code is
//! exchanged at `/verify` for a ticket, which the final step presents.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Extension, Json,
};
use validator::Validate;

use super::dto::{
    ChangePasswordRequest, ForgotPasswordRequest, LoginRequest, LoginResponse, OnboardingRequest,
    RegisterRequest, ResetPasswordRequest, UserInfo, VerificationStarted, VerifyRequest,
    VerifyResponse,
};
use crate::application::{OnboardingInput, Services};
use crate::interfaces::http::common::{
    validation_error, ApiError, ApiResponse, ApiResult, EmptyData, ValidatedJson,
};
use crate::interfaces::http::middleware::AuthenticatedUser;

#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 202, description = "Verification code sent", body = ApiResponse<VerificationStarted>),
        (status = 409, description = "Email already registered"),
        (status = 422, description = "Validation error"),
        (status = 503, description = "Email delivery failed")
    )
)]
pub async fn register(
    State(services): State<Services>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<VerificationStarted>>), ApiError> {
    let redirect = services.users.register(&request.email).await?;
    Ok((
        StatusCode::ACCEPTED,
        Json(ApiResponse::success(VerificationStarted { redirect })),
    ))
}

async fn verify(services: &Services, request: VerifyRequest) -> ApiResult<VerifyResponse> {
    let ticket = services
        .users
        .verify(request.kind, &request.target, &request.code)
        .await?;

    Ok(Json(ApiResponse::success(VerifyResponse {
        ticket,
        purpose: request.kind,
        expires_in: services.verification.ticket_ttl_seconds(),
    })))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/verify",
    tag = "Authentication",
    request_body = VerifyRequest,
    responses(
        (status = 200, description = "Code accepted", body = ApiResponse<VerifyResponse>),
        (status = 400, description = "Invalid or expired code")
    )
)]
pub async fn verify_code(
    State(services): State<Services>,
    ValidatedJson(request): ValidatedJson<VerifyRequest>,
) -> ApiResult<VerifyResponse> {
    verify(&services, request).await
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/verify",
    tag = "Authentication",
    params(VerifyRequest),
    responses(
        (status = 200, description = "Code accepted", body = ApiResponse<VerifyResponse>),
        (status = 400, description = "Invalid or expired code"),
        (status = 422, description = "Malformed code")
    )
)]
pub async fn verify_link(
    State(services): State<Services>,
    Query(request): Query<VerifyRequest>,
) -> ApiResult<VerifyResponse> {
    request.validate().map_err(|e| validation_error(&e))?;
    verify(&services, request).await
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/onboarding",
    tag = "Authentication",
    request_body = OnboardingRequest,
    responses(
        (status = 201, description = "Account created", body = ApiResponse<LoginResponse>),
        (status = 400, description = "Passwords do not match or invalid username"),
        (status = 401, description = "Invalid or expired ticket"),
        (status = 409, description = "Username or email already exists")
    )
)]
pub async fn complete_onboarding(
    State(services): State<Services>,
    ValidatedJson(request): ValidatedJson<OnboardingRequest>,
) -> Result<(StatusCode, Json<ApiResponse<LoginResponse>>), ApiError> {
    let auth = services
        .users
        .complete_onboarding(OnboardingInput {
            ticket: request.ticket,
            username: request.username,
            name: request.name,
            password: request.password,
            confirm_password: request.confirm_password,
            remember_me: request.remember_me,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(LoginResponse::from(auth))),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Successful login", body = ApiResponse<LoginResponse>),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(services): State<Services>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<LoginResponse> {
    let auth = services
        .users
        .login(&request.login, &request.password, request.remember_me)
        .await?;
    Ok(Json(ApiResponse::success(LoginResponse::from(auth))))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/forgot-password",
    tag = "Authentication",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 202, description = "A code was sent if the account exists", body = ApiResponse<EmptyData>)
    )
)]
pub async fn forgot_password(
    State(services): State<Services>,
    ValidatedJson(request): ValidatedJson<ForgotPasswordRequest>,
) -> Result<(StatusCode, Json<ApiResponse<EmptyData>>), ApiError> {
    services.users.forgot_password(&request.login).await?;
    Ok((StatusCode::ACCEPTED, Json(ApiResponse::success(EmptyData {}))))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/reset-password",
    tag = "Authentication",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password reset", body = ApiResponse<EmptyData>),
        (status = 400, description = "Passwords do not match"),
        (status = 401, description = "Invalid or expired ticket")
    )
)]
pub async fn reset_password(
    State(services): State<Services>,
    ValidatedJson(request): ValidatedJson<ResetPasswordRequest>,
) -> ApiResult<EmptyData> {
    services
        .users
        .reset_password(&request.ticket, &request.password, &request.confirm_password)
        .await?;
    Ok(Json(ApiResponse::success(EmptyData {})))
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = ApiResponse<UserInfo>),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn get_current_user(
    State(services): State<Services>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiResult<UserInfo> {
    let me = services.users.me(&user.user_id).await?;
    Ok(Json(ApiResponse::success(UserInfo::from(me))))
}

#[utoipa::path(
    put,
    path = "/api/v1/auth/change-password",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = ApiResponse<EmptyData>),
        (status = 401, description = "Invalid current password")
    )
)]
pub async fn change_password(
    State(services): State<Services>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<ChangePasswordRequest>,
) -> ApiResult<EmptyData> {
    services
        .users
        .change_password(&user.user_id, &request.current_password, &request.new_password)
        .await?;
    Ok(Json(ApiResponse::success(EmptyData {})))
}
