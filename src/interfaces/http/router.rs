//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{DefaultBodyLimit, FromRef},
    middleware,
    routing::{get, patch, post, put},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::application::Services;
use crate::domain::product::MAX_IMAGE_BYTES;
use crate::domain::{CupSize, DrinkOptions, Ice, OrderStatus, Topping};
use crate::domain::verification::VerificationKind;
use crate::infrastructure::crypto::jwt::JwtConfig;
use crate::interfaces::http::common::{ApiResponse, EmptyData, PaginatedResponse};
use crate::interfaces::http::middleware::{auth_middleware, require_admin, AuthState};
use crate::interfaces::http::modules::health::HealthState;
use crate::interfaces::http::modules::metrics::{
    http_metrics_middleware, prometheus_metrics, MetricsState,
};
use crate::interfaces::http::modules::request_id::request_id_middleware;
use crate::interfaces::http::modules::{
    admin, auth, cart, feedback, health, orders, products, users,
};

/// Body cap for routes carrying a base64 image: the encoded image plus room
/// for the other JSON fields.
const IMAGE_BODY_LIMIT: usize = MAX_IMAGE_BYTES / 3 * 4 + 64 * 1024;

/// State shared by every API route; handlers pick their part via `FromRef`.
#[derive(Clone)]
pub struct AppState {
    pub services: Services,
    pub health: HealthState,
}

impl FromRef<AppState> for Services {
    fn from_ref(s: &AppState) -> Self {
        s.services.clone()
    }
}

impl FromRef<AppState> for HealthState {
    fn from_ref(s: &AppState) -> Self {
        s.health.clone()
    }
}

/// Security scheme modifier for OpenAPI
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT Bearer token from /api/v1/auth/login"))
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        // Auth
        auth::register,
        auth::verify_code,
        auth::verify_link,
        auth::complete_onboarding,
        auth::login,
        auth::forgot_password,
        auth::reset_password,
        auth::get_current_user,
        auth::change_password,
        // Users
        users::get_profile,
        users::profile_image,
        users::upload_my_image,
        users::delete_my_image,
        // Products
        products::list_products,
        products::featured_products,
        products::get_product,
        products::product_image,
        // Cart
        cart::view_cart,
        cart::add_item,
        cart::update_quantity,
        cart::remove_line,
        cart::checkout,
        // Orders
        orders::order_history,
        orders::get_order,
        // Feedback
        feedback::submit_feedback,
        // Admin
        admin::dashboard,
        admin::list_orders,
        admin::order_detail,
        admin::update_order_status,
        admin::create_product,
        admin::update_product,
        admin::retire_product,
        users::list_users,
    ),
    components(
        schemas(
            // Common
            ApiResponse<String>,
            EmptyData,
            PaginatedResponse<products::ProductDto>,
            PaginatedResponse<orders::OrderDto>,
            PaginatedResponse<users::UserDto>,
            // Domain enums
            Topping,
            Ice,
            CupSize,
            DrinkOptions,
            OrderStatus,
            VerificationKind,
            // Auth
            auth::RegisterRequest,
            auth::VerificationStarted,
            auth::VerifyRequest,
            auth::VerifyResponse,
            auth::OnboardingRequest,
            auth::LoginRequest,
            auth::LoginResponse,
            auth::UserInfo,
            auth::ForgotPasswordRequest,
            auth::ResetPasswordRequest,
            auth::ChangePasswordRequest,
            // Users
            users::UserDto,
            users::PublicProfileDto,
            // Products
            products::ProductDto,
            products::ImagePayload,
            products::CreateProductRequest,
            products::UpdateProductRequest,
            // Cart
            cart::AddToCartRequest,
            cart::UpdateQuantityRequest,
            cart::CheckoutRequest,
            cart::CartLineDto,
            cart::CartItemDto,
            cart::CartDto,
            // Orders
            orders::OrderDto,
            orders::OrderItemDto,
            orders::CheckoutReceiptDto,
            orders::UpdateStatusRequest,
            // Admin
            admin::DashboardDto,
            admin::OrderCountsDto,
            // Feedback
            feedback::FeedbackRequest,
            // Health
            health::HealthResponse,
            health::ComponentHealth,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Server health check"),
        (name = "Authentication", description = "Sign-up with e-mail verification, login, password recovery"),
        (name = "Users", description = "Public user profiles and pictures"),
        (name = "Products", description = "Menu browsing and product images"),
        (name = "Cart", description = "Cart lines and checkout"),
        (name = "Orders", description = "Purchase history"),
        (name = "Feedback", description = "Customer feedback form"),
        (name = "Admin", description = "Dashboard, order fulfilment, menu and user management"),
    ),
    info(
        title = "Cafe Storefront API",
        version = "1.0.0",
        description = "REST API for browsing the menu, ordering drinks and running the shop",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(
    services: Services,
    db: DatabaseConnection,
    jwt_config: JwtConfig,
    metrics_handle: Option<PrometheusHandle>,
) -> Router {
    let auth_state = AuthState { jwt_config };
    let state = AppState {
        services,
        health: HealthState {
            db,
            started_at: Arc::new(Instant::now()),
        },
    };

    // Public routes
    let public_routes = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/verify", get(auth::verify_link).post(auth::verify_code))
        .route("/auth/onboarding", post(auth::complete_onboarding))
        .route("/auth/login", post(auth::login))
        .route("/auth/forgot-password", post(auth::forgot_password))
        .route("/auth/reset-password", post(auth::reset_password))
        .route("/products", get(products::list_products))
        .route("/products/featured", get(products::featured_products))
        .route("/products/{id}", get(products::get_product))
        .route("/products/{id}/image", get(products::product_image))
        .route("/users/{username}/image", get(users::profile_image))
        .route("/feedback", post(feedback::submit_feedback));

    // Signed-in users
    let user_routes = Router::new()
        .route("/auth/me", get(auth::get_current_user))
        .route("/auth/change-password", put(auth::change_password))
        .route(
            "/auth/me/image",
            put(users::upload_my_image)
                .delete(users::delete_my_image)
                .layer(DefaultBodyLimit::max(IMAGE_BODY_LIMIT)),
        )
        .route("/users/{username}", get(users::get_profile))
        .route("/cart", get(cart::view_cart).post(cart::add_item))
        .route("/cart/checkout", post(cart::checkout))
        .route(
            "/cart/{line_id}",
            patch(cart::update_quantity).delete(cart::remove_line),
        )
        .route("/orders", get(orders::order_history))
        .route("/orders/{id}", get(orders::get_order))
        .layer(middleware::from_fn_with_state(
            auth_state.clone(),
            auth_middleware,
        ));

    // Admin only: auth_middleware runs first, then require_admin
    let admin_routes = Router::new()
        .route("/dashboard", get(admin::dashboard))
        .route("/orders", get(admin::list_orders))
        .route("/orders/{id}", get(admin::order_detail))
        .route("/orders/{id}/status", put(admin::update_order_status))
        .route(
            "/products",
            post(admin::create_product).layer(DefaultBodyLimit::max(IMAGE_BODY_LIMIT)),
        )
        .route(
            "/products/{id}",
            put(admin::update_product)
                .delete(admin::retire_product)
                .layer(DefaultBodyLimit::max(IMAGE_BODY_LIMIT)),
        )
        .route("/users", get(users::list_users))
        .layer(middleware::from_fn(require_admin))
        .layer(middleware::from_fn_with_state(auth_state, auth_middleware));

    let api_v1 = Router::new()
        .merge(public_routes)
        .merge(user_routes)
        .nest("/admin", admin_routes);

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut router = Router::new()
        .route("/health", get(health::health_check))
        .nest("/api/v1", api_v1)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()));

    if let Some(handle) = metrics_handle {
        let metrics_routes = Router::new()
            .route("/metrics", get(prometheus_metrics))
            .with_state(MetricsState { handle });
        router = router.merge(metrics_routes);
    }

    router
        .layer(middleware::from_fn(http_metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
}
