//! Application layer: use-case services over the domain repositories
//!
//! Each service receives its collaborators as trait objects; `Services`
//! wires them together once at startup and is shared by the HTTP layer.

pub mod cart;
pub mod catalog;
pub mod feedback;
pub mod identity;
pub mod orders;
pub mod ports;

use std::sync::Arc;

pub use cart::{CartEntry, CartService, CartView, CheckoutReceipt, ShopInfo};
pub use catalog::CatalogService;
pub use feedback::FeedbackService;
pub use identity::{
    start_verification_cleanup_task, AuthResult, OnboardingInput, UserService, VerificationService,
    VerificationSettings,
};
pub use orders::{Dashboard, OrderService};
pub use ports::{EmailMessage, MailError, Mailer};

use crate::config::AppConfig;
use crate::domain::RepositoryProvider;

/// All application services, cheaply cloneable.
#[derive(Clone)]
pub struct Services {
    pub catalog: Arc<CatalogService>,
    pub cart: Arc<CartService>,
    pub orders: Arc<OrderService>,
    pub users: Arc<UserService>,
    pub verification: Arc<VerificationService>,
    pub feedback: Arc<FeedbackService>,
}

impl Services {
    pub fn new(repos: Arc<dyn RepositoryProvider>, mailer: Arc<dyn Mailer>, config: &AppConfig) -> Self {
        let jwt_config = config.jwt_config();

        let verification = Arc::new(VerificationService::new(
            repos.clone(),
            mailer.clone(),
            VerificationSettings {
                code_ttl_seconds: config.verification.code_ttl_seconds,
                max_attempts: config.verification.max_attempts,
                public_url: config.server.public_url.clone(),
                shop_name: config.shop.name.clone(),
            },
            jwt_config.clone(),
        ));

        let shop = ShopInfo {
            name: config.shop.name.clone(),
            payment_instructions: config.shop.payment_instructions.clone(),
        };

        Self {
            catalog: Arc::new(CatalogService::new(repos.clone())),
            cart: Arc::new(CartService::new(repos.clone(), mailer.clone(), shop)),
            orders: Arc::new(OrderService::new(repos.clone())),
            users: Arc::new(UserService::new(
                repos,
                verification.clone(),
                jwt_config,
                config.security.bcrypt_cost,
            )),
            verification,
            feedback: Arc::new(FeedbackService::new(
                mailer,
                config.email.feedback_to.clone(),
                config.shop.name.clone(),
            )),
        }
    }
}
