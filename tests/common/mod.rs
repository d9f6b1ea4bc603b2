#![allow(dead_code)]

use std::sync::Arc;

use cafe_storefront::application::{AuthResult, OnboardingInput, Services};
use cafe_storefront::config::AppConfig;
use cafe_storefront::domain::product::NewProduct;
use cafe_storefront::domain::verification::VerificationKind;
use cafe_storefront::domain::{Product, RepositoryProvider};
use cafe_storefront::infrastructure::{init_database, DatabaseConfig, MemoryMailer, SeaOrmRepositoryProvider};
use sea_orm::DatabaseConnection;
use tempfile::TempDir;

pub const PASSWORD: &str = "correct-horse";

/// Services over a fresh SQLite file, with e-mails captured in memory.
pub struct TestApp {
    pub services: Services,
    pub repos: Arc<dyn RepositoryProvider>,
    pub mailer: MemoryMailer,
    pub db: DatabaseConnection,
    pub config: AppConfig,
    _dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cafe-test.db");
        let db = init_database(&DatabaseConfig::sqlite(&path.display().to_string()))
            .await
            .unwrap();

        let mut config = AppConfig::default();
        config.security.bcrypt_cost = 4;
        config.security.jwt_secret = "integration-test-secret".to_string();
        config.server.public_url = "http://shop.test".to_string();
        config.shop.name = "Test Cafe".to_string();
        config.shop.payment_instructions = "Pay at the counter".to_string();
        config.email.feedback_to = "owner@shop.test".to_string();

        let repos: Arc<dyn RepositoryProvider> = Arc::new(SeaOrmRepositoryProvider::new(db.clone()));
        let mailer = MemoryMailer::new();
        let services = Services::new(repos.clone(), Arc::new(mailer.clone()), &config);

        Self {
            services,
            repos,
            mailer,
            db,
            config,
            _dir: dir,
        }
    }

    /// Sign up through the e-mail verification flow.
    pub async fn sign_up(&self, email: &str, username: &str) -> AuthResult {
        self.services.users.register(email).await.unwrap();
        let code = self.mailer.last_code_for(email).expect("code e-mailed");
        let ticket = self
            .services
            .users
            .verify(VerificationKind::Onboarding, email, &code)
            .await
            .unwrap();

        self.services
            .users
            .complete_onboarding(OnboardingInput {
                ticket,
                username: username.to_string(),
                name: None,
                password: PASSWORD.to_string(),
                confirm_password: PASSWORD.to_string(),
                remember_me: false,
            })
            .await
            .unwrap()
    }

    pub async fn create_admin(&self) {
        self.services
            .users
            .ensure_default_admin("admin", "admin@shop.test", PASSWORD)
            .await
            .unwrap();
    }

    pub async fn product(&self, name: &str, price_cents: i64) -> Product {
        self.repos
            .products()
            .create(NewProduct {
                name: name.to_string(),
                description: None,
                price_cents,
                featured: false,
                image: None,
            })
            .await
            .unwrap()
    }
}
