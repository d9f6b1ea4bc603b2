//! Storefront server runtime.
//!
//! [`ServerHandle`] owns the full lifecycle: database connect + migrate,
//! default admin, optional demo seeding, background cleanup, the REST API,
//! metrics and graceful shutdown.

use std::net::SocketAddr;
use std::sync::{Arc, OnceLock};

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use sea_orm::DatabaseConnection;
use tracing::{error, info, warn};

use crate::application::ports::Mailer;
use crate::application::{start_verification_cleanup_task, Services};
use crate::config::AppConfig;
use crate::domain::RepositoryProvider;
use crate::infrastructure::database::seed::seed_demo_catalog;
use crate::infrastructure::{build_mailer, init_database, SeaOrmRepositoryProvider};
use crate::interfaces::http::create_api_router;
use crate::shared::shutdown::{ShutdownCoordinator, ShutdownSignal};

// ── Options ────────────────────────────────────────────────────────

/// Options for starting the storefront.
pub struct ServerOptions {
    pub config: AppConfig,
    /// Create the configured admin account if no user exists (default: true).
    pub create_default_admin: bool,
    /// Insert the demo drinks that are missing from the menu (default: false).
    pub seed_demo_catalog: bool,
    /// Use this mailer instead of the one selected in `[email]`.
    pub mailer: Option<Arc<dyn Mailer>>,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            config: AppConfig::default(),
            create_default_admin: true,
            seed_demo_catalog: false,
            mailer: None,
        }
    }
}

// ── ServerHandle ───────────────────────────────────────────────────

/// Handle to a running storefront.
///
/// ```rust,no_run
/// use cafe_storefront::server::{ServerHandle, ServerOptions};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let handle = ServerHandle::start(ServerOptions::default()).await?;
///     handle.install_signal_handler();
///     handle.shutdown_signal().wait().await;
///     handle.wait().await;
///     Ok(())
/// }
/// ```
pub struct ServerHandle {
    pub repos: Arc<dyn RepositoryProvider>,
    pub services: Services,
    /// The configuration the server was started with.
    pub config: AppConfig,
    /// Address the REST API is bound to.
    pub local_addr: SocketAddr,

    db: DatabaseConnection,
    shutdown: ShutdownCoordinator,
    api_task: tokio::task::JoinHandle<()>,
    cleanup_task: tokio::task::JoinHandle<()>,
}

impl ServerHandle {
    pub async fn start(opts: ServerOptions) -> Result<Self, Box<dyn std::error::Error>> {
        let app_cfg = opts.config;

        info!(shop = %app_cfg.shop.name, "Starting cafe storefront...");

        let prometheus_handle = prometheus_handle();

        // ── Database ───────────────────────────────────────────
        let db = init_database(&app_cfg.database.to_database_config()).await?;
        let repos: Arc<dyn RepositoryProvider> =
            Arc::new(SeaOrmRepositoryProvider::new(db.clone()));

        // ── Services ───────────────────────────────────────────
        let mailer = match opts.mailer {
            Some(mailer) => mailer,
            None => build_mailer(&app_cfg.email)?,
        };
        info!(provider = ?app_cfg.email.provider, "Mailer ready");

        let services = Services::new(repos.clone(), mailer, &app_cfg);

        if opts.create_default_admin {
            if let Err(e) = services
                .users
                .ensure_default_admin(
                    &app_cfg.admin.username,
                    &app_cfg.admin.email,
                    &app_cfg.admin.password,
                )
                .await
            {
                error!(error = %e, "Failed to create default admin");
            }
        }

        if opts.seed_demo_catalog {
            let inserted = seed_demo_catalog(repos.as_ref()).await?;
            info!(inserted, "Demo catalog ready");
        }

        // ── Shutdown + background tasks ────────────────────────
        let shutdown = ShutdownCoordinator::new(app_cfg.server.shutdown_timeout);
        let shutdown_signal = shutdown.signal();

        let cleanup_task = start_verification_cleanup_task(
            services.verification.clone(),
            shutdown_signal.clone(),
            app_cfg.verification.cleanup_interval_seconds,
        );

        // ── REST API server ────────────────────────────────────
        let api_router = create_api_router(
            services.clone(),
            db.clone(),
            app_cfg.jwt_config(),
            prometheus_handle,
        );

        let api_addr = format!("{}:{}", app_cfg.server.api_host, app_cfg.server.api_port);
        let listener = tokio::net::TcpListener::bind(&api_addr).await?;
        let local_addr = listener.local_addr()?;
        info!("REST API server listening on http://{}", local_addr);
        info!("Swagger UI available at http://{}/docs/", local_addr);

        let api_shutdown = shutdown_signal.clone();
        let api_server = axum::serve(
            listener,
            api_router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(async move {
            api_shutdown.wait().await;
            info!("REST API server received shutdown signal");
        });

        let api_task = tokio::spawn(async move {
            if let Err(e) = api_server.await {
                error!("REST API server error: {}", e);
            }
        });

        Ok(Self {
            repos,
            services,
            config: app_cfg,
            local_addr,
            db,
            shutdown,
            api_task,
            cleanup_task,
        })
    }

    /// Get a cloneable shutdown signal.
    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.signal()
    }

    /// Install OS signal listeners (SIGTERM, SIGINT) that trigger shutdown.
    pub fn install_signal_handler(&self) {
        self.shutdown.start_signal_listener();
    }

    /// Trigger graceful shutdown (non-blocking).
    pub fn trigger_shutdown(&self) {
        self.shutdown.signal().trigger();
    }

    /// Wait for the server to fully stop after shutdown has been triggered.
    pub async fn wait(self) {
        let Self {
            db,
            shutdown,
            api_task,
            cleanup_task,
            ..
        } = self;

        let finished = shutdown
            .shutdown_with_cleanup(|| async move {
                if let Err(e) = api_task.await {
                    error!("REST API server task panicked: {}", e);
                }
                if let Err(e) = cleanup_task.await {
                    error!("Cleanup task panicked: {}", e);
                }
            })
            .await;
        if !finished {
            warn!("Some tasks did not stop in time");
        }

        if let Err(e) = db.close().await {
            warn!("Error closing database connection: {}", e);
        } else {
            info!("Database connection closed");
        }

        info!("Cafe storefront shutdown complete");
    }

    /// Trigger shutdown and wait for completion.
    pub async fn shutdown(self) {
        info!("Shutting down cafe storefront...");
        self.trigger_shutdown();
        self.wait().await;
    }

    pub fn is_running(&self) -> bool {
        !self.api_task.is_finished()
    }
}

// ── Helpers ────────────────────────────────────────────────────────

/// The global recorder can only be installed once per process; a restart
/// within the same process reuses it.
fn prometheus_handle() -> Option<PrometheusHandle> {
    static PROM_HANDLE: OnceLock<Option<PrometheusHandle>> = OnceLock::new();

    PROM_HANDLE
        .get_or_init(|| match PrometheusBuilder::new().install_recorder() {
            Ok(handle) => {
                info!("Prometheus metrics recorder installed");
                Some(handle)
            }
            Err(e) => {
                warn!(error = %e, "Prometheus recorder unavailable, /metrics disabled");
                None
            }
        })
        .clone()
}

/// Initialize tracing (logging) from the application config.
///
/// Call this once at process startup (before [`ServerHandle::start`]).
/// `RUST_LOG` takes precedence over `logging.level`.
pub fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    match config.logging.format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }
}
