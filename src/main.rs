//! Cafe storefront: HTTP server
//!
//! ```sh
//! # Run with default config (~/.config/cafe-storefront/config.toml)
//! cafe-storefront
//!
//! # Custom config path, port override, demo menu
//! cafe-storefront --config /etc/cafe/config.toml --port 8081 --seed
//!
//! # Validate config without starting
//! cafe-storefront --check
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use cafe_storefront::config::{default_config_path, AppConfig};
use cafe_storefront::server::{init_tracing, ServerHandle, ServerOptions};

/// Online menu, cart and order management for a drinks shop.
#[derive(Parser, Debug)]
#[command(
    name = "cafe-storefront",
    version,
    about = "Cafe storefront REST API",
    long_about = "Cafe storefront: menu, cart, checkout and order management over a REST API.\n\n\
                  Default config: ~/.config/cafe-storefront/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "CAFE_CONFIG")]
    config: Option<PathBuf>,

    /// Override the REST API listen port.
    #[arg(short, long)]
    port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration file and exit without starting the server.
    #[arg(long)]
    check: bool,

    /// Insert the demo drinks menu on startup.
    #[arg(long)]
    seed: bool,

    /// Skip creating the default admin user.
    #[arg(long)]
    no_admin: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config_path = cli.config.unwrap_or_else(default_config_path);

    let mut config = match AppConfig::load(&config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            if cli.check {
                eprintln!("Configuration is invalid: {}", e);
                std::process::exit(1);
            }
            return Err(e.into());
        }
    };

    // ── Apply CLI overrides ────────────────────────────────────
    if let Some(port) = cli.port {
        config.server.api_port = port;
    }
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }

    // ── Config validation mode ─────────────────────────────────
    if cli.check {
        println!("Configuration is valid");
        println!("   Config file : {}", config_path.display());
        println!("   API address : {}:{}", config.server.api_host, config.server.api_port);
        println!("   Public URL  : {}", config.server.public_url);
        println!("   Database    : {}", config.database.connection_url());
        println!("   Mailer      : {:?}", config.email.provider);
        println!("   Log level   : {}", config.logging.level);
        return Ok(());
    }

    init_tracing(&config);
    info!("Configuration loaded from {}", config_path.display());

    let handle = match ServerHandle::start(ServerOptions {
        config,
        create_default_admin: !cli.no_admin,
        seed_demo_catalog: cli.seed,
        mailer: None,
    })
    .await
    {
        Ok(handle) => handle,
        Err(e) => {
            error!("Failed to start: {}", e);
            return Err(e);
        }
    };

    handle.install_signal_handler();
    info!("Press Ctrl+C to shutdown gracefully.");

    handle.shutdown_signal().wait().await;
    handle.wait().await;

    Ok(())
}
