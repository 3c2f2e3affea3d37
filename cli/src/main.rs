//! Bookings CLI server
//!
//! ```sh
//! # Default config (~/.config/bookings/config.toml)
//! bookings-service
//!
//! # Custom config and port
//! bookings-service --config /etc/bookings/config.toml --port 9090
//!
//! # Validate config without starting
//! bookings-service --check
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use bookings::config::{AppConfig, CONFIG_ENV};
use bookings::server::{init_tracing, ServerHandle, ServerOptions};

#[derive(Parser, Debug)]
#[command(
    name = "bookings-service",
    version,
    about = "Room booking site: availability search, reservations and back-office",
    long_about = "Room booking web application.\n\n\
                  Default config: ~/.config/bookings/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = CONFIG_ENV)]
    config: Option<PathBuf>,

    /// Override the HTTP listen port.
    #[arg(short, long)]
    port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration and exit.
    #[arg(long)]
    check: bool,

    /// Skip database migrations on startup.
    #[arg(long)]
    no_migrate: bool,

    /// Skip creating the default admin user.
    #[arg(long)]
    no_admin: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config_path = cli.config.unwrap_or_else(bookings::default_config_path);

    let (mut config, load_error) = match AppConfig::load(&config_path) {
        Ok(cfg) => (cfg, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }
    init_tracing(&config);

    match load_error {
        None => info!("Configuration loaded from {}", config_path.display()),
        Some(e) if cli.check => {
            error!("{}", e);
            return Err(e.into());
        }
        Some(e) => {
            error!("{}", e);
            error!("Using default configuration.");
        }
    }

    if let Some(port) = cli.port {
        info!("CLI override: port = {}", port);
        config.server.port = port;
    }

    if cli.check {
        println!("Configuration is valid");
        println!("   Config file : {}", config_path.display());
        println!("   Address     : {}", config.server.address());
        println!("   Database    : {}", config.database.url);
        println!("   Static dir  : {}", config.server.static_dir);
        println!("   Log level   : {}", config.logging.level);
        return Ok(());
    }

    let handle = ServerHandle::start(ServerOptions {
        config,
        auto_migrate: !cli.no_migrate,
        create_default_admin: !cli.no_admin,
    })
    .await?;

    handle.install_signal_handler();
    info!("Press Ctrl+C to shut down.");

    handle.shutdown_signal().wait().await;
    handle.wait().await;

    Ok(())
}
