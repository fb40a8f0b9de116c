//! User Management Service
//!
//! CRUD over an in-memory user collection, behind bearer-token auth.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ exception boundary ─▶ request id / trace ─▶ auth gate
//!                                                                    │
//!                                                                    ▼
//!                                                          logging wrapper
//!                                                                    │
//!                                                                    ▼
//!                          ┌──────────────────────────────────────────────┐
//!                          │ handlers: validate → sanitize → UserStore    │
//!                          └──────────────────────────────────────────────┘
//!     Client Response
//!     ◀────────────── (status + body logged, forwarded unchanged)
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use user_management::config::validation::validate_config;
use user_management::config::{load_config, ConfigError, ServiceConfig};
use user_management::lifecycle::startup;
use user_management::observability::logging;

#[derive(Parser)]
#[command(name = "users-api")]
#[command(about = "In-memory user management HTTP service", long_about = None)]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,
}

fn load(args: &Args) -> Result<ServiceConfig, ConfigError> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(bind) = &args.bind {
        config.listener.bind_address = bind.clone();
        validate_config(&config).map_err(ConfigError::Validation)?;
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let config = match load(&args) {
        Ok(config) => config,
        Err(e) => {
            // Logging is not up yet; the config decides its format.
            eprintln!("users-api: {e}");
            return ExitCode::FAILURE;
        }
    };

    logging::init(&config.observability);

    tracing::info!("users-api v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        max_body_size = config.limits.max_body_size,
        metrics_enabled = config.observability.metrics_enabled,
        "Configuration loaded"
    );

    if let Err(e) = startup::run(config).await {
        tracing::error!(error = %e, "Service terminated with error");
        return ExitCode::FAILURE;
    }

    tracing::info!("Shutdown complete");
    ExitCode::SUCCESS
}
