//! Portfolio Backend
//!
//! Serves account registration, token login and self-introduction documents.

use anyhow::{Context, Result};
use clap::Parser;
use dotenv::dotenv;
use std::path::Path;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use portfolio_backend::{build_router, AppState, Config, Database};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize environment and logging
    load_env();
    init_tracing();

    let config = Config::parse();
    config.validate().context("Invalid configuration")?;

    info!("🚀 Portfolio backend starting");

    if config.uses_dev_secret() {
        warn!("⚠️  JWT_SECRET not set, using the development secret. Do not run this in production.");
    }

    let db = Database::open(&config.database_path)
        .with_context(|| format!("Failed to open database at {}", config.database_path))?;
    info!("💾 Database ready at: {}", config.database_path);
    info!(
        "🔐 Tokens valid for {}s, page size {} (max {})",
        config.jwt_expiration_secs, config.page_size_default, config.page_size_max
    );

    let addr = config.bind_addr.clone();
    let app = build_router(AppState::new(config, db));

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("🎯 API server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("👋 Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "portfolio_backend=debug,portfolio=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn load_env() {
    // Standard dotenv search (cwd + parents)
    let _ = dotenv();

    // Also try the crate root when launched from elsewhere
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    let env_file = manifest_dir.join(".env");
    if env_file.exists() {
        let _ = dotenv::from_path(&env_file);
    }
}
