//! College Events Backend Service
//!
//! Main entry point. Serves the HTTP API for events, registrations,
//! budgets, schedules and notifications.

use college_events::api::build_router;
use college_events::config::{AppConfig, StorageBackend};
use college_events::database::{create_pool, run_migrations};
use college_events::repositories::MemoryStore;
use college_events::{AppError, AppState};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables first
    dotenv::dotenv().ok();

    // Load configuration
    let config = AppConfig::from_env().map_err(|e| {
        eprintln!("Configuration error: {}", e);
        AppError::Config(e)
    })?;

    init_tracing(&config);

    info!("╔══════════════════════════════════════════════════════════╗");
    info!("║         College Events Backend Starting                  ║");
    info!("╚══════════════════════════════════════════════════════════╝");
    info!("Environment: {}", config.environment);
    info!("Log level: {}", config.log_level);
    info!("HTTP port: {}", config.http_port);

    // =========================================================================
    // STORAGE SETUP
    // =========================================================================
    let state = match (&config.storage, &config.database) {
        (StorageBackend::Postgres, Some(db_config)) => {
            info!("Connecting to database...");

            let pool = create_pool(db_config).await.map_err(|e| {
                error!("Failed to create database pool: {}", e);
                AppError::Database(e)
            })?;

            info!("Database connection pool created successfully");
            info!("Max connections: {}", db_config.max_connections);

            info!("Running database migrations...");
            run_migrations(&pool, &db_config.migrations_path)
                .await
                .map_err(|e| {
                    error!("Database migration failed: {}", e);
                    AppError::Database(e)
                })?;
            info!("Database migrations completed successfully");

            AppState::new(pool)
        }
        (StorageBackend::Postgres, None) => {
            return Err(AppError::Config("DATABASE_URL is required for postgres storage".into()).into());
        }
        (StorageBackend::Memory, _) => {
            warn!("Using in-memory storage; data is lost on shutdown");
            AppState::in_memory(MemoryStore::new())
        }
    };
    info!("✓ Application state initialized");

    // =========================================================================
    // START SERVER
    // =========================================================================
    let addr: SocketAddr = format!("0.0.0.0:{}", config.http_port)
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid HTTP address: {}", e)))?;

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Message(format!("Failed to bind HTTP server: {}", e)))?;

    let router = build_router(state, config.cors_allowed_origin.as_deref());

    info!("╔══════════════════════════════════════════════════════════╗");
    info!("║         College Events Backend Ready!                    ║");
    info!("╠══════════════════════════════════════════════════════════╣");
    info!("║  HTTP API:     {}                              ║", addr);
    info!("║  Storage:      {:?}                                  ║", config.storage);
    info!("╚══════════════════════════════════════════════════════════╝");
    info!("Press Ctrl+C to shutdown gracefully");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("HTTP server error: {}", e);
            AppError::Message(format!("HTTP server error: {}", e))
        })?;

    info!("College events backend shutdown complete");
    Ok(())
}

/// JSON logs in production, human-readable otherwise. `RUST_LOG` overrides.
fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "college_events={},college_events_backend={},sqlx=warn,tower_http=info",
            config.log_level, config.log_level
        )
        .into()
    });

    if config.is_production() {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received, shutting down gracefully...");
}
