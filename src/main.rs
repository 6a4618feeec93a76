//! IdeaHub Auth Server
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use ideahub_auth::gateway::AuthGateway;
use ideahub_auth::identity::google::{GoogleIdTokenVerifier, GoogleTokenVerifier};
use ideahub_auth::password::hasher::PasswordHasher;
use ideahub_auth::session::manager::SessionManager;
use ideahub_auth::token::issuer::TokenIssuer;
use ideahub_core::config::AppConfig;
use ideahub_core::error::AppError;
use ideahub_database::{AccountStore, PgAccountStore};

#[tokio::main]
async fn main() {
    let env = std::env::var("IDEAHUB_ENV").unwrap_or_else(|_| "development".to_string());
    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging.
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt().json().with_env_filter(filter).with_target(true).init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

/// Main server run function.
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting IdeaHub v{}", env!("CARGO_PKG_VERSION"));

    // Database connection + migrations.
    let db_pool = ideahub_database::connection::create_pool(&config.database).await?;
    ideahub_database::migration::run_migrations(&db_pool).await?;

    let accounts: Arc<dyn AccountStore> = Arc::new(PgAccountStore::new(db_pool));

    // Auth components.
    let token_issuer = Arc::new(TokenIssuer::new(&config.auth));
    let password_hasher = Arc::new(PasswordHasher::new());
    let auth_gateway = Arc::new(AuthGateway::new(Arc::clone(&token_issuer)));

    let google_verifier: Option<Arc<dyn GoogleTokenVerifier>> = if config.google.is_configured() {
        tracing::info!("Google sign-in enabled");
        Some(Arc::new(GoogleIdTokenVerifier::new(&config.google)?))
    } else {
        tracing::info!("Google sign-in disabled (no client ID configured)");
        None
    };

    let session_manager = Arc::new(SessionManager::new(
        Arc::clone(&token_issuer),
        Arc::clone(&accounts),
        password_hasher,
        google_verifier,
    ));

    let state = ideahub_api::state::AppState {
        config: Arc::new(config.clone()),
        accounts,
        session_manager,
        auth_gateway,
    };

    let app = ideahub_api::router::build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("IdeaHub server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    tracing::info!("IdeaHub server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
