//! Application state shared across all handlers.

use std::sync::Arc;

use ideahub_auth::gateway::AuthGateway;
use ideahub_auth::session::manager::SessionManager;
use ideahub_core::config::AppConfig;
use ideahub_database::AccountStore;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`. All fields are
/// `Arc`-wrapped for cheap cloning across tasks.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Account persistence seam.
    pub accounts: Arc<dyn AccountStore>,
    /// Session lifecycle manager.
    pub session_manager: Arc<SessionManager>,
    /// Bearer token gateway for protected routes.
    pub auth_gateway: Arc<AuthGateway>,
}
