pub mod auth;
pub mod config;
pub mod db;
pub mod error;

use std::sync::Arc;

use actix_web::HttpResponse;

pub use error::{AppError, AuthError, DatabaseError};
pub type Result<T> = std::result::Result<T, AppError>;
pub use config::Settings;

pub use auth::{AuthService, AuthenticatedUser, TokenService};
pub use db::{IdentityStore, PostgresStore, User};

/// Health check endpoint handler
/// Returns a JSON response with server status and timestamp
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Application state shared across all handlers: the immutable settings
/// and the auth service, both fixed at startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Settings>,
    pub auth: Arc<AuthService>,
}

impl AppState {
    pub fn new(config: Settings, store: Arc<dyn IdentityStore>) -> Self {
        let auth = AuthService::new(
            store,
            &config.auth.jwt_secret,
            config.auth.token_expiry_hours,
        );

        Self {
            config: Arc::new(config),
            auth: Arc::new(auth),
        }
    }

    /// Connects to Postgres, applies migrations and assembles the state.
    pub async fn connect(config: Settings) -> Result<Self> {
        let store = PostgresStore::connect(&config.database.url, config.database.max_connections)
            .await?;
        store.migrate().await?;

        Ok(Self::new(config, Arc::new(store)))
    }
}
