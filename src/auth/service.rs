use std::sync::Arc;

use chrono::Duration;
use tracing::{info, warn};

use crate::auth::{CredentialHasher, TokenService};
use crate::db::{IdentityStore, User};
use crate::error::{AppError, AuthError};

/// Composes the identity store, credential hasher and token service into
/// the register/login/profile flows.
pub struct AuthService {
    store: Arc<dyn IdentityStore>,
    hasher: CredentialHasher,
    tokens: TokenService,
}

impl AuthService {
    pub fn new(store: Arc<dyn IdentityStore>, jwt_secret: &str, token_expiry_hours: i64) -> Self {
        Self {
            store,
            hasher: CredentialHasher::new(),
            tokens: TokenService::new(jwt_secret, Duration::hours(token_expiry_hours)),
        }
    }

    /// Creates a new user. The precondition read gives the common case a
    /// clean Conflict; the store's own unique constraints close the
    /// check-then-insert race, surfacing as Duplicate from `insert`.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AppError> {
        if self
            .store
            .find_by_username_or_email(username, email)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(
                "username or email already registered".to_string(),
            ));
        }

        let password_hash = self.hasher.hash(password)?;
        let user = self.store.insert(username, email, &password_hash).await?;

        info!("created user {} (id: {})", user.username, user.id);
        Ok(user)
    }

    /// Verifies credentials and issues a token. An unknown email and a
    /// wrong password produce the same signal, so callers cannot probe
    /// which addresses are registered.
    pub async fn login(&self, email: &str, password: &str) -> Result<String, AppError> {
        let user = match self.store.find_by_email(email).await? {
            Some(user) => user,
            None => return Err(AuthError::InvalidCredentials.into()),
        };

        if !self.hasher.verify(password, &user.password_hash) {
            return Err(AuthError::InvalidCredentials.into());
        }

        self.tokens.issue(user.id)
    }

    /// Decodes and verifies a bearer token, returning the embedded user
    /// id. Every decode failure collapses to one outward signal; the
    /// specific kind is only logged.
    pub fn validate_token(&self, token: &str) -> Result<i64, AppError> {
        match self.tokens.validate(token) {
            Ok(user_id) => Ok(user_id),
            Err(e) => {
                warn!("token rejected: {}", e);
                Err(AuthError::InvalidToken.into())
            }
        }
    }

    /// Loads the profile for an already-validated user id. A dangling id
    /// (user removed out of band) is treated as an invalid credential.
    pub async fn fetch_profile(&self, user_id: i64) -> Result<User, AppError> {
        match self.store.find_by_id(user_id).await? {
            Some(user) => Ok(user),
            None => {
                warn!("valid token referenced missing user id {}", user_id);
                Err(AuthError::InvalidToken.into())
            }
        }
    }
}
