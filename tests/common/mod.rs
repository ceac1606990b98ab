use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use account_server::db::{IdentityStore, User};
use account_server::error::DatabaseError;
use account_server::{AppState, Settings};
use actix_web::web;
use async_trait::async_trait;

/// In-memory identity store enforcing the same uniqueness contract as the
/// Postgres implementation, so end-to-end flows run without a database.
#[derive(Default)]
pub struct InMemoryStore {
    users: Mutex<Vec<User>>,
    next_id: AtomicI64,
}

#[async_trait]
impl IdentityStore for InMemoryStore {
    async fn find_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> Result<Option<User>, DatabaseError> {
        let users = self.users.lock().unwrap();
        Ok(users
            .iter()
            .find(|u| u.username == username || u.email == email)
            .cloned())
    }

    async fn insert(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, DatabaseError> {
        let mut users = self.users.lock().unwrap();
        // Uniqueness enforced at the store, as the real constraint is.
        if users.iter().any(|u| u.username == username || u.email == email) {
            return Err(DatabaseError::Duplicate);
        }

        let user = User {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            username: username.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, DatabaseError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.id == id).cloned())
    }
}

pub fn test_state() -> web::Data<AppState> {
    let config = Settings::new_for_test().expect("Failed to load test config");
    web::Data::new(AppState::new(config, Arc::new(InMemoryStore::default())))
}
