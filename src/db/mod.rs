//! Identity storage for the account service.
//!
//! The store exclusively owns persisted `User` records; handlers only
//! borrow them for the duration of a request.

mod models;
mod postgres;

pub use models::User;
pub use postgres::PostgresStore;

use crate::error::DatabaseError;
use async_trait::async_trait;

/// Persistence contract for user identities.
///
/// Uniqueness of `username` and `email` is enforced by the store itself
/// (unique constraints), not by a prior read: `insert` must fail with
/// [`DatabaseError::Duplicate`] when two concurrent registrations race
/// past the handler's precondition check.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Returns a record colliding with either field, if any.
    async fn find_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> Result<Option<User>, DatabaseError>;

    /// Persists a new user and returns it with its store-assigned id.
    async fn insert(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, DatabaseError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, DatabaseError>;
}
