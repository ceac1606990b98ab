use argon2::{password_hash::SaltString, Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use rand::rngs::OsRng;

use crate::error::AppError;

/// One-way credential transform backed by Argon2id.
///
/// Hashing salts every call, so equal plaintexts produce different stored
/// values; verification re-derives the digest from the salt embedded in
/// the PHC string and compares in constant time.
#[derive(Default)]
pub struct CredentialHasher {
    argon2: Argon2<'static>,
}

impl CredentialHasher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hash(&self, plaintext: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(OsRng);
        let hash = self
            .argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("password hashing failed: {e}")))?;

        Ok(hash.to_string())
    }

    /// Returns true iff `hashed` was produced from `plaintext`.
    ///
    /// A malformed `hashed` value is treated as a mismatch, never an error.
    pub fn verify(&self, plaintext: &str, hashed: &str) -> bool {
        let parsed = match PasswordHash::new(hashed) {
            Ok(h) => h,
            Err(_) => return false,
        };

        self.argon2
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok()
    }
}
