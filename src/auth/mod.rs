//! Authentication for the account service: credential hashing, token
//! issuance/validation and the request-side extractor.

mod extractor;
mod password;
mod service;
mod token;

pub mod handlers;

pub use extractor::AuthenticatedUser;
pub use password::CredentialHasher;
pub use service::AuthService;
pub use token::{Claims, TokenError, TokenService};
