use std::future::{ready, Ready};

use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest};

use crate::error::{AppError, AuthError};
use crate::AppState;

/// Explicit authentication stage for protected routes.
///
/// Declaring this extractor as a handler argument makes the handler run
/// only after the bearer credential has been parsed and validated; the
/// request stays unauthenticated until it yields a user id.
#[derive(Debug)]
pub struct AuthenticatedUser {
    pub user_id: i64,
}

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, AppError> {
    let token = bearer_token(req).ok_or(AuthError::MissingCredential)?;

    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| AppError::Internal("application state not configured".to_string()))?;

    let user_id = state.auth.validate_token(token)?;

    Ok(AuthenticatedUser { user_id })
}

/// Extracts the token from an `Authorization: Bearer <token>` header.
/// A missing header or an unexpected scheme both count as absent.
fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::TokenService;
    use crate::db::MockIdentityStore;
    use crate::Settings;
    use actix_web::test::TestRequest;
    use chrono::Duration;
    use std::sync::Arc;

    fn test_state() -> web::Data<AppState> {
        let config = Settings::new_for_test().expect("Failed to load test config");
        web::Data::new(AppState::new(config, Arc::new(MockIdentityStore::new())))
    }

    fn issue_token(secret: &str, user_id: i64) -> String {
        TokenService::new(secret, Duration::hours(1))
            .issue(user_id)
            .expect("Failed to issue token")
    }

    #[test]
    fn test_bearer_token_parsing() {
        let req = TestRequest::get()
            .insert_header((header::AUTHORIZATION, "Bearer abc.def.ghi"))
            .to_http_request();
        assert_eq!(bearer_token(&req), Some("abc.def.ghi"));

        let req = TestRequest::get().to_http_request();
        assert_eq!(bearer_token(&req), None);

        // Wrong scheme is treated the same as no credential at all.
        let req = TestRequest::get()
            .insert_header((header::AUTHORIZATION, "Token abc.def.ghi"))
            .to_http_request();
        assert_eq!(bearer_token(&req), None);

        let req = TestRequest::get()
            .insert_header((header::AUTHORIZATION, "abc.def.ghi"))
            .to_http_request();
        assert_eq!(bearer_token(&req), None);
    }

    #[test]
    fn test_missing_header_is_missing_credential() {
        let req = TestRequest::get().to_http_request();
        let err = authenticate(&req).unwrap_err();
        assert!(matches!(err, AppError::Auth(AuthError::MissingCredential)));
    }

    #[test]
    fn test_valid_token_yields_user_id() {
        // new_for_test signs with "test_secret".
        let token = issue_token("test_secret", 42);
        let req = TestRequest::get()
            .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
            .app_data(test_state())
            .to_http_request();

        let user = authenticate(&req).unwrap();
        assert_eq!(user.user_id, 42);
    }

    #[test]
    fn test_foreign_secret_is_invalid_credential() {
        let token = issue_token("some_other_secret", 42);
        let req = TestRequest::get()
            .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
            .app_data(test_state())
            .to_http_request();

        let err = authenticate(&req).unwrap_err();
        assert!(matches!(err, AppError::Auth(AuthError::InvalidToken)));
    }
}
