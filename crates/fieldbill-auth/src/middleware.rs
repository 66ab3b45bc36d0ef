//! Actix-web authentication middleware and request extractors
//!
//! Provides extractors for authenticated users with admin-flag checks.

use crate::jwt::JwtService;
use crate::Claims;
use actix_web::{dev::Payload, error::ErrorUnauthorized, web, FromRequest, HttpRequest};
use fieldbill_core::error::AppError;
use futures::future::{ready, Ready};
use std::sync::Arc;
use tracing::warn;

/// Extract JWT token from request
///
/// Checks for token in the following order:
/// 1. Authorization header (Bearer token)
/// 2. Cookie named "token"
fn extract_token_from_request(req: &HttpRequest) -> Option<String> {
    // Try Authorization header first
    if let Some(auth_header) = req.headers().get("Authorization") {
        if let Ok(auth_str) = auth_header.to_str() {
            if let Some(token) = auth_str.strip_prefix("Bearer ") {
                return Some(token.to_string());
            }
        }
    }

    // Try cookie
    if let Some(cookie) = req.cookie("token") {
        return Some(cookie.value().to_string());
    }

    None
}

/// Authenticated user extractor
///
/// Extracts and validates the JWT token from the request, providing access
/// to the caller's identity and admin flag.
///
/// # Examples
///
/// ```no_run
/// use actix_web::HttpResponse;
/// use fieldbill_auth::AuthenticatedUser;
///
/// async fn protected_handler(user: AuthenticatedUser) -> HttpResponse {
///     HttpResponse::Ok().json(serde_json::json!({
///         "username": user.username,
///         "admin": user.is_admin(),
///     }))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// Username of the authenticated user
    pub username: String,

    /// Full claims from the JWT token
    pub claims: Claims,
}

impl AuthenticatedUser {
    /// Check if the user has admin privileges
    pub fn is_admin(&self) -> bool {
        self.claims.admin
    }

    /// Return `Forbidden` unless the user carries the admin flag.
    ///
    /// Every management endpoint calls this before touching data.
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            warn!(username = %self.username, "admin privileges required");
            Err(AppError::Forbidden)
        }
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        // Extract JWT service from app data
        let jwt_service = match req.app_data::<web::Data<Arc<JwtService>>>() {
            Some(service) => service.get_ref().clone(),
            None => {
                warn!("JwtService not found in app data");
                return ready(Err(ErrorUnauthorized(AppError::Unauthorized(
                    "Authentication service not configured".to_string(),
                ))));
            }
        };

        // Extract token from request
        let token = match extract_token_from_request(req) {
            Some(t) => t,
            None => {
                return ready(Err(ErrorUnauthorized(AppError::Unauthorized(
                    "Missing authentication token".to_string(),
                ))));
            }
        };

        // Validate the token
        match jwt_service.validate_token(&token) {
            Ok(claims) => ready(Ok(AuthenticatedUser {
                username: claims.sub.clone(),
                claims,
            })),
            Err(e) => {
                warn!("Token validation failed: {}", e);
                ready(Err(ErrorUnauthorized(e)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_extract_token_from_bearer_header() {
        let req = TestRequest::default()
            .insert_header(("Authorization", "Bearer abc.def.ghi"))
            .to_http_request();

        assert_eq!(
            extract_token_from_request(&req),
            Some("abc.def.ghi".to_string())
        );
    }

    #[test]
    fn test_extract_token_missing() {
        let req = TestRequest::default().to_http_request();
        assert_eq!(extract_token_from_request(&req), None);
    }

    #[test]
    fn test_require_admin() {
        let user = AuthenticatedUser {
            username: "boss".to_string(),
            claims: Claims::new("boss", true),
        };
        assert!(user.require_admin().is_ok());

        let user = AuthenticatedUser {
            username: "viewer".to_string(),
            claims: Claims::new("viewer", false),
        };
        assert!(matches!(user.require_admin(), Err(AppError::Forbidden)));
    }
}
