//! Authentication DTOs
//!
//! Request and response types for authentication and admin management.

use fieldbill_core::models::AdminInfo;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Login request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    /// Username
    #[validate(length(min = 1, max = 100, message = "Username is required"))]
    pub username: String,

    /// Password
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Login response
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    /// Access token (JWT)
    pub access_token: String,

    /// Token type (always "Bearer")
    pub token_type: String,

    /// Token expiration time in seconds
    pub expires_in: i64,

    /// Admin information
    pub user: AdminInfo,
}

impl LoginResponse {
    /// Create a new login response
    pub fn new(access_token: String, expires_in: i64, user: AdminInfo) -> Self {
        Self {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in,
            user,
        }
    }
}

/// Admin registration request (admin only)
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterAdminRequest {
    /// Username
    #[validate(length(
        min = 3,
        max = 100,
        message = "Username must be between 3 and 100 characters"
    ))]
    pub username: String,

    /// Password
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,

    /// Admin flag for the new user
    #[serde(default)]
    pub is_admin: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_validation() {
        let valid = RegisterAdminRequest {
            username: "manager".to_string(),
            password: "longenough".to_string(),
            is_admin: true,
        };
        assert!(valid.validate().is_ok());

        let short_password = RegisterAdminRequest {
            username: "manager".to_string(),
            password: "abc".to_string(),
            is_admin: false,
        };
        assert!(short_password.validate().is_err());
    }
}
