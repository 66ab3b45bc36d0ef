//! JWT Claims structure
//!
//! Defines the claims structure used in JWT tokens for authentication.

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

/// JWT Claims
///
/// Standard claims used in JWT tokens for admin authentication. The
/// `admin` flag is the only authorization input the rest of the system
/// trusts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// Subject (username)
    pub sub: String,

    /// Admin flag
    pub admin: bool,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Create new claims with the specified username and admin flag
    ///
    /// # Examples
    ///
    /// ```
    /// use fieldbill_auth::Claims;
    ///
    /// let claims = Claims::new("admin", true);
    /// assert_eq!(claims.sub, "admin");
    /// assert!(claims.admin);
    /// ```
    pub fn new(username: &str, admin: bool) -> Self {
        let now = Utc::now();

        Self {
            sub: username.to_string(),
            admin,
            iat: now.timestamp(),
            exp: 0, // Will be set by JwtService
        }
    }

    /// Create new claims with custom expiration duration
    pub fn with_expiration(username: &str, admin: bool, expires_in_secs: i64) -> Self {
        let now = Utc::now();
        let exp = now + Duration::seconds(expires_in_secs);

        Self {
            sub: username.to_string(),
            admin,
            iat: now.timestamp(),
            exp: exp.timestamp(),
        }
    }

    /// Check if the token is expired
    pub fn is_expired(&self) -> bool {
        let now = Utc::now().timestamp();
        self.exp <= now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_claims() {
        let claims = Claims::new("alice", true);
        assert_eq!(claims.sub, "alice");
        assert!(claims.admin);
        assert_eq!(claims.exp, 0);
    }

    #[test]
    fn test_with_expiration() {
        let claims = Claims::with_expiration("bob", false, 3600);
        assert!(!claims.is_expired());

        let expired = Claims::with_expiration("bob", false, -10);
        assert!(expired.is_expired());
    }
}
