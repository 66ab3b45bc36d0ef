//! Password hashing and verification using Argon2
//!
//! Provides secure password hashing using the Argon2id algorithm,
//! which is recommended for password hashing due to its resistance
//! to GPU cracking attacks and side-channel attacks.

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use fieldbill_core::error::AppError;
use rand_core::OsRng;
use tracing::{debug, error};

/// Password hashing service using Argon2
///
/// Uses Argon2id with default parameters for secure password hashing.
#[derive(Debug, Clone, Default)]
pub struct PasswordService {
    argon2: Argon2<'static>,
}

impl PasswordService {
    /// Create a new password service with default Argon2 parameters
    pub fn new() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }

    /// Hash a password using Argon2
    ///
    /// Returns the password hash in PHC string format.
    ///
    /// # Errors
    ///
    /// Returns `AppError::PasswordHash` if hashing fails
    pub fn hash_password(&self, password: &str) -> Result<String, AppError> {
        debug!("Hashing password");

        let salt = SaltString::generate(&mut OsRng);

        let password_hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| {
                error!(error = %e, "Failed to hash password");
                AppError::PasswordHash(format!("Password hashing failed: {}", e))
            })?;

        Ok(password_hash.to_string())
    }

    /// Verify a password against a hash
    ///
    /// Returns `Ok(true)` if the password matches the hash, `Ok(false)`
    /// if it does not.
    ///
    /// # Errors
    ///
    /// Returns `AppError::PasswordHash` if the hash cannot be parsed
    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool, AppError> {
        debug!("Verifying password");

        let parsed_hash = PasswordHash::new(hash).map_err(|e| {
            error!(error = %e, "Failed to parse password hash");
            AppError::PasswordHash(format!("Invalid password hash format: {}", e))
        })?;

        Ok(self
            .argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let service = PasswordService::new();
        let hash = service.hash_password("s3cret-pass").unwrap();

        assert!(service.verify_password("s3cret-pass", &hash).unwrap());
        assert!(!service.verify_password("wrong-pass", &hash).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let service = PasswordService::new();
        let hash1 = service.hash_password("same-password").unwrap();
        let hash2 = service.hash_password("same-password").unwrap();

        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_invalid_hash_format() {
        let service = PasswordService::new();
        let result = service.verify_password("password", "not-a-phc-string");

        assert!(matches!(result, Err(AppError::PasswordHash(_))));
    }
}
