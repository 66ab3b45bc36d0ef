//! FieldBill Authentication Library
//!
//! Provides JWT token issuance/validation, Argon2 password hashing, and
//! actix-web request extractors for authenticated admins.

pub mod claims;
pub mod jwt;
pub mod middleware;
pub mod password;

pub use claims::Claims;
pub use jwt::JwtService;
pub use middleware::AuthenticatedUser;
pub use password::PasswordService;
