//! Admin model
//!
//! Represents back-office users for authentication and authorization.
//! Every management endpoint requires the admin flag.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Admin entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Admin {
    /// Unique identifier
    pub id: Uuid,

    /// Username (unique, for login)
    pub username: String,

    /// Password hash (never expose in API responses)
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Whether this user may manage customers, bills, and payments
    pub is_admin: bool,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Admin information safe for API responses (no password hash)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminInfo {
    /// Unique identifier
    pub id: Uuid,

    /// Username
    pub username: String,

    /// Admin flag
    pub is_admin: bool,
}

impl From<&Admin> for AdminInfo {
    fn from(admin: &Admin) -> Self {
        Self {
            id: admin.id,
            username: admin.username.clone(),
            is_admin: admin.is_admin,
        }
    }
}

impl From<Admin> for AdminInfo {
    fn from(admin: Admin) -> Self {
        Self::from(&admin)
    }
}
