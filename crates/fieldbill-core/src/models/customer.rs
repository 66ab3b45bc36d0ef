//! Customer model
//!
//! Represents a customer of the machine-hire business. Bills and payments
//! reference customers by identifier only.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Customer entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    /// Unique identifier
    pub id: Uuid,

    /// Customer name
    pub name: String,

    /// Phone number (unique across customers)
    pub phone: String,

    /// Day of month payments are expected by
    pub payment_due_date: NaiveDate,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Customer {
    /// Normalize a phone number for duplicate matching
    pub fn normalize_phone(phone: &str) -> String {
        phone.chars().filter(|c| c.is_ascii_digit()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_phone() {
        assert_eq!(Customer::normalize_phone("+91-98765-43210"), "919876543210");
        assert_eq!(Customer::normalize_phone("(555) 123-4567"), "5551234567");
        assert_eq!(Customer::normalize_phone("9876543210"), "9876543210");
    }
}
