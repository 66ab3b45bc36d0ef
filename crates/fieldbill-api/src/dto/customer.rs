//! Customer DTOs

use chrono::{DateTime, NaiveDate, Utc};
use fieldbill_core::models::Customer;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Customer registration request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CustomerCreateRequest {
    /// Customer name
    #[validate(length(min = 1, max = 200, message = "Name is required"))]
    pub name: String,

    /// Phone number (unique across customers)
    #[validate(length(min = 4, max = 20, message = "Phone number is required"))]
    pub phone: String,

    /// Day payments are expected by
    pub payment_due_date: NaiveDate,
}

impl CustomerCreateRequest {
    /// Build a customer entity from the request.
    ///
    /// The phone number is stored in normalized form (digits only) so the
    /// uniqueness constraint catches formatting variants.
    pub fn to_customer(&self) -> Customer {
        Customer {
            id: Uuid::new_v4(),
            name: self.name.trim().to_string(),
            phone: Customer::normalize_phone(&self.phone),
            payment_due_date: self.payment_due_date,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}

/// Customer update request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CustomerUpdateRequest {
    /// Customer name
    #[validate(length(min = 1, max = 200, message = "Name is required"))]
    pub name: String,

    /// Phone number (unique across customers)
    #[validate(length(min = 4, max = 20, message = "Phone number is required"))]
    pub phone: String,

    /// Day payments are expected by
    pub payment_due_date: NaiveDate,
}

/// Search query parameters for customer listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomerSearchParams {
    /// Substring matched against name or phone
    pub search: Option<String>,
}

/// Customer response
#[derive(Debug, Clone, Serialize)]
pub struct CustomerResponse {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub payment_due_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Customer> for CustomerResponse {
    fn from(customer: Customer) -> Self {
        Self {
            id: customer.id,
            name: customer.name,
            phone: customer.phone,
            payment_due_date: customer.payment_due_date,
            created_at: customer.created_at,
            updated_at: customer.updated_at,
        }
    }
}
