//! API layer for FieldBill
//!
//! HTTP API handlers for managing admins, customers, bills, and payments.

pub mod dto;
pub mod handlers;

// Re-export DTOs (common types)
pub use dto::ApiResponse;

// Re-export handler configuration functions
pub use handlers::{configure_admins, configure_auth, configure_bills, configure_customers,
    configure_payments};
