//! HTTP request handlers

pub mod auth;
pub mod bill;
pub mod customer;
pub mod payment;

pub use auth::configure as configure_auth;
pub use auth::configure_admins;
pub use bill::configure as configure_bills;
pub use customer::configure as configure_customers;
pub use payment::configure as configure_payments;
