//! Repository implementations
//!
//! This module contains concrete implementations of all repository traits
//! defined in fieldbill-core, using sqlx for PostgreSQL access.

pub mod admin_repo;
pub mod bill_repo;
pub mod customer_repo;
pub mod payment_repo;

pub use admin_repo::PgAdminRepository;
pub use bill_repo::PgBillRepository;
pub use customer_repo::PgCustomerRepository;
pub use payment_repo::PgPaymentRepository;
