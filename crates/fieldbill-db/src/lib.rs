//! FieldBill Database Layer
//!
//! This crate provides PostgreSQL database access and repository
//! implementations for the FieldBill system. It includes:
//!
//! - Connection pool management with sqlx
//! - Repository implementations for all domain entities
//! - Transaction-scoped helpers used by the settlement engine

pub mod pool;
pub mod repositories;

pub use pool::create_pool;
pub use repositories::*;

// Re-export commonly used types
pub use fieldbill_core::{AppError, AppResult};
pub use sqlx::{PgPool, Postgres, Transaction};
