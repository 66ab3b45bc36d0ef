//! Common traits for repositories and services
//!
//! Defines abstractions for database access and business logic.

use crate::error::AppError;
use crate::models::{Admin, Bill, BillStatus, Customer, Payment};
use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

/// Generic repository trait for CRUD operations
#[async_trait]
pub trait Repository<T, ID>: Send + Sync {
    /// Find entity by ID
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, AppError>;

    /// Find all entities
    async fn find_all(&self) -> Result<Vec<T>, AppError>;

    /// Create a new entity
    async fn create(&self, entity: &T) -> Result<T, AppError>;

    /// Update an existing entity
    async fn update(&self, entity: &T) -> Result<T, AppError>;

    /// Delete entity by ID
    async fn delete(&self, id: ID) -> Result<bool, AppError>;
}

/// Customer repository trait with specialized methods
#[async_trait]
pub trait CustomerRepository: Repository<Customer, Uuid> {
    /// Find customer by exact phone number
    async fn find_by_phone(&self, phone: &str) -> Result<Option<Customer>, AppError>;

    /// Search customers by name or phone substring
    async fn search(&self, term: &str) -> Result<Vec<Customer>, AppError>;
}

/// Bill repository trait with specialized methods
#[async_trait]
pub trait BillRepository: Repository<Bill, Uuid> {
    /// List bills for a customer, ordered by date ascending
    async fn find_by_customer(&self, customer_id: Uuid) -> Result<Vec<Bill>, AppError>;

    /// List a customer's open (non-CLOSED) bills, ordered by date ascending.
    ///
    /// The payment allocator relies on this ordering; callers must not
    /// re-sort the result.
    async fn find_open_by_customer(&self, customer_id: Uuid) -> Result<Vec<Bill>, AppError>;

    /// Apply a settlement to a bill: decrement the pending balance and
    /// set the new status
    async fn apply_settlement(
        &self,
        bill_id: Uuid,
        amount: Decimal,
        status: BillStatus,
    ) -> Result<Bill, AppError>;
}

/// Payment repository trait with specialized methods
#[async_trait]
pub trait PaymentRepository: Repository<Payment, Uuid> {
    /// List payments for a customer, newest first
    async fn find_by_customer(&self, customer_id: Uuid) -> Result<Vec<Payment>, AppError>;

    /// List payments applied to a bill
    async fn find_by_bill(&self, bill_id: Uuid) -> Result<Vec<Payment>, AppError>;
}

/// Admin repository trait with specialized methods
#[async_trait]
pub trait AdminRepository: Repository<Admin, Uuid> {
    /// Find admin by username
    async fn find_by_username(&self, username: &str) -> Result<Option<Admin>, AppError>;
}

/// Settlement service trait
///
/// Records an incoming payment by allocating it across the customer's open
/// bills (oldest first) and applying each allocation, atomically.
#[async_trait]
pub trait SettlementService: Send + Sync {
    /// Record a payment for a customer, returning the created payment rows
    /// in allocation order
    async fn record_payment(
        &self,
        customer_id: Uuid,
        amount: Decimal,
    ) -> Result<Vec<Payment>, AppError>;
}
