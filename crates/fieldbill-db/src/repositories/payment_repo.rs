//! Payment repository implementation
//!
//! Payments are append-only: rows are inserted by the settlement engine and
//! queried for reporting, never edited.

use chrono::{DateTime, Utc};
use fieldbill_core::{
    models::{Payment, PaymentAllocation},
    traits::{PaymentRepository, Repository},
    AppError, AppResult,
};
use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::{debug, error, instrument};
use uuid::Uuid;

/// PostgreSQL implementation of PaymentRepository
pub struct PgPaymentRepository {
    pool: PgPool,
}

impl PgPaymentRepository {
    /// Create a new payment repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<Payment, Uuid> for PgPaymentRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Payment>> {
        let result = sqlx::query_as::<Postgres, PaymentRow>(
            r#"
            SELECT id, bill_id, customer_id, amount, created_at
            FROM payments
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding payment {}: {}", id, e);
            AppError::Database(format!("Failed to find payment: {}", e))
        })?;

        Ok(result.map(Into::into))
    }

    #[instrument(skip(self))]
    async fn find_all(&self) -> AppResult<Vec<Payment>> {
        let rows = sqlx::query_as::<Postgres, PaymentRow>(
            r#"
            SELECT id, bill_id, customer_id, amount, created_at
            FROM payments
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding payments: {}", e);
            AppError::Database(format!("Failed to fetch payments: {}", e))
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self, entity))]
    async fn create(&self, entity: &Payment) -> AppResult<Payment> {
        debug!("Creating payment for bill: {}", entity.bill_id);

        let row = sqlx::query_as::<Postgres, PaymentRow>(
            r#"
            INSERT INTO payments (id, bill_id, customer_id, amount)
            VALUES ($1, $2, $3, $4)
            RETURNING id, bill_id, customer_id, amount, created_at
            "#,
        )
        .bind(entity.id)
        .bind(entity.bill_id)
        .bind(entity.customer_id)
        .bind(entity.amount)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error creating payment: {}", e);
            AppError::Database(format!("Failed to create payment: {}", e))
        })?;

        Ok(row.into())
    }

    /// Payments are immutable; update is not supported
    async fn update(&self, entity: &Payment) -> AppResult<Payment> {
        Err(AppError::InvalidInput(format!(
            "Payment {} cannot be updated",
            entity.id
        )))
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM payments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error deleting payment {}: {}", id, e);
                AppError::Database(format!("Failed to delete payment: {}", e))
            })?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl PaymentRepository for PgPaymentRepository {
    #[instrument(skip(self))]
    async fn find_by_customer(&self, customer_id: Uuid) -> AppResult<Vec<Payment>> {
        let rows = sqlx::query_as::<Postgres, PaymentRow>(
            r#"
            SELECT id, bill_id, customer_id, amount, created_at
            FROM payments
            WHERE customer_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error fetching customer payments: {}", e);
            AppError::Database(format!("Failed to fetch payments: {}", e))
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn find_by_bill(&self, bill_id: Uuid) -> AppResult<Vec<Payment>> {
        let rows = sqlx::query_as::<Postgres, PaymentRow>(
            r#"
            SELECT id, bill_id, customer_id, amount, created_at
            FROM payments
            WHERE bill_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(bill_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error fetching bill payments: {}", e);
            AppError::Database(format!("Failed to fetch payments: {}", e))
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

/// Insert a payment row from an allocation inside a transaction.
///
/// Used by the settlement engine so that payment rows and bill balance
/// updates commit or roll back together.
pub async fn insert_allocation_in_tx(
    tx: &mut Transaction<'_, Postgres>,
    allocation: &PaymentAllocation,
) -> AppResult<Payment> {
    let row = sqlx::query_as::<Postgres, PaymentRow>(
        r#"
        INSERT INTO payments (id, bill_id, customer_id, amount)
        VALUES ($1, $2, $3, $4)
        RETURNING id, bill_id, customer_id, amount, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(allocation.bill_id)
    .bind(allocation.customer_id)
    .bind(allocation.amount)
    .fetch_one(&mut **tx)
    .await
    .map_err(|e| {
        error!("Database error inserting payment allocation: {}", e);
        AppError::Database(format!("Failed to insert payment: {}", e))
    })?;

    Ok(row.into())
}

/// Helper struct for mapping database rows
#[derive(Debug, sqlx::FromRow)]
struct PaymentRow {
    id: Uuid,
    bill_id: Uuid,
    customer_id: Uuid,
    amount: Decimal,
    created_at: DateTime<Utc>,
}

impl From<PaymentRow> for Payment {
    fn from(row: PaymentRow) -> Self {
        Self {
            id: row.id,
            bill_id: row.bill_id,
            customer_id: row.customer_id,
            amount: row.amount,
            created_at: row.created_at,
        }
    }
}
