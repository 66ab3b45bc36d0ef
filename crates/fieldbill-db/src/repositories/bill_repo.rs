//! Bill repository implementation
//!
//! Provides PostgreSQL-backed storage for bills, including the date-ordered
//! open-bill query the payment allocator depends on, and transaction-scoped
//! helpers for atomic settlement.

use chrono::{DateTime, Utc};
use fieldbill_core::{
    models::{Bill, BillStatus, JobType, TripType},
    traits::{BillRepository, Repository},
    AppError, AppResult,
};
use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::{debug, error, instrument};
use uuid::Uuid;

/// Shared column list for bill queries
const BILL_COLUMNS: &str = r#"
    id, customer_id, job_type, trip_type, rate, date,
    start_time, end_time, count, amount, amount_pending, status,
    created_at, updated_at
"#;

/// PostgreSQL implementation of BillRepository
pub struct PgBillRepository {
    pool: PgPool,
}

impl PgBillRepository {
    /// Create a new bill repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<Bill, Uuid> for PgBillRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Bill>> {
        debug!("Finding bill by id: {}", id);

        let result = sqlx::query_as::<Postgres, BillRow>(&format!(
            "SELECT {BILL_COLUMNS} FROM bills WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding bill {}: {}", id, e);
            AppError::Database(format!("Failed to find bill: {}", e))
        })?;

        Ok(result.map(Into::into))
    }

    #[instrument(skip(self))]
    async fn find_all(&self) -> AppResult<Vec<Bill>> {
        let rows = sqlx::query_as::<Postgres, BillRow>(&format!(
            "SELECT {BILL_COLUMNS} FROM bills ORDER BY date ASC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding bills: {}", e);
            AppError::Database(format!("Failed to fetch bills: {}", e))
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self, entity))]
    async fn create(&self, entity: &Bill) -> AppResult<Bill> {
        debug!("Creating bill for customer: {}", entity.customer_id);

        let row = sqlx::query_as::<Postgres, BillRow>(&format!(
            r#"
            INSERT INTO bills (
                id, customer_id, job_type, trip_type, rate, date,
                start_time, end_time, count, amount, amount_pending, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {BILL_COLUMNS}
            "#
        ))
        .bind(entity.id)
        .bind(entity.customer_id)
        .bind(entity.job_type.to_string())
        .bind(entity.trip_type.to_string())
        .bind(entity.rate)
        .bind(entity.date)
        .bind(entity.start_time)
        .bind(entity.end_time)
        .bind(entity.count)
        .bind(entity.amount)
        .bind(entity.amount_pending)
        .bind(entity.status.to_string())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error creating bill: {}", e);
            if e.to_string().contains("foreign key") {
                AppError::CustomerNotFound(entity.customer_id.to_string())
            } else {
                AppError::Database(format!("Failed to create bill: {}", e))
            }
        })?;

        Ok(row.into())
    }

    #[instrument(skip(self, entity))]
    async fn update(&self, entity: &Bill) -> AppResult<Bill> {
        debug!("Updating bill: {}", entity.id);

        let row = sqlx::query_as::<Postgres, BillRow>(&format!(
            r#"
            UPDATE bills
            SET customer_id = $2,
                job_type = $3,
                trip_type = $4,
                rate = $5,
                date = $6,
                start_time = $7,
                end_time = $8,
                count = $9,
                amount = $10,
                amount_pending = $11,
                status = $12,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {BILL_COLUMNS}
            "#
        ))
        .bind(entity.id)
        .bind(entity.customer_id)
        .bind(entity.job_type.to_string())
        .bind(entity.trip_type.to_string())
        .bind(entity.rate)
        .bind(entity.date)
        .bind(entity.start_time)
        .bind(entity.end_time)
        .bind(entity.count)
        .bind(entity.amount)
        .bind(entity.amount_pending)
        .bind(entity.status.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error updating bill {}: {}", entity.id, e);
            AppError::Database(format!("Failed to update bill: {}", e))
        })?
        .ok_or_else(|| AppError::BillNotFound(entity.id.to_string()))?;

        Ok(row.into())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM bills WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error deleting bill {}: {}", id, e);
                AppError::Database(format!("Failed to delete bill: {}", e))
            })?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl BillRepository for PgBillRepository {
    #[instrument(skip(self))]
    async fn find_by_customer(&self, customer_id: Uuid) -> AppResult<Vec<Bill>> {
        let rows = sqlx::query_as::<Postgres, BillRow>(&format!(
            "SELECT {BILL_COLUMNS} FROM bills WHERE customer_id = $1 ORDER BY date ASC"
        ))
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error fetching customer bills: {}", e);
            AppError::Database(format!("Failed to fetch bills: {}", e))
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn find_open_by_customer(&self, customer_id: Uuid) -> AppResult<Vec<Bill>> {
        let rows = sqlx::query_as::<Postgres, BillRow>(&format!(
            r#"
            SELECT {BILL_COLUMNS} FROM bills
            WHERE customer_id = $1 AND status != 'CLOSED'
            ORDER BY date ASC
            "#
        ))
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error fetching open bills: {}", e);
            AppError::Database(format!("Failed to fetch open bills: {}", e))
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn apply_settlement(
        &self,
        bill_id: Uuid,
        amount: Decimal,
        status: BillStatus,
    ) -> AppResult<Bill> {
        let row = sqlx::query_as::<Postgres, BillRow>(&format!(
            r#"
            UPDATE bills
            SET amount_pending = amount_pending - $2,
                status = $3,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {BILL_COLUMNS}
            "#
        ))
        .bind(bill_id)
        .bind(amount)
        .bind(status.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error settling bill {}: {}", bill_id, e);
            AppError::Database(format!("Failed to settle bill: {}", e))
        })?
        .ok_or_else(|| AppError::BillNotFound(bill_id.to_string()))?;

        Ok(row.into())
    }
}

// ==================== Transaction-scoped helpers ====================
//
// The settlement engine runs allocation and per-bill updates inside one
// transaction so a partial failure rolls the whole payment back.

/// Select a customer's open bills ordered by date ascending, locking the
/// rows for the duration of the transaction.
pub async fn lock_open_bills(
    tx: &mut Transaction<'_, Postgres>,
    customer_id: Uuid,
) -> AppResult<Vec<Bill>> {
    let rows = sqlx::query_as::<Postgres, BillRow>(&format!(
        r#"
        SELECT {BILL_COLUMNS} FROM bills
        WHERE customer_id = $1 AND status != 'CLOSED'
        ORDER BY date ASC
        FOR UPDATE
        "#
    ))
    .bind(customer_id)
    .fetch_all(&mut **tx)
    .await
    .map_err(|e| {
        error!("Database error locking open bills: {}", e);
        AppError::Database(format!("Failed to lock open bills: {}", e))
    })?;

    Ok(rows.into_iter().map(Into::into).collect())
}

/// Apply one settlement to a bill inside a transaction: decrement the
/// pending balance and set the new status.
pub async fn settle_bill_in_tx(
    tx: &mut Transaction<'_, Postgres>,
    bill_id: Uuid,
    amount: Decimal,
    status: BillStatus,
) -> AppResult<()> {
    let result = sqlx::query(
        r#"
        UPDATE bills
        SET amount_pending = amount_pending - $2,
            status = $3,
            updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(bill_id)
    .bind(amount)
    .bind(status.to_string())
    .execute(&mut **tx)
    .await
    .map_err(|e| {
        error!("Database error settling bill {}: {}", bill_id, e);
        AppError::Database(format!("Failed to settle bill: {}", e))
    })?;

    if result.rows_affected() == 0 {
        return Err(AppError::BillNotFound(bill_id.to_string()));
    }

    Ok(())
}

/// Helper struct for mapping database rows
#[derive(Debug, sqlx::FromRow)]
struct BillRow {
    id: Uuid,
    customer_id: Uuid,
    job_type: String,
    trip_type: String,
    rate: Decimal,
    date: DateTime<Utc>,
    start_time: Option<DateTime<Utc>>,
    end_time: Option<DateTime<Utc>>,
    count: Option<Decimal>,
    amount: Decimal,
    amount_pending: Decimal,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<BillRow> for Bill {
    fn from(row: BillRow) -> Self {
        Self {
            id: row.id,
            customer_id: row.customer_id,
            job_type: JobType::from_str(&row.job_type).unwrap_or(JobType::Tractor),
            trip_type: TripType::from_str(&row.trip_type).unwrap_or(TripType::Count),
            rate: row.rate,
            date: row.date,
            start_time: row.start_time,
            end_time: row.end_time,
            count: row.count,
            amount: row.amount,
            amount_pending: row.amount_pending,
            status: BillStatus::from_str(&row.status).unwrap_or(BillStatus::NotPaid),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
