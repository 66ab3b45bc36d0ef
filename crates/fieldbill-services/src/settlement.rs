//! Settlement engine
//!
//! Applies an incoming payment to a customer's open bills inside a single
//! database transaction: the open bills are locked and read in date order,
//! the waterfall allocator splits the payment, and one payment row plus one
//! balance update per touched bill are written. Either everything commits
//! or nothing does.

use crate::allocation::allocate;
use crate::ledger::derive_status;
use fieldbill_core::models::Payment;
use fieldbill_core::traits::SettlementService;
use fieldbill_core::{AppError, AppResult};
use fieldbill_db::repositories::{bill_repo, payment_repo};
use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::{error, info, instrument};
use uuid::Uuid;

/// Transactional settlement engine backed by PostgreSQL
pub struct SettlementEngine {
    pool: PgPool,
}

impl SettlementEngine {
    /// Create a new settlement engine
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SettlementService for SettlementEngine {
    #[instrument(skip(self))]
    async fn record_payment(
        &self,
        customer_id: Uuid,
        amount: Decimal,
    ) -> AppResult<Vec<Payment>> {
        if amount <= Decimal::ZERO {
            return Err(AppError::Validation(format!(
                "payment amount must be positive, got {}",
                amount
            )));
        }

        let mut tx = self.pool.begin().await.map_err(|e| {
            error!("Failed to start settlement transaction: {}", e);
            AppError::Transaction(format!("Failed to start transaction: {}", e))
        })?;

        // Row locks hold until commit, so a concurrent payment against the
        // same customer waits here instead of reading stale balances.
        let open_bills = bill_repo::lock_open_bills(&mut tx, customer_id).await?;

        let allocations = allocate(amount, customer_id, &open_bills)?;

        let mut payments = Vec::with_capacity(allocations.len());

        for allocation in &allocations {
            let bill = open_bills
                .iter()
                .find(|b| b.id == allocation.bill_id)
                .ok_or_else(|| AppError::BillNotFound(allocation.bill_id.to_string()))?;

            let new_pending = bill.amount_pending - allocation.amount;
            let status = derive_status(new_pending, bill.amount);

            bill_repo::settle_bill_in_tx(&mut tx, allocation.bill_id, allocation.amount, status)
                .await?;

            let payment = payment_repo::insert_allocation_in_tx(&mut tx, allocation).await?;
            payments.push(payment);
        }

        tx.commit().await.map_err(|e| {
            error!("Failed to commit settlement transaction: {}", e);
            AppError::Transaction(format!("Failed to commit transaction: {}", e))
        })?;

        info!(
            %customer_id,
            %amount,
            bills_settled = payments.len(),
            "payment recorded"
        );

        Ok(payments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldbill_core::models::BillStatus;
    use fieldbill_db::create_pool;
    use rust_decimal_macros::dec;

    // End-to-end settlement against a real database. Run with:
    //   DATABASE_URL=postgresql://localhost/fieldbill_test cargo test -- --ignored
    #[tokio::test]
    #[ignore] // Requires database
    async fn test_record_payment_waterfall() {
        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "postgresql://localhost/fieldbill_test".to_string());
        let pool = create_pool(&database_url, Some(2)).await.unwrap();

        let customer_id: Uuid =
            sqlx::query_scalar("INSERT INTO customers (id, name, phone, payment_due_date) VALUES (gen_random_uuid(), 'Test', '0000000000', NOW()::date) RETURNING id")
                .fetch_one(&pool)
                .await
                .unwrap();

        for (day, amount) in [(1, dec!(30)), (2, dec!(50))] {
            sqlx::query(
                "INSERT INTO bills (id, customer_id, job_type, trip_type, rate, date, count, amount, amount_pending, status) \
                 VALUES (gen_random_uuid(), $1, 'TRACTOR', 'COUNT', $2, make_timestamptz(2024, 6, $3, 0, 0, 0), 1, $2, $2, 'NOT_PAID')",
            )
            .bind(customer_id)
            .bind(amount)
            .bind(day)
            .execute(&pool)
            .await
            .unwrap();
        }

        let engine = SettlementEngine::new(pool.clone());
        let payments = engine.record_payment(customer_id, dec!(40)).await.unwrap();

        assert_eq!(payments.len(), 2);
        assert_eq!(payments[0].amount, dec!(30));
        assert_eq!(payments[1].amount, dec!(10));

        let statuses: Vec<String> =
            sqlx::query_scalar("SELECT status FROM bills WHERE customer_id = $1 ORDER BY date ASC")
                .bind(customer_id)
                .fetch_all(&pool)
                .await
                .unwrap();

        assert_eq!(statuses[0], BillStatus::Closed.to_string());
        assert_eq!(statuses[1], BillStatus::Pending.to_string());
    }
}
