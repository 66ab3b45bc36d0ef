//! Customer repository implementation
//!
//! Provides PostgreSQL-backed storage for customers with phone-number
//! uniqueness and name/phone search.

use chrono::{DateTime, NaiveDate, Utc};
use fieldbill_core::{
    models::Customer,
    traits::{CustomerRepository, Repository},
    AppError, AppResult,
};
use async_trait::async_trait;
use sqlx::{PgPool, Postgres};
use tracing::{debug, error, instrument};
use uuid::Uuid;

/// PostgreSQL implementation of CustomerRepository
pub struct PgCustomerRepository {
    pool: PgPool,
}

impl PgCustomerRepository {
    /// Create a new customer repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<Customer, Uuid> for PgCustomerRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Customer>> {
        debug!("Finding customer by id: {}", id);

        let result = sqlx::query_as::<Postgres, CustomerRow>(
            r#"
            SELECT id, name, phone, payment_due_date, created_at, updated_at
            FROM customers
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding customer {}: {}", id, e);
            AppError::Database(format!("Failed to find customer: {}", e))
        })?;

        Ok(result.map(Into::into))
    }

    #[instrument(skip(self))]
    async fn find_all(&self) -> AppResult<Vec<Customer>> {
        let rows = sqlx::query_as::<Postgres, CustomerRow>(
            r#"
            SELECT id, name, phone, payment_due_date, created_at, updated_at
            FROM customers
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding customers: {}", e);
            AppError::Database(format!("Failed to fetch customers: {}", e))
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self, entity))]
    async fn create(&self, entity: &Customer) -> AppResult<Customer> {
        debug!("Creating customer: {}", entity.name);

        let row = sqlx::query_as::<Postgres, CustomerRow>(
            r#"
            INSERT INTO customers (id, name, phone, payment_due_date)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, phone, payment_due_date, created_at, updated_at
            "#,
        )
        .bind(entity.id)
        .bind(&entity.name)
        .bind(&entity.phone)
        .bind(entity.payment_due_date)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error creating customer: {}", e);
            if e.to_string().contains("unique constraint") {
                AppError::AlreadyExists(format!(
                    "Customer with phone {} already exists",
                    entity.phone
                ))
            } else {
                AppError::Database(format!("Failed to create customer: {}", e))
            }
        })?;

        Ok(row.into())
    }

    #[instrument(skip(self, entity))]
    async fn update(&self, entity: &Customer) -> AppResult<Customer> {
        debug!("Updating customer: {}", entity.id);

        let row = sqlx::query_as::<Postgres, CustomerRow>(
            r#"
            UPDATE customers
            SET name = $2,
                phone = $3,
                payment_due_date = $4,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, phone, payment_due_date, created_at, updated_at
            "#,
        )
        .bind(entity.id)
        .bind(&entity.name)
        .bind(&entity.phone)
        .bind(entity.payment_due_date)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error updating customer {}: {}", entity.id, e);
            if e.to_string().contains("unique constraint") {
                AppError::AlreadyExists(format!(
                    "Customer with phone {} already exists",
                    entity.phone
                ))
            } else {
                AppError::Database(format!("Failed to update customer: {}", e))
            }
        })?
        .ok_or_else(|| AppError::CustomerNotFound(entity.id.to_string()))?;

        Ok(row.into())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error deleting customer {}: {}", id, e);
                AppError::Database(format!("Failed to delete customer: {}", e))
            })?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl CustomerRepository for PgCustomerRepository {
    #[instrument(skip(self))]
    async fn find_by_phone(&self, phone: &str) -> AppResult<Option<Customer>> {
        let result = sqlx::query_as::<Postgres, CustomerRow>(
            r#"
            SELECT id, name, phone, payment_due_date, created_at, updated_at
            FROM customers
            WHERE phone = $1
            "#,
        )
        .bind(phone)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding customer by phone: {}", e);
            AppError::Database(format!("Failed to find customer: {}", e))
        })?;

        Ok(result.map(Into::into))
    }

    #[instrument(skip(self))]
    async fn search(&self, term: &str) -> AppResult<Vec<Customer>> {
        let pattern = format!("%{}%", term);

        let rows = sqlx::query_as::<Postgres, CustomerRow>(
            r#"
            SELECT id, name, phone, payment_due_date, created_at, updated_at
            FROM customers
            WHERE name ILIKE $1 OR phone ILIKE $1
            ORDER BY name
            "#,
        )
        .bind(&pattern)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error searching customers: {}", e);
            AppError::Database(format!("Failed to search customers: {}", e))
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

/// Helper struct for mapping database rows
#[derive(Debug, sqlx::FromRow)]
struct CustomerRow {
    id: Uuid,
    name: String,
    phone: String,
    payment_due_date: NaiveDate,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            phone: row.phone,
            payment_due_date: row.payment_due_date,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
