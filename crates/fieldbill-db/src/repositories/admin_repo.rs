//! Admin repository implementation
//!
//! Provides PostgreSQL-backed storage for back-office admin users.

use chrono::{DateTime, Utc};
use fieldbill_core::{
    models::Admin,
    traits::{AdminRepository, Repository},
    AppError, AppResult,
};
use async_trait::async_trait;
use sqlx::{PgPool, Postgres};
use tracing::{debug, error, instrument};
use uuid::Uuid;

/// PostgreSQL implementation of AdminRepository
pub struct PgAdminRepository {
    pool: PgPool,
}

impl PgAdminRepository {
    /// Create a new admin repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<Admin, Uuid> for PgAdminRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Admin>> {
        let result = sqlx::query_as::<Postgres, AdminRow>(
            r#"
            SELECT id, username, password_hash, is_admin, created_at, updated_at
            FROM admins
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding admin {}: {}", id, e);
            AppError::Database(format!("Failed to find admin: {}", e))
        })?;

        Ok(result.map(Into::into))
    }

    #[instrument(skip(self))]
    async fn find_all(&self) -> AppResult<Vec<Admin>> {
        let rows = sqlx::query_as::<Postgres, AdminRow>(
            r#"
            SELECT id, username, password_hash, is_admin, created_at, updated_at
            FROM admins
            ORDER BY username
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding admins: {}", e);
            AppError::Database(format!("Failed to fetch admins: {}", e))
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self, entity))]
    async fn create(&self, entity: &Admin) -> AppResult<Admin> {
        debug!("Creating admin: {}", entity.username);

        let row = sqlx::query_as::<Postgres, AdminRow>(
            r#"
            INSERT INTO admins (id, username, password_hash, is_admin)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, password_hash, is_admin, created_at, updated_at
            "#,
        )
        .bind(entity.id)
        .bind(&entity.username)
        .bind(&entity.password_hash)
        .bind(entity.is_admin)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error creating admin: {}", e);
            if e.to_string().contains("unique constraint") {
                AppError::AlreadyExists(format!("Admin {} already exists", entity.username))
            } else {
                AppError::Database(format!("Failed to create admin: {}", e))
            }
        })?;

        Ok(row.into())
    }

    #[instrument(skip(self, entity))]
    async fn update(&self, entity: &Admin) -> AppResult<Admin> {
        let row = sqlx::query_as::<Postgres, AdminRow>(
            r#"
            UPDATE admins
            SET username = $2,
                password_hash = $3,
                is_admin = $4,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, username, password_hash, is_admin, created_at, updated_at
            "#,
        )
        .bind(entity.id)
        .bind(&entity.username)
        .bind(&entity.password_hash)
        .bind(entity.is_admin)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error updating admin {}: {}", entity.id, e);
            AppError::Database(format!("Failed to update admin: {}", e))
        })?
        .ok_or_else(|| AppError::NotFound(format!("Admin {} not found", entity.id)))?;

        Ok(row.into())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM admins WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error deleting admin {}: {}", id, e);
                AppError::Database(format!("Failed to delete admin: {}", e))
            })?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl AdminRepository for PgAdminRepository {
    #[instrument(skip(self))]
    async fn find_by_username(&self, username: &str) -> AppResult<Option<Admin>> {
        let result = sqlx::query_as::<Postgres, AdminRow>(
            r#"
            SELECT id, username, password_hash, is_admin, created_at, updated_at
            FROM admins
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding admin by username: {}", e);
            AppError::Database(format!("Failed to find admin: {}", e))
        })?;

        Ok(result.map(Into::into))
    }
}

/// Helper struct for mapping database rows
#[derive(Debug, sqlx::FromRow)]
struct AdminRow {
    id: Uuid,
    username: String,
    password_hash: String,
    is_admin: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<AdminRow> for Admin {
    fn from(row: AdminRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            password_hash: row.password_hash,
            is_admin: row.is_admin,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
