//! Bill handlers
//!
//! HTTP handlers for bill creation, revision, and listing. Amount and
//! balance rules live in the ledger; handlers only parse, authorize, and
//! persist.

use crate::dto::bill::{BillFilterParams, BillRequest, BillResponse};
use crate::dto::ApiResponse;
use actix_web::{web, HttpResponse};
use chrono::Utc;
use fieldbill_auth::AuthenticatedUser;
use fieldbill_core::models::Bill;
use fieldbill_core::traits::{BillRepository, Repository};
use fieldbill_core::AppError;
use fieldbill_db::{PgBillRepository, PgCustomerRepository};
use fieldbill_services::ledger;
use fieldbill_services::TripParams;
use sqlx::PgPool;
use tracing::{info, instrument};
use uuid::Uuid;

/// Create a new bill
///
/// POST /api/v1/bills
#[instrument(skip(pool, user, req))]
pub async fn create_bill(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
    req: web::Json<BillRequest>,
) -> Result<HttpResponse, AppError> {
    user.require_admin()?;

    let job_type = req.job_type()?;
    let (trip_type, params) = req.trip_params()?;

    let customer_repo = PgCustomerRepository::new(pool.get_ref().clone());
    customer_repo
        .find_by_id(req.customer_id)
        .await?
        .ok_or_else(|| AppError::CustomerNotFound(req.customer_id.to_string()))?;

    let draft = ledger::open_bill(req.customer_id, job_type, req.rate, req.date, params)?;

    let bill = Bill {
        id: Uuid::new_v4(),
        customer_id: draft.customer_id,
        job_type: draft.job_type,
        trip_type,
        rate: draft.rate,
        date: draft.date,
        start_time: req.start_time,
        end_time: req.end_time,
        count: req.count,
        amount: draft.amount,
        amount_pending: draft.amount_pending,
        status: draft.status,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };

    let repo = PgBillRepository::new(pool.get_ref().clone());
    let created = repo.create(&bill).await?;

    info!(id = %created.id, amount = %created.amount, "Bill created");

    Ok(HttpResponse::Created().json(ApiResponse::with_message(
        BillResponse::from(created),
        "Bill created successfully",
    )))
}

/// Update a bill, recomputing its amount and pending balance
///
/// PUT /api/v1/bills/{id}
#[instrument(skip(pool, user, req))]
pub async fn update_bill(
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
    user: AuthenticatedUser,
    req: web::Json<BillRequest>,
) -> Result<HttpResponse, AppError> {
    user.require_admin()?;

    let bill_id = path.into_inner();
    let job_type = req.job_type()?;
    let (trip_type, params) = req.trip_params()?;

    let repo = PgBillRepository::new(pool.get_ref().clone());
    let previous = repo
        .find_by_id(bill_id)
        .await?
        .ok_or_else(|| AppError::BillNotFound(bill_id.to_string()))?;

    let revision = ledger::revise_bill(&previous, req.rate, params)?;

    let bill = Bill {
        id: previous.id,
        customer_id: req.customer_id,
        job_type,
        trip_type,
        rate: req.rate,
        date: req.date,
        start_time: match params {
            TripParams::Hourly { start_time, .. } => Some(start_time),
            TripParams::Count { .. } => None,
        },
        end_time: match params {
            TripParams::Hourly { end_time, .. } => Some(end_time),
            TripParams::Count { .. } => None,
        },
        count: match params {
            TripParams::Count { count } => Some(count),
            TripParams::Hourly { .. } => None,
        },
        amount: revision.amount,
        amount_pending: revision.amount_pending,
        status: revision.status,
        created_at: previous.created_at,
        updated_at: Utc::now(),
    };

    let updated = repo.update(&bill).await?;

    info!(
        id = %updated.id,
        amount = %updated.amount,
        pending = %updated.amount_pending,
        "Bill updated"
    );

    Ok(HttpResponse::Ok().json(ApiResponse::with_message(
        BillResponse::from(updated),
        "Bill updated successfully",
    )))
}

/// List bills, optionally filtered by customer
///
/// GET /api/v1/bills?customer_id=
#[instrument(skip(pool, user))]
pub async fn list_bills(
    pool: web::Data<PgPool>,
    query: web::Query<BillFilterParams>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    user.require_admin()?;

    let repo = PgBillRepository::new(pool.get_ref().clone());

    let bills = match query.customer_id {
        Some(customer_id) => repo.find_by_customer(customer_id).await?,
        None => repo.find_all().await?,
    };

    let response: Vec<BillResponse> = bills.into_iter().map(Into::into).collect();

    Ok(HttpResponse::Ok().json(ApiResponse::success(response)))
}

/// Configure bill routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/bills")
            .route("", web::get().to(list_bills))
            .route("", web::post().to(create_bill))
            .route("/{id}", web::put().to(update_bill)),
    );
}
