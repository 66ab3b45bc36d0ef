//! Payment handlers
//!
//! Recording a payment runs the full settlement pipeline: lock the
//! customer's open bills, allocate oldest-first, write payment rows and
//! balance updates in one transaction.

use crate::dto::payment::{PaymentCreateRequest, PaymentFilterParams, PaymentResponse};
use crate::dto::ApiResponse;
use actix_web::{web, HttpResponse};
use fieldbill_auth::AuthenticatedUser;
use fieldbill_core::traits::{PaymentRepository, Repository, SettlementService};
use fieldbill_core::AppError;
use fieldbill_db::PgPaymentRepository;
use fieldbill_services::SettlementEngine;
use sqlx::PgPool;
use tracing::{info, instrument};

/// Record a payment
///
/// POST /api/v1/payments
#[instrument(skip(pool, user, req))]
pub async fn create_payment(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
    req: web::Json<PaymentCreateRequest>,
) -> Result<HttpResponse, AppError> {
    user.require_admin()?;

    let engine = SettlementEngine::new(pool.get_ref().clone());
    let payments = engine.record_payment(req.customer_id, req.amount).await?;

    info!(
        customer_id = %req.customer_id,
        amount = %req.amount,
        bills_settled = payments.len(),
        "Payment recorded"
    );

    let response: Vec<PaymentResponse> = payments.into_iter().map(Into::into).collect();

    Ok(HttpResponse::Created().json(ApiResponse::with_message(
        response,
        "Payment recorded successfully",
    )))
}

/// List payments, optionally filtered by customer or bill
///
/// GET /api/v1/payments?customer_id=&bill_id=
#[instrument(skip(pool, user))]
pub async fn list_payments(
    pool: web::Data<PgPool>,
    query: web::Query<PaymentFilterParams>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    user.require_admin()?;

    let repo = PgPaymentRepository::new(pool.get_ref().clone());

    let payments = if let Some(bill_id) = query.bill_id {
        repo.find_by_bill(bill_id).await?
    } else if let Some(customer_id) = query.customer_id {
        repo.find_by_customer(customer_id).await?
    } else {
        repo.find_all().await?
    };

    let response: Vec<PaymentResponse> = payments.into_iter().map(Into::into).collect();

    Ok(HttpResponse::Ok().json(ApiResponse::success(response)))
}

/// Configure payment routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/payments")
            .route("", web::get().to(list_payments))
            .route("", web::post().to(create_payment)),
    );
}
