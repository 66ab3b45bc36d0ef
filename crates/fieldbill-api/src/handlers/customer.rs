//! Customer handlers
//!
//! HTTP handlers for customer management endpoints. All routes require the
//! admin flag.

use crate::dto::customer::{
    CustomerCreateRequest, CustomerResponse, CustomerSearchParams, CustomerUpdateRequest,
};
use crate::dto::ApiResponse;
use actix_web::{web, HttpResponse};
use fieldbill_auth::AuthenticatedUser;
use fieldbill_core::models::Customer;
use fieldbill_core::traits::{CustomerRepository, Repository};
use fieldbill_core::AppError;
use fieldbill_db::PgCustomerRepository;
use sqlx::PgPool;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

/// Register a new customer
///
/// POST /api/v1/customers
#[instrument(skip(pool, user, req))]
pub async fn create_customer(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
    req: web::Json<CustomerCreateRequest>,
) -> Result<HttpResponse, AppError> {
    user.require_admin()?;

    req.validate().map_err(|e| {
        warn!("Customer creation validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    let repo = PgCustomerRepository::new(pool.get_ref().clone());

    // Duplicate phone numbers are a conflict, checked before insert so the
    // caller gets a clean 409 rather than a constraint error message.
    // Phones are stored normalized, so the lookup normalizes too.
    let phone = Customer::normalize_phone(&req.phone);
    if repo.find_by_phone(&phone).await?.is_some() {
        warn!(phone = %req.phone, "Customer creation failed: duplicate phone");
        return Err(AppError::AlreadyExists(format!(
            "Customer with phone {} already exists",
            req.phone
        )));
    }

    let customer = req.to_customer();
    let created = repo.create(&customer).await?;

    info!(id = %created.id, name = %created.name, "Customer created");

    Ok(HttpResponse::Created().json(ApiResponse::with_message(
        CustomerResponse::from(created),
        "Customer created successfully",
    )))
}

/// List or search customers
///
/// GET /api/v1/customers?search=
#[instrument(skip(pool, user))]
pub async fn list_customers(
    pool: web::Data<PgPool>,
    query: web::Query<CustomerSearchParams>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    user.require_admin()?;

    let repo = PgCustomerRepository::new(pool.get_ref().clone());

    let customers = match query.search.as_deref() {
        Some(term) if !term.is_empty() => {
            debug!(term, "Searching customers");
            repo.search(term).await?
        }
        _ => repo.find_all().await?,
    };

    let response: Vec<CustomerResponse> = customers.into_iter().map(Into::into).collect();

    Ok(HttpResponse::Ok().json(ApiResponse::success(response)))
}

/// Update a customer
///
/// PUT /api/v1/customers/{id}
#[instrument(skip(pool, user, req))]
pub async fn update_customer(
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
    user: AuthenticatedUser,
    req: web::Json<CustomerUpdateRequest>,
) -> Result<HttpResponse, AppError> {
    user.require_admin()?;

    req.validate().map_err(|e| {
        warn!("Customer update validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    let customer_id = path.into_inner();
    let repo = PgCustomerRepository::new(pool.get_ref().clone());

    let mut customer = repo
        .find_by_id(customer_id)
        .await?
        .ok_or_else(|| AppError::CustomerNotFound(customer_id.to_string()))?;

    customer.name = req.name.trim().to_string();
    customer.phone = Customer::normalize_phone(&req.phone);
    customer.payment_due_date = req.payment_due_date;

    let updated = repo.update(&customer).await?;

    info!(id = %updated.id, "Customer updated");

    Ok(HttpResponse::Ok().json(ApiResponse::with_message(
        CustomerResponse::from(updated),
        "Customer updated successfully",
    )))
}

/// Delete a customer
///
/// DELETE /api/v1/customers/{id}
#[instrument(skip(pool, user))]
pub async fn delete_customer(
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    user.require_admin()?;

    let customer_id = path.into_inner();
    let repo = PgCustomerRepository::new(pool.get_ref().clone());

    let deleted = repo.delete(customer_id).await?;
    if !deleted {
        return Err(AppError::CustomerNotFound(customer_id.to_string()));
    }

    info!(%customer_id, "Customer deleted");

    Ok(HttpResponse::Ok().json(ApiResponse::with_message(
        serde_json::json!({}),
        "Customer deleted",
    )))
}

/// Configure customer routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/customers")
            .route("", web::get().to(list_customers))
            .route("", web::post().to(create_customer))
            .route("/{id}", web::put().to(update_customer))
            .route("/{id}", web::delete().to(delete_customer)),
    );
}
