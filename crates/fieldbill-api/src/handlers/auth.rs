//! Authentication and admin management handlers

use crate::dto::auth::{LoginRequest, LoginResponse, RegisterAdminRequest};
use crate::dto::ApiResponse;
use actix_web::{cookie::Cookie, web, HttpResponse};
use chrono::Utc;
use fieldbill_auth::{AuthenticatedUser, JwtService, PasswordService};
use fieldbill_core::models::{Admin, AdminInfo};
use fieldbill_core::traits::{AdminRepository, Repository};
use fieldbill_core::AppError;
use fieldbill_db::PgAdminRepository;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

/// Login endpoint
///
/// POST /api/v1/auth/login
#[instrument(skip(pool, jwt_service, password_service, req))]
pub async fn login(
    pool: web::Data<PgPool>,
    jwt_service: web::Data<Arc<JwtService>>,
    password_service: web::Data<Arc<PasswordService>>,
    req: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    req.validate().map_err(|e| {
        warn!("Login validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    let username = req.username.trim();

    debug!(username = %username, "Processing login request");

    let repo = PgAdminRepository::new(pool.get_ref().clone());
    let admin = repo.find_by_username(username).await?.ok_or_else(|| {
        info!(username = %username, "Login failed: user not found");
        AppError::InvalidCredentials
    })?;

    let password_valid = password_service
        .verify_password(&req.password, &admin.password_hash)
        .map_err(|e| {
            error!("Password verification error: {}", e);
            AppError::Internal("Password verification failed".to_string())
        })?;

    if !password_valid {
        info!(username = %username, "Login failed: invalid password");
        return Err(AppError::InvalidCredentials);
    }

    let token = jwt_service.create_token_for_user(&admin.username, admin.is_admin)?;
    let expires_in = jwt_service.expiration_secs();

    info!(username = %username, "Login successful");

    let response = LoginResponse::new(token.clone(), expires_in, AdminInfo::from(&admin));

    let cookie = Cookie::build("token", token)
        .path("/")
        .http_only(true)
        .max_age(actix_web::cookie::time::Duration::seconds(expires_in))
        .finish();

    Ok(HttpResponse::Ok()
        .cookie(cookie)
        .json(ApiResponse::success(response)))
}

/// Register a new admin
///
/// POST /api/v1/admins
#[instrument(skip(pool, password_service, user, req))]
pub async fn register_admin(
    pool: web::Data<PgPool>,
    password_service: web::Data<Arc<PasswordService>>,
    user: AuthenticatedUser,
    req: web::Json<RegisterAdminRequest>,
) -> Result<HttpResponse, AppError> {
    user.require_admin()?;

    req.validate().map_err(|e| {
        warn!("Admin registration validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    let repo = PgAdminRepository::new(pool.get_ref().clone());

    if repo.find_by_username(&req.username).await?.is_some() {
        warn!(username = %req.username, "Admin registration failed: duplicate username");
        return Err(AppError::AlreadyExists(format!(
            "Admin {} already exists",
            req.username
        )));
    }

    let password_hash = password_service.hash_password(&req.password)?;

    let admin = Admin {
        id: Uuid::new_v4(),
        username: req.username.trim().to_string(),
        password_hash,
        is_admin: req.is_admin,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };

    let created = repo.create(&admin).await?;

    info!(username = %created.username, "Admin created");

    Ok(HttpResponse::Created().json(ApiResponse::with_message(
        AdminInfo::from(created),
        "Admin created successfully",
    )))
}

/// Delete an admin
///
/// DELETE /api/v1/admins/{id}
#[instrument(skip(pool, user))]
pub async fn delete_admin(
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    user.require_admin()?;

    let admin_id = path.into_inner();
    let repo = PgAdminRepository::new(pool.get_ref().clone());

    let deleted = repo.delete(admin_id).await?;
    if !deleted {
        return Err(AppError::NotFound(format!("Admin {} not found", admin_id)));
    }

    info!(%admin_id, "Admin deleted");

    Ok(HttpResponse::Ok().json(ApiResponse::with_message(
        serde_json::json!({}),
        "Admin deleted",
    )))
}

/// Configure authentication routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/auth").route("/login", web::post().to(login)));
}

/// Configure admin management routes
pub fn configure_admins(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admins")
            .route("", web::post().to(register_admin))
            .route("/{id}", web::delete().to(delete_admin)),
    );
}
