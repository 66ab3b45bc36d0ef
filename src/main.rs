//! FieldBill Backend Server
//!
//! REST API for a machine-hire billing business: admins register customers,
//! create hourly or per-count bills, and record payments that settle open
//! bills oldest-first.

use actix_cors::Cors;
use actix_web::{http::header, web, App, HttpResponse, HttpServer};
use fieldbill_api::handlers::{
    configure_admins, configure_auth, configure_bills, configure_customers, configure_payments,
};
use fieldbill_auth::{JwtService, PasswordService};
use fieldbill_core::config::AppConfig;
use fieldbill_db::create_pool;
use std::env;
use std::sync::Arc;
use tracing::info;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Health check endpoint
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "fieldbill",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Configure API routes
fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            // Health check
            .route("/health", web::get().to(health_check))
            // Auth endpoints
            .configure(configure_auth)
            // Admin management endpoints
            .configure(configure_admins)
            // Customer endpoints
            .configure(configure_customers)
            // Bill endpoints
            .configure(configure_bills)
            // Payment endpoints
            .configure(configure_payments),
    );
}

/// Initialize tracing/logging
fn init_tracing() {
    let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "fieldbill={level},fieldbill_api={level},fieldbill_db={level},fieldbill_services={level},actix_web=info,sqlx=warn",
            level = log_level
        ))
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .init();
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    init_tracing();

    info!("Starting FieldBill Backend v{}", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::load().unwrap_or_else(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::process::exit(1);
    });

    let pool = create_pool(&config.database.url, Some(config.database.max_connections))
        .await
        .unwrap_or_else(|e| {
            eprintln!("Failed to connect to database: {}", e);
            std::process::exit(1);
        });

    // Apply pending schema migrations at startup
    if let Err(e) = sqlx::migrate!("./migrations").run(&pool).await {
        eprintln!("Failed to run migrations: {}", e);
        std::process::exit(1);
    }

    let jwt_service = Arc::new(JwtService::new(
        &config.auth.jwt_secret,
        config.auth.jwt_expiration_minutes * 60,
    ));
    let password_service = Arc::new(PasswordService::new());

    let bind_addr = config.server_addr();
    let workers = config.server.workers;

    info!("Listening on {} with {} workers", bind_addr, workers);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
            .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE])
            .max_age(3600);

        App::new()
            .wrap(cors)
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(jwt_service.clone()))
            .app_data(web::Data::new(password_service.clone()))
            .configure(configure_routes)
    })
    .workers(workers)
    .bind(&bind_addr)?
    .run()
    .await
}
