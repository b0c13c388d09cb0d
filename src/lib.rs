pub mod config;
pub mod modules;
pub mod services;

use axum::{middleware, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

use config::DbPool;
use modules::auth::auth_routes;
use modules::metrics::metrics_routes;
use modules::user::user_routes;
use services::jwt::JwtService;
use services::mailer::Mailer;
use services::metrics::{metrics_middleware, MetricsRegistry};
use services::security::security_headers;

pub struct AppState {
    pub db: DbPool,
    pub jwt_service: JwtService,
    pub mailer: Arc<dyn Mailer>,
    pub metrics: Arc<MetricsRegistry>,
    pub frontend_url: String,
}

pub async fn create_app(
    db: DbPool,
    jwt_service: JwtService,
    mailer: Arc<dyn Mailer>,
    frontend_url: String,
) -> Router {
    let metrics = MetricsRegistry::new().expect("Failed to create metrics registry");

    let state = Arc::new(AppState {
        db,
        jwt_service,
        mailer,
        metrics: metrics.clone(),
        frontend_url,
    });

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .nest("/api/auth", auth_routes())
        .nest("/api/users", user_routes(state.clone()))
        .merge(metrics_routes())
        .layer(middleware::from_fn_with_state(metrics, metrics_middleware))
        .layer(middleware::from_fn(security_headers))
        .layer(RequestBodyLimitLayer::new(1024 * 100)) // 100KB max body
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn root() -> &'static str {
    "FitWear API"
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
