use axum::{routing::post, Router};
use std::sync::Arc;

use super::controller;
use crate::AppState;

pub fn auth_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/register", post(controller::register))
        .route("/verify-otp", post(controller::verify_otp))
        .route("/resend-otp", post(controller::resend_otp))
        .route("/login", post(controller::login))
        .route("/forgot-password", post(controller::forgot_password))
        .route(
            "/verify-password-reset-otp",
            post(controller::verify_password_reset_otp),
        )
        .route("/reset-password", post(controller::reset_password))
}
