use axum::routing::{delete, get};
use axum::{middleware, Router};
use std::sync::Arc;

use super::controller;
use crate::services::auth_middleware::{require_admin, require_auth};
use crate::AppState;

pub fn user_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    let admin = Router::new()
        .route("/", get(controller::list_users))
        .route("/{id}", delete(controller::delete_user))
        .layer(middleware::from_fn(require_admin));

    Router::new()
        .route(
            "/profile",
            get(controller::get_profile).put(controller::update_profile),
        )
        .merge(admin)
        .layer(middleware::from_fn_with_state(state, require_auth))
}
