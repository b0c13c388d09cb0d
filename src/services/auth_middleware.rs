use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::errors::ErrorKind;
use std::sync::Arc;

use crate::modules::auth::crud::UserCrud;
use crate::modules::auth::error::AuthError;
use crate::modules::auth::model::{Role, User};
use crate::AppState;

fn bearer_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
}

/// Verifies the bearer token and re-reads the account from the store. The
/// stored row, not the claims, is what downstream handlers see: a deleted
/// account is rejected even while its token is still unexpired.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = bearer_token(&request).ok_or(AuthError::MissingToken)?;

    let data = state.jwt_service.verify_token(token).map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        _ => AuthError::InvalidToken,
    })?;

    let user = UserCrud::new(state.db.clone())
        .find_by_id(&data.claims.sub)
        .await?
        .ok_or(AuthError::InvalidToken)?;

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// Gates a route on the role currently in the store. Runs inside
/// require_auth, so the extension carries a row fetched this request; a
/// token minted before a demotion grants nothing.
pub async fn require_admin(request: Request, next: Next) -> Result<Response, AuthError> {
    let user = request
        .extensions()
        .get::<User>()
        .ok_or(AuthError::MissingToken)?;

    if user.role != Role::Admin {
        return Err(AuthError::AdminRequired);
    }

    Ok(next.run(request).await)
}
