use axum::extract::{Path, State};
use axum::{Extension, Json};
use std::sync::Arc;
use validator::Validate;

use super::schema::{DeleteUserResponse, ProfileResponse, UpdateProfileRequest};
use crate::modules::auth::crud::UserCrud;
use crate::modules::auth::error::AuthError;
use crate::modules::auth::model::User;
use crate::AppState;

pub async fn get_profile(Extension(user): Extension<User>) -> Json<ProfileResponse> {
    Json(ProfileResponse::from(&user))
}

pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>, AuthError> {
    req.validate()?;

    let updated = UserCrud::new(state.db.clone())
        .update_profile(&user.id, req.name.as_deref(), req.username.as_deref())
        .await?;

    tracing::info!(user_id = %updated.id, "profile updated");
    Ok(Json(ProfileResponse::from(&updated)))
}

pub async fn list_users(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ProfileResponse>>, AuthError> {
    let users = UserCrud::new(state.db.clone()).list_all().await?;
    Ok(Json(users.iter().map(ProfileResponse::from).collect()))
}

pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DeleteUserResponse>, AuthError> {
    let deleted = UserCrud::new(state.db.clone()).delete_by_id(&id).await?;
    if deleted == 0 {
        return Err(AuthError::UserNotFound);
    }

    tracing::info!(user_id = %id, "user deleted");
    Ok(Json(DeleteUserResponse {
        message: "User deleted",
    }))
}
