use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use super::schema::ErrorResponse;
use crate::services::mailer::MailError;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("{0}")]
    Validation(String),

    #[error("Email already in use")]
    DuplicateEmail,

    #[error("Username already taken")]
    DuplicateUsername,

    #[error("Invalid or expired OTP")]
    InvalidOtp,

    #[error("Account already verified")]
    AlreadyVerified,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account not verified")]
    NotVerified { user_id: String },

    #[error("User not found")]
    UserNotFound,

    #[error("Password reset not initiated or OTP not verified")]
    ResetNotInitiated,

    #[error("Not authorized")]
    MissingToken,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Admin access required")]
    AdminRequired,

    #[error("Server error")]
    Database(#[from] sqlx::Error),

    #[error("Server error")]
    Hashing(#[from] argon2::password_hash::Error),

    #[error("Server error")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("Server error")]
    Mail(#[from] MailError),
}

impl From<validator::ValidationErrors> for AuthError {
    fn from(err: validator::ValidationErrors) -> Self {
        AuthError::Validation(err.to_string())
    }
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_)
            | Self::DuplicateEmail
            | Self::DuplicateUsername
            | Self::InvalidOtp
            | Self::AlreadyVerified
            | Self::ResetNotInitiated => StatusCode::BAD_REQUEST,
            Self::InvalidCredentials
            | Self::MissingToken
            | Self::InvalidToken
            | Self::TokenExpired => StatusCode::UNAUTHORIZED,
            Self::NotVerified { .. } | Self::AdminRequired => StatusCode::FORBIDDEN,
            Self::UserNotFound => StatusCode::NOT_FOUND,
            Self::Database(_) | Self::Hashing(_) | Self::Token(_) | Self::Mail(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = ?self, "request failed");
        }

        let user_id = match &self {
            Self::NotVerified { user_id } => Some(user_id.clone()),
            _ => None,
        };

        let body = ErrorResponse {
            message: self.to_string(),
            user_id,
        };

        (status, Json(body)).into_response()
    }
}
