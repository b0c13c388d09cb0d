use axum::{extract::State, http::StatusCode, Json};
use chrono::{Duration, Utc};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::modules::auth::crud::{TokenCrud, UserCrud};
use crate::modules::auth::error::AuthError;
use crate::modules::auth::model::{AccountStatus, Role, User, VerificationToken};
use crate::modules::auth::schema::{
    ForgotPasswordRequest, ForgotPasswordResponse, LoginRequest, LoginResponse, RegisterRequest,
    RegisterResponse, ResendOtpRequest, ResendOtpResponse, ResetPasswordRequest,
    ResetPasswordResponse, UserResponse, VerifyOtpRequest, VerifyOtpResponse,
    VerifyResetOtpRequest, VerifyResetOtpResponse,
};
use crate::services::mailer::{send_password_reset_email, send_verification_email};
use crate::services::{hashing, otp};
use crate::AppState;

const VERIFICATION_OTP_TTL_HOURS: i64 = 24;
const RESET_OTP_TTL_MINUTES: i64 = 10;

fn new_verification_token(user_id: &str, code: String) -> VerificationToken {
    let now = Utc::now();
    VerificationToken {
        id: Uuid::new_v4().to_string(),
        user_id: user_id.to_string(),
        token: code,
        expires_at: now + Duration::hours(VERIFICATION_OTP_TTL_HOURS),
        created_at: now,
    }
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AuthError> {
    req.validate()?;

    let password_hash = hashing::hash_password(&req.password)?;

    let now = Utc::now();
    let user = User {
        id: Uuid::new_v4().to_string(),
        name: req.name.trim().to_string(),
        email: req.email.to_lowercase(),
        username: req.username.clone(),
        password_hash,
        role: Role::User,
        is_verified: false,
        reset_token: None,
        reset_token_expires_at: None,
        is_reset_token_verified: false,
        last_login_at: None,
        account_status: AccountStatus::Active,
        created_at: now,
        updated_at: now,
    };

    let code = otp::generate_otp();
    let token = new_verification_token(&user.id, code.clone());

    let users = UserCrud::new(state.db.clone());
    users.create_with_verification(&user, &token).await?;
    state.metrics.auth_registrations_total.inc();

    // The account and its code are already committed. A failed send surfaces
    // as 500 and the client recovers through resend-otp.
    send_verification_email(state.mailer.as_ref(), &user.email, &code).await?;

    tracing::info!(user_id = %user.id, "user registered");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "Verification OTP sent to your email",
            user_id: user.id,
        }),
    ))
}

pub async fn verify_otp(
    State(state): State<Arc<AppState>>,
    Json(req): Json<VerifyOtpRequest>,
) -> Result<Json<VerifyOtpResponse>, AuthError> {
    let tokens = TokenCrud::new(state.db.clone());
    let users = UserCrud::new(state.db.clone());

    let token = tokens
        .find_valid(&req.user_id, &req.otp, Utc::now())
        .await?
        .ok_or(AuthError::InvalidOtp)?;

    users.mark_verified(&req.user_id).await?;
    let user = users
        .find_by_id(&req.user_id)
        .await?
        .ok_or(AuthError::InvalidOtp)?;
    tokens.delete(&token.id).await?;

    let jwt = state.jwt_service.create_token(&user.id, user.role)?;
    state.metrics.auth_verifications_total.inc();
    tracing::info!(user_id = %user.id, "account verified");

    Ok(Json(VerifyOtpResponse {
        token: jwt,
        user: UserResponse::from(&user),
        message: "Account verified successfully",
    }))
}

pub async fn resend_otp(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ResendOtpRequest>,
) -> Result<Json<ResendOtpResponse>, AuthError> {
    let users = UserCrud::new(state.db.clone());
    let user = users
        .find_by_id(&req.user_id)
        .await?
        .ok_or(AuthError::UserNotFound)?;

    if user.is_verified {
        return Err(AuthError::AlreadyVerified);
    }

    let code = otp::generate_otp();
    let token = new_verification_token(&user.id, code.clone());
    TokenCrud::new(state.db.clone())
        .replace_for_user(&token)
        .await?;

    send_verification_email(state.mailer.as_ref(), &user.email, &code).await?;

    tracing::info!(user_id = %user.id, "verification OTP reissued");

    Ok(Json(ResendOtpResponse {
        message: "Verification OTP sent to your email",
        user_id: user.id,
    }))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AuthError> {
    let users = UserCrud::new(state.db.clone());

    // Unknown email and wrong password are indistinguishable to the caller.
    let Some(user) = users.find_by_email(&req.email.to_lowercase()).await? else {
        state
            .metrics
            .auth_logins_total
            .with_label_values(&["invalid_credentials"])
            .inc();
        return Err(AuthError::InvalidCredentials);
    };

    if !hashing::verify_password(&req.password, &user.password_hash)? {
        state
            .metrics
            .auth_logins_total
            .with_label_values(&["invalid_credentials"])
            .inc();
        return Err(AuthError::InvalidCredentials);
    }

    if !user.is_verified {
        state
            .metrics
            .auth_logins_total
            .with_label_values(&["unverified"])
            .inc();
        return Err(AuthError::NotVerified { user_id: user.id });
    }

    let token = state.jwt_service.create_token(&user.id, user.role)?;
    users.record_login(&user.id, Utc::now()).await?;

    state
        .metrics
        .auth_logins_total
        .with_label_values(&["success"])
        .inc();
    tracing::info!(user_id = %user.id, "login");

    Ok(Json(LoginResponse {
        token,
        user: UserResponse::from(&user),
    }))
}

pub async fn forgot_password(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ForgotPasswordRequest>,
) -> Result<Json<ForgotPasswordResponse>, AuthError> {
    req.validate()?;

    let users = UserCrud::new(state.db.clone());
    let user = users
        .find_by_email(&req.email.to_lowercase())
        .await?
        .ok_or(AuthError::UserNotFound)?;

    let code = otp::generate_otp();
    let expires_at = Utc::now() + Duration::minutes(RESET_OTP_TTL_MINUTES);
    users.set_reset_code(&user.id, &code, expires_at).await?;

    send_password_reset_email(state.mailer.as_ref(), &state.frontend_url, &user.email, &code)
        .await?;

    tracing::info!(user_id = %user.id, "password reset requested");

    Ok(Json(ForgotPasswordResponse {
        message: "Password reset OTP sent to your email",
        email: user.email,
    }))
}

pub async fn verify_password_reset_otp(
    State(state): State<Arc<AppState>>,
    Json(req): Json<VerifyResetOtpRequest>,
) -> Result<Json<VerifyResetOtpResponse>, AuthError> {
    let users = UserCrud::new(state.db.clone());
    let user = users
        .find_by_valid_reset_code(&req.email.to_lowercase(), &req.otp, Utc::now())
        .await?
        .ok_or(AuthError::InvalidOtp)?;

    users.mark_reset_code_verified(&user.id).await?;

    Ok(Json(VerifyResetOtpResponse {
        message: "OTP verified successfully",
        email: user.email,
    }))
}

pub async fn reset_password(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ResetPasswordRequest>,
) -> Result<Json<ResetPasswordResponse>, AuthError> {
    req.validate()?;

    let password_hash = hashing::hash_password(&req.new_password)?;
    let updated = UserCrud::new(state.db.clone())
        .complete_password_reset(&req.email.to_lowercase(), &password_hash, Utc::now())
        .await?;

    if updated == 0 {
        return Err(AuthError::ResetNotInitiated);
    }

    state.metrics.auth_password_resets_total.inc();
    tracing::info!("password reset completed");

    Ok(Json(ResetPasswordResponse {
        message: "Password reset successfully",
    }))
}
