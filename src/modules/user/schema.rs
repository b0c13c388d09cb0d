use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::modules::auth::model::{AccountStatus, Role, User};

lazy_static! {
    static ref USERNAME_RE: Regex = Regex::new(r"^[A-Za-z0-9_]{3,30}$").unwrap();
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 50, message = "Name cannot exceed 50 characters"))]
    pub name: Option<String>,
    #[serde(default)]
    #[validate(regex(
        path = *USERNAME_RE,
        message = "Username must be 3-30 letters, digits or underscores"
    ))]
    pub username: Option<String>,
}

/// The account's own view of itself, also what admins see when listing.
/// Password hashes and reset state never serialize.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub username: Option<String>,
    pub role: Role,
    pub is_verified: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    pub account_status: AccountStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for ProfileResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            username: user.username.clone(),
            role: user.role,
            is_verified: user.is_verified,
            last_login_at: user.last_login_at,
            account_status: user.account_status,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteUserResponse {
    pub message: &'static str,
}
