use chrono::{DateTime, Utc};
use sqlx::error::ErrorKind;

use crate::config::DbPool;
use crate::modules::auth::error::AuthError;
use crate::modules::auth::model::{User, VerificationToken};

/// Maps a unique-index violation on insert/update to the duplicate it names.
/// The store's constraints are the source of truth here, not a prior lookup.
fn map_unique_violation(e: sqlx::Error) -> AuthError {
    if let sqlx::Error::Database(ref db_err) = e {
        if matches!(db_err.kind(), ErrorKind::UniqueViolation) {
            let message = db_err.message();
            if message.contains("users.email") {
                return AuthError::DuplicateEmail;
            }
            if message.contains("users.username") {
                return AuthError::DuplicateUsername;
            }
        }
    }
    AuthError::Database(e)
}

pub struct UserCrud {
    pool: DbPool,
}

impl UserCrud {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Inserts the user and their initial verification code in one
    /// transaction, so no user row can exist without a code to verify it.
    pub async fn create_with_verification(
        &self,
        user: &User,
        token: &VerificationToken,
    ) -> Result<(), AuthError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO users (id, name, email, username, password_hash, role, is_verified,
                               reset_token, reset_token_expires_at, is_reset_token_verified,
                               last_login_at, account_status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.role)
        .bind(user.is_verified)
        .bind(&user.reset_token)
        .bind(user.reset_token_expires_at)
        .bind(user.is_reset_token_verified)
        .bind(user.last_login_at)
        .bind(user.account_status)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(map_unique_violation)?;

        sqlx::query(
            "INSERT INTO verification_tokens (id, user_id, token, expires_at, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&token.id)
        .bind(&token.user_id)
        .bind(&token.token)
        .bind(token.expires_at)
        .bind(token.created_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn mark_verified(&self, user_id: &str) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET is_verified = 1, updated_at = ? WHERE id = ?")
            .bind(Utc::now())
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn record_login(&self, user_id: &str, now: DateTime<Utc>) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET last_login_at = ?, updated_at = ? WHERE id = ?")
            .bind(now)
            .bind(now)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Stores a fresh reset code. Any previously verified code loses its
    /// gate: at most one reset code is live per user.
    pub async fn set_reset_code(
        &self,
        user_id: &str,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE users
            SET reset_token = ?, reset_token_expires_at = ?, is_reset_token_verified = 0, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(code)
        .bind(expires_at)
        .bind(Utc::now())
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn find_by_valid_reset_code(
        &self,
        email: &str,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE email = ? AND reset_token = ? AND reset_token_expires_at > ?",
        )
        .bind(email)
        .bind(code)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn mark_reset_code_verified(&self, user_id: &str) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET is_reset_token_verified = 1, updated_at = ? WHERE id = ?")
            .bind(Utc::now())
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Swaps in the new password hash and clears every reset field in a
    /// single statement. The WHERE clause is the gate: a verified, unexpired
    /// code must still be on the row or nothing is updated.
    pub async fn complete_password_reset(
        &self,
        email: &str,
        password_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET password_hash = ?, reset_token = NULL, reset_token_expires_at = NULL,
                is_reset_token_verified = 0, updated_at = ?
            WHERE email = ? AND is_reset_token_verified = 1 AND reset_token_expires_at > ?
            "#,
        )
        .bind(password_hash)
        .bind(now)
        .bind(email)
        .bind(now)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Partial profile update. Absent fields keep their stored values.
    pub async fn update_profile(
        &self,
        user_id: &str,
        name: Option<&str>,
        username: Option<&str>,
    ) -> Result<User, AuthError> {
        sqlx::query(
            r#"
            UPDATE users
            SET name = COALESCE(?, name), username = COALESCE(?, username), updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(name)
        .bind(username)
        .bind(Utc::now())
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(map_unique_violation)?;

        self.find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    pub async fn list_all(&self) -> Result<Vec<User>, sqlx::Error> {
        sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await
    }

    pub async fn delete_by_id(&self, id: &str) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

pub struct TokenCrud {
    pool: DbPool,
}

impl TokenCrud {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Looks up an unexpired code for the user. Expiry is checked here so a
    /// row waiting for the sweeper can never verify an account.
    pub async fn find_valid(
        &self,
        user_id: &str,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<VerificationToken>, sqlx::Error> {
        sqlx::query_as::<_, VerificationToken>(
            "SELECT * FROM verification_tokens WHERE user_id = ? AND token = ? AND expires_at > ?",
        )
        .bind(user_id)
        .bind(code)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn delete(&self, id: &str) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM verification_tokens WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Drops any outstanding codes for the user and stores the new one, so
    /// only the most recently issued code can verify the account.
    pub async fn replace_for_user(&self, token: &VerificationToken) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM verification_tokens WHERE user_id = ?")
            .bind(&token.user_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO verification_tokens (id, user_id, token, expires_at, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&token.id)
        .bind(&token.user_id)
        .bind(&token.token)
        .bind(token.expires_at)
        .bind(token.created_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await
    }

    pub async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM verification_tokens WHERE expires_at <= ?")
            .bind(now)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
