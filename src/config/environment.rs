use std::env;

/// Environment configuration
/// Loads and validates environment variables once at startup
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_ttl_minutes: i64,
    pub frontend_url: String,
    pub port: u16,
    pub mail_api_key: Option<String>,
    pub mail_sender_email: Option<String>,
    pub mail_sender_name: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| "DATABASE_URL must be set".to_string())?;

        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| "JWT_SECRET must be set".to_string())?;

        let jwt_ttl_minutes = env::var("JWT_TTL_MINUTES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(60);

        // Password reset emails embed links into the storefront
        let frontend_url = env::var("FRONTEND_URL")
            .unwrap_or_else(|_| "http://localhost:3000".to_string());

        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);

        let mail_api_key = env::var("MAIL_API_KEY").ok();
        let mail_sender_email = env::var("MAIL_SENDER_EMAIL").ok();
        let mail_sender_name =
            env::var("MAIL_SENDER_NAME").unwrap_or_else(|_| "FitWear".to_string());

        Ok(Self {
            database_url,
            jwt_secret,
            jwt_ttl_minutes,
            frontend_url,
            port,
            mail_api_key,
            mail_sender_email,
            mail_sender_name,
        })
    }
}
