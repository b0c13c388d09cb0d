use std::sync::Arc;

use fitwear_backend::config::{environment::Config, init_db};
use fitwear_backend::services::cleanup::CleanupEngine;
use fitwear_backend::services::jwt::JwtService;
use fitwear_backend::services::mailer::{HttpMailer, Mailer, NoopMailer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fitwear_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().expect("Failed to load environment configuration");

    let db = init_db(&config.database_url).await;
    tracing::info!("Connected to SQLite");

    let jwt_service = JwtService::with_duration(
        config.jwt_secret.clone(),
        chrono::Duration::minutes(config.jwt_ttl_minutes),
    );

    let mailer: Arc<dyn Mailer> = match (&config.mail_api_key, &config.mail_sender_email) {
        (Some(api_key), Some(sender_email)) => Arc::new(HttpMailer::new(
            api_key.clone(),
            sender_email.clone(),
            config.mail_sender_name.clone(),
        )),
        _ => {
            tracing::warn!("Mail credentials missing, outgoing email is disabled");
            Arc::new(NoopMailer)
        }
    };

    // Hourly sweep of expired verification codes
    let cleanup = CleanupEngine::new(db.clone());
    tokio::spawn(async move { cleanup.run().await });

    let app = fitwear_backend::create_app(
        db,
        jwt_service,
        mailer,
        config.frontend_url.clone(),
    )
    .await;

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    tracing::info!("Server running on http://localhost:{}", config.port);
    axum::serve(listener, app).await.unwrap();
}
