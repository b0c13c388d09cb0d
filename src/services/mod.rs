pub mod auth_middleware;
pub mod cleanup;
pub mod hashing;
pub mod jwt;
pub mod mailer;
pub mod metrics;
pub mod otp;
pub mod security;
