use async_trait::async_trait;
use serde::Serialize;

const DEFAULT_API_URL: &str = "https://api.brevo.com/v3/smtp/email";

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("mail provider request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("mail provider rejected the message (status {0})")]
    Rejected(reqwest::StatusCode),
}

/// Outbound email transport. Templates live with the callers; this trait
/// only moves a rendered message.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, html: &str, text: &str)
        -> Result<(), MailError>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EmailAddress {
    email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendEmailBody {
    sender: EmailAddress,
    to: Vec<EmailAddress>,
    subject: String,
    html_content: String,
    text_content: String,
}

/// Delivers through an HTTP transactional-mail API.
pub struct HttpMailer {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    sender_email: String,
    sender_name: String,
}

impl HttpMailer {
    pub fn new(api_key: String, sender_email: String, sender_name: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: DEFAULT_API_URL.to_string(),
            api_key,
            sender_email,
            sender_name,
        }
    }

    pub fn with_api_url(mut self, api_url: String) -> Self {
        self.api_url = api_url;
        self
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(
        &self,
        to: &str,
        subject: &str,
        html: &str,
        text: &str,
    ) -> Result<(), MailError> {
        let body = SendEmailBody {
            sender: EmailAddress {
                email: self.sender_email.clone(),
                name: Some(self.sender_name.clone()),
            },
            to: vec![EmailAddress {
                email: to.to_string(),
                name: None,
            }],
            subject: subject.to_string(),
            html_content: html.to_string(),
            text_content: text.to_string(),
        };

        let response = self
            .client
            .post(&self.api_url)
            .header("api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(MailError::Rejected(response.status()));
        }

        tracing::debug!(to = %to, subject = %subject, "email dispatched");
        Ok(())
    }
}

/// Accepts every message without delivering. Used when mail credentials are
/// not configured, and by the test servers.
pub struct NoopMailer;

#[async_trait]
impl Mailer for NoopMailer {
    async fn send(
        &self,
        to: &str,
        subject: &str,
        _html: &str,
        _text: &str,
    ) -> Result<(), MailError> {
        tracing::debug!(to = %to, subject = %subject, "mail disabled, dropping message");
        Ok(())
    }
}

pub async fn send_verification_email(
    mailer: &dyn Mailer,
    email: &str,
    otp: &str,
) -> Result<(), MailError> {
    let html = format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <h1 style="color: #2E86C1;">Welcome to FitWear!</h1>
  <p>Please use this code to verify your email:</p>
  <div style="background: #f5f5f5; padding: 10px; margin: 10px 0; text-align: center;">
    <strong style="font-size: 24px;">{otp}</strong>
  </div>
  <p>This code expires in 24 hours.</p>
  <p>If you didn't create an account with FitWear, please ignore this email.</p>
</div>"#
    );
    let text =
        format!("Your FitWear verification code is: {otp}\nThis code expires in 24 hours.");

    mailer
        .send(email, "Verify Your FitWear Account", &html, &text)
        .await
}

pub async fn send_password_reset_email(
    mailer: &dyn Mailer,
    frontend_url: &str,
    email: &str,
    otp: &str,
) -> Result<(), MailError> {
    let reset_url = format!("{frontend_url}/reset-password?token={otp}");
    let html = format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <h1 style="color: #2E86C1;">Password Reset Request</h1>
  <p>We received a request to reset your FitWear account password.</p>
  <p>Click the button below to reset your password:</p>
  <a href="{reset_url}"
     style="background-color: #2E86C1; color: white; padding: 10px 20px;
     text-decoration: none; border-radius: 5px; display: inline-block; margin: 10px 0;">
    Reset Password
  </a>
  <p>Or use this OTP code: <strong>{otp}</strong></p>
  <p>This code will expire in 10 minutes.</p>
  <p>If you didn't request this, please ignore this email.</p>
</div>"#
    );
    let text = format!(
        "To reset your FitWear password, click: {reset_url}\nOr use this OTP: {otp}\nThis code expires in 10 minutes."
    );

    mailer
        .send(email, "Password Reset Request - FitWear", &html, &text)
        .await
}
