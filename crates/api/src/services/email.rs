//! Email service for welcome and password-reset emails.
//!
//! Supported providers:
//! - `console`: Logs emails to console (development)
//! - `sendgrid`: Uses the SendGrid API
//!
//! Delivery is best-effort everywhere: a failed send is logged and never
//! rolls back the mutation that triggered it.

use crate::config::EmailConfig;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info};

/// Errors that can occur during email operations.
#[derive(Debug, Error)]
pub enum EmailError {
    #[error("Email service not configured")]
    NotConfigured,

    #[error("Failed to send email: {0}")]
    SendFailed(String),

    #[error("Provider error: {0}")]
    ProviderError(String),
}

/// Email message to be sent.
#[derive(Debug, Clone)]
pub struct EmailMessage {
    /// Recipient email address
    pub to: String,
    /// Recipient name (optional)
    pub to_name: Option<String>,
    /// Email subject
    pub subject: String,
    /// Plain text body
    pub body_text: String,
}

/// Email service for sending transactional emails.
#[derive(Clone)]
pub struct EmailService {
    config: Arc<EmailConfig>,
}

impl EmailService {
    /// Creates a new EmailService with the given configuration.
    pub fn new(config: EmailConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Send an email message.
    pub async fn send(&self, message: EmailMessage) -> Result<(), EmailError> {
        if !self.config.enabled {
            debug!(
                to = %message.to,
                subject = %message.subject,
                "Email service disabled, skipping send"
            );
            return Ok(());
        }

        match self.config.provider.as_str() {
            "console" => self.send_console(message).await,
            "sendgrid" => self.send_sendgrid(message).await,
            provider => {
                error!(provider = %provider, "Unknown email provider");
                Err(EmailError::NotConfigured)
            }
        }
    }

    /// Send a welcome email after registration.
    pub async fn send_welcome_email(&self, to_email: &str, to_name: &str) -> Result<(), EmailError> {
        let subject = "Welcome to EventHub";

        let body_text = format!(
            r#"Hi {name},

Welcome to EventHub! Your account is ready.

Browse upcoming events, RSVP to the ones you like, and check in with a
QR code at the door.

Best regards,
The EventHub Team"#,
            name = to_name
        );

        self.send(EmailMessage {
            to: to_email.to_string(),
            to_name: Some(to_name.to_string()),
            subject: subject.to_string(),
            body_text,
        })
        .await
    }

    /// Send a password reset email.
    pub async fn send_password_reset_email(
        &self,
        to_email: &str,
        to_name: &str,
        reset_token: &str,
        app_base_url: &str,
    ) -> Result<(), EmailError> {
        let reset_url = format!("{}/reset-password?token={}", app_base_url, reset_token);

        let subject = "Reset your password - EventHub";

        let body_text = format!(
            r#"Hi {name},

We received a request to reset your password. Click the link below to
choose a new one:

{url}

This link will expire in 1 hour. If you didn't request a reset, you can
safely ignore this email.

Best regards,
The EventHub Team"#,
            name = to_name,
            url = reset_url
        );

        self.send(EmailMessage {
            to: to_email.to_string(),
            to_name: Some(to_name.to_string()),
            subject: subject.to_string(),
            body_text,
        })
        .await
    }

    /// Console provider - logs email to console (for development).
    async fn send_console(&self, message: EmailMessage) -> Result<(), EmailError> {
        info!(
            to = %message.to,
            to_name = ?message.to_name,
            subject = %message.subject,
            from = %self.config.sender_email,
            from_name = %self.config.sender_name,
            "Email (console provider)"
        );

        info!(
            body_text = %message.body_text,
            "Email body (plain text)"
        );

        Ok(())
    }

    /// SendGrid provider - sends via the SendGrid API.
    async fn send_sendgrid(&self, message: EmailMessage) -> Result<(), EmailError> {
        if self.config.sendgrid_api_key.is_empty() {
            return Err(EmailError::NotConfigured);
        }

        let client = reqwest::Client::new();

        let mut to = serde_json::json!({ "email": message.to });
        if let Some(name) = &message.to_name {
            to["name"] = serde_json::json!(name);
        }

        let body = serde_json::json!({
            "personalizations": [{ "to": [to] }],
            "from": {
                "email": self.config.sender_email,
                "name": self.config.sender_name
            },
            "subject": message.subject,
            "content": [{
                "type": "text/plain",
                "value": message.body_text
            }]
        });

        let response = client
            .post("https://api.sendgrid.com/v3/mail/send")
            .bearer_auth(&self.config.sendgrid_api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| EmailError::SendFailed(e.to_string()))?;

        if response.status().is_success() {
            info!(to = %message.to, "Email sent via SendGrid");
            Ok(())
        } else {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            Err(EmailError::ProviderError(format!(
                "SendGrid returned {}: {}",
                status, text
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_message() -> EmailMessage {
        EmailMessage {
            to: "test@example.com".to_string(),
            to_name: Some("Test".to_string()),
            subject: "Test".to_string(),
            body_text: "Hello".to_string(),
        }
    }

    #[tokio::test]
    async fn test_send_skips_when_disabled() {
        let service = EmailService::new(EmailConfig {
            enabled: false,
            ..Default::default()
        });
        assert!(service.send(test_message()).await.is_ok());
    }

    #[tokio::test]
    async fn test_send_console_provider() {
        let service = EmailService::new(EmailConfig {
            enabled: true,
            provider: "console".to_string(),
            ..Default::default()
        });
        assert!(service.send(test_message()).await.is_ok());
    }

    #[tokio::test]
    async fn test_unknown_provider_fails() {
        let service = EmailService::new(EmailConfig {
            enabled: true,
            provider: "carrier-pigeon".to_string(),
            ..Default::default()
        });
        assert!(matches!(
            service.send(test_message()).await,
            Err(EmailError::NotConfigured)
        ));
    }

    #[tokio::test]
    async fn test_sendgrid_without_key_fails() {
        let service = EmailService::new(EmailConfig {
            enabled: true,
            provider: "sendgrid".to_string(),
            ..Default::default()
        });
        assert!(matches!(
            service.send(test_message()).await,
            Err(EmailError::NotConfigured)
        ));
    }

    #[tokio::test]
    async fn test_password_reset_email_contains_link() {
        let service = EmailService::new(EmailConfig::default());
        // Disabled service: send succeeds without contacting anything
        assert!(service
            .send_password_reset_email(
                "test@example.com",
                "Test",
                "tok123",
                "https://app.example.com"
            )
            .await
            .is_ok());
    }
}
