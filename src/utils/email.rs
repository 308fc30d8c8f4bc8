use std::sync::Arc;

use async_trait::async_trait;
use lettre::message::{MultiPart, SinglePart, header};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use thiserror::Error;
use tracing::{info, instrument};

use staybook_config::EmailConfig;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("invalid address: {0}")]
    Address(String),
    #[error("failed to build message: {0}")]
    Build(String),
    #[error("smtp transport error: {0}")]
    Transport(String),
}

/// Outbound mail capability used by registration.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Sends the account confirmation link carrying `token`.
    async fn send_confirmation(&self, email: &str, token: &str) -> Result<(), MailError>;
}

/// Picks the SMTP transport when enabled, otherwise logs dispatches.
pub fn mailer_from_config(config: &EmailConfig) -> Arc<dyn Mailer> {
    if config.enabled {
        Arc::new(SmtpMailer::new(config.clone()))
    } else {
        Arc::new(LogMailer)
    }
}

pub fn confirmation_link(app_url: &str, token: &str) -> String {
    format!(
        "{}/api/auth/confirm-account?token={}",
        app_url.trim_end_matches('/'),
        token
    )
}

pub struct SmtpMailer {
    config: EmailConfig,
}

impl SmtpMailer {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    fn transport(&self) -> Result<SmtpTransport, MailError> {
        if self.config.smtp_username.is_empty() {
            return Ok(SmtpTransport::builder_dangerous(&self.config.smtp_host)
                .port(self.config.smtp_port)
                .build());
        }

        let creds = Credentials::new(
            self.config.smtp_username.clone(),
            self.config.smtp_password.clone(),
        );

        Ok(SmtpTransport::relay(&self.config.smtp_host)
            .map_err(|e| MailError::Transport(e.to_string()))?
            .port(self.config.smtp_port)
            .credentials(creds)
            .build())
    }

    fn confirmation_message(&self, to_email: &str, link: &str) -> Result<Message, MailError> {
        let from = format!("{} <{}>", self.config.from_name, self.config.from_email);
        let text_body = format!(
            "Welcome to Staybook!\n\n\
             Please confirm your email address by opening the link below:\n\
             {}\n\n\
             If you didn't create an account, you can ignore this email.",
            link
        );

        Message::builder()
            .from(from.parse().map_err(|e| MailError::Address(format!("{}", e)))?)
            .to(to_email
                .parse()
                .map_err(|e| MailError::Address(format!("{}", e)))?)
            .subject("Confirm your Staybook account")
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_PLAIN)
                            .body(text_body),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_HTML)
                            .body(confirmation_template(link)),
                    ),
            )
            .map_err(|e| MailError::Build(e.to_string()))
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    #[instrument(skip(self, token))]
    async fn send_confirmation(&self, email: &str, token: &str) -> Result<(), MailError> {
        let link = confirmation_link(&self.config.app_url, token);
        let message = self.confirmation_message(email, &link)?;
        let mailer = self.transport()?;

        tokio::task::spawn_blocking(move || mailer.send(&message))
            .await
            .map_err(|e| MailError::Transport(format!("Task join error: {}", e)))?
            .map_err(|e| MailError::Transport(e.to_string()))?;

        info!("Confirmation email sent");
        Ok(())
    }
}

/// Used when SMTP is disabled. Never logs the token.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send_confirmation(&self, email: &str, _token: &str) -> Result<(), MailError> {
        info!(to = %email, "SMTP disabled, confirmation email not sent");
        Ok(())
    }
}

/// Keeps every confirmation in memory so tests can follow the emailed link.
#[cfg(any(test, feature = "test-utils"))]
#[derive(Debug, Default)]
pub struct RecordingMailer {
    sent: std::sync::Mutex<Vec<(String, String)>>,
    fail: std::sync::atomic::AtomicBool,
}

#[cfg(any(test, feature = "test-utils"))]
impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes subsequent sends fail with a transport error.
    pub fn fail_sends(&self, fail: bool) {
        self.fail.store(fail, std::sync::atomic::Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Token of the most recent confirmation sent to `email`.
    pub fn last_token_for(&self, email: &str) -> Option<String> {
        self.sent()
            .into_iter()
            .rev()
            .find(|(to, _)| to == email)
            .map(|(_, token)| token)
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[async_trait]
impl Mailer for RecordingMailer {
    async fn send_confirmation(&self, email: &str, token: &str) -> Result<(), MailError> {
        if self.fail.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(MailError::Transport("connection refused".to_string()));
        }
        self.sent
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push((email.to_string(), token.to_string()));
        Ok(())
    }
}

fn confirmation_template(link: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Confirm your account</title>
</head>
<body style="margin: 0; padding: 0; font-family: Arial, sans-serif; background-color: #f6f7f9;">
    <table width="100%" cellpadding="0" cellspacing="0" style="padding: 24px;">
        <tr>
            <td align="center">
                <table width="560" cellpadding="0" cellspacing="0" style="background-color: #ffffff; border-radius: 8px;">
                    <tr>
                        <td style="background-color: #0E7490; padding: 24px; text-align: center;">
                            <h1 style="margin: 0; color: #ffffff; font-size: 26px;">Staybook</h1>
                        </td>
                    </tr>
                    <tr>
                        <td style="padding: 32px 28px; color: #444444; font-size: 16px; line-height: 1.5;">
                            <p style="margin: 0 0 16px 0;">Thanks for signing up. Confirm your email address to start booking stays.</p>
                            <p style="margin: 24px 0; text-align: center;">
                                <a href="{link}" style="display: inline-block; padding: 12px 32px; background-color: #0E7490; color: #ffffff; text-decoration: none; border-radius: 6px; font-weight: bold;">Confirm account</a>
                            </p>
                            <p style="margin: 0 0 8px 0; font-size: 14px;">Or paste this link into your browser:</p>
                            <p style="margin: 0; font-size: 14px; color: #0E7490; word-break: break-all;">{link}</p>
                        </td>
                    </tr>
                </table>
            </td>
        </tr>
    </table>
</body>
</html>"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email_config() -> EmailConfig {
        EmailConfig {
            enabled: true,
            smtp_host: "localhost".to_string(),
            smtp_port: 1025,
            smtp_username: String::new(),
            smtp_password: String::new(),
            from_email: "noreply@staybook.dev".to_string(),
            from_name: "Staybook".to_string(),
            app_url: "https://staybook.dev/".to_string(),
        }
    }

    #[test]
    fn test_confirmation_link() {
        assert_eq!(
            confirmation_link("https://staybook.dev/", "abc.def.ghi"),
            "https://staybook.dev/api/auth/confirm-account?token=abc.def.ghi"
        );
    }

    #[test]
    fn test_confirmation_message_builds() {
        let mailer = SmtpMailer::new(email_config());
        let link = confirmation_link(&mailer.config.app_url, "tok");
        assert!(mailer.confirmation_message("guest@example.com", &link).is_ok());
    }

    #[test]
    fn test_confirmation_message_rejects_bad_address() {
        let mailer = SmtpMailer::new(email_config());
        assert!(matches!(
            mailer.confirmation_message("not an address", "link"),
            Err(MailError::Address(_))
        ));
    }

    #[test]
    fn test_template_contains_link() {
        let html = confirmation_template("https://x/confirm?token=1");
        assert_eq!(html.matches("https://x/confirm?token=1").count(), 2);
    }

    #[tokio::test]
    async fn test_recording_mailer() {
        let mailer = RecordingMailer::new();
        mailer.send_confirmation("a@example.com", "t1").await.unwrap();
        mailer.send_confirmation("a@example.com", "t2").await.unwrap();

        assert_eq!(mailer.last_token_for("a@example.com").as_deref(), Some("t2"));
        assert!(mailer.last_token_for("b@example.com").is_none());

        mailer.fail_sends(true);
        assert!(mailer.send_confirmation("a@example.com", "t3").await.is_err());
    }
}
