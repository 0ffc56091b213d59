//! Email notification delivery via SMTP.
//!
//! [`Mailer`] wraps the `lettre` async SMTP transport to send plain-text
//! notifications at the marketplace's outcome points: translator assigned,
//! allocation failed, translation completed, and administrator feedback
//! responses. Configuration is loaded from environment variables; if
//! `SMTP_HOST` is not set, [`SmtpConfig::from_env`] returns `None` and no
//! mailer should be constructed.

use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use traduko_core::types::DbId;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for email delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// The recipient or sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),
}

// ---------------------------------------------------------------------------
// SmtpConfig
// ---------------------------------------------------------------------------

/// Default SMTP port (STARTTLS).
const DEFAULT_SMTP_PORT: u16 = 587;

/// Default sender address when `SMTP_FROM` is not set.
const DEFAULT_FROM_ADDRESS: &str = "noreply@traduko.local";

/// Configuration for the SMTP mailer.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    /// SMTP server hostname.
    pub smtp_host: String,
    /// SMTP server port (defaults to 587).
    pub smtp_port: u16,
    /// RFC 5322 "From" address.
    pub from_address: String,
    /// Optional SMTP username.
    pub smtp_user: Option<String>,
    /// Optional SMTP password.
    pub smtp_password: Option<String>,
}

impl SmtpConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `SMTP_HOST` is not set, signalling that email
    /// delivery is not configured and should be skipped.
    ///
    /// | Variable        | Required | Default                  |
    /// |-----------------|----------|--------------------------|
    /// | `SMTP_HOST`     | yes      | --                       |
    /// | `SMTP_PORT`     | no       | `587`                    |
    /// | `SMTP_FROM`     | no       | `noreply@traduko.local`  |
    /// | `SMTP_USER`     | no       | --                       |
    /// | `SMTP_PASSWORD` | no       | --                       |
    pub fn from_env() -> Option<Self> {
        let smtp_host = std::env::var("SMTP_HOST").ok()?;
        Some(Self {
            smtp_host,
            smtp_port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            from_address: std::env::var("SMTP_FROM")
                .unwrap_or_else(|_| DEFAULT_FROM_ADDRESS.to_string()),
            smtp_user: std::env::var("SMTP_USER").ok(),
            smtp_password: std::env::var("SMTP_PASSWORD").ok(),
        })
    }
}

// ---------------------------------------------------------------------------
// Mailer
// ---------------------------------------------------------------------------

/// Sends marketplace notification emails via SMTP.
#[derive(Clone)]
pub struct Mailer {
    config: SmtpConfig,
}

impl Mailer {
    /// Create a new mailer with the given configuration.
    pub fn new(config: SmtpConfig) -> Self {
        Self { config }
    }

    /// Tell a translator they were assigned a project.
    pub async fn send_project_assigned(
        &self,
        to_email: &str,
        project: DbId,
    ) -> Result<(), MailError> {
        self.deliver(
            to_email,
            "You have been assigned a translation project",
            &format!(
                "A new translation project ({project}) has been assigned to you.\n\
                 Log in to download the original document."
            ),
        )
        .await
    }

    /// Tell a customer no translator could be found for their project.
    pub async fn send_allocation_failed(
        &self,
        to_email: &str,
        project: DbId,
    ) -> Result<(), MailError> {
        self.deliver(
            to_email,
            "Your translation project could not be assigned",
            &format!(
                "No translator is currently registered for the language of your \
                 project ({project}). The project has been closed."
            ),
        )
        .await
    }

    /// Tell a customer their translation is ready for review.
    pub async fn send_project_completed(
        &self,
        to_email: &str,
        project: DbId,
    ) -> Result<(), MailError> {
        self.deliver(
            to_email,
            "Your translation is ready for review",
            &format!(
                "The translated file for your project ({project}) has been uploaded.\n\
                 Log in to review, approve, or reject it."
            ),
        )
        .await
    }

    /// Forward an administrator's response to a user's feedback.
    pub async fn send_feedback_response(
        &self,
        reply_to: &str,
        to_email: &str,
        project: DbId,
        message: &str,
    ) -> Result<(), MailError> {
        let body = format!(
            "An administrator has responded to the feedback on project {project}:\n\n{message}"
        );
        let email = Message::builder()
            .from(self.config.from_address.parse()?)
            .reply_to(reply_to.parse()?)
            .to(to_email.parse()?)
            .subject("Response to your project feedback")
            .header(ContentType::TEXT_PLAIN)
            .body(body)
            .map_err(|e| MailError::Build(e.to_string()))?;
        self.send(email, to_email).await
    }

    async fn deliver(&self, to_email: &str, subject: &str, body: &str) -> Result<(), MailError> {
        let email = Message::builder()
            .from(self.config.from_address.parse()?)
            .to(to_email.parse()?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| MailError::Build(e.to_string()))?;
        self.send(email, to_email).await
    }

    async fn send(&self, email: Message, to_email: &str) -> Result<(), MailError> {
        let mut transport_builder =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.smtp_host)?
                .port(self.config.smtp_port);

        if let (Some(user), Some(pass)) = (&self.config.smtp_user, &self.config.smtp_password) {
            transport_builder =
                transport_builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        let mailer = transport_builder.build();
        mailer.send(email).await?;

        tracing::info!(to = to_email, "Notification email sent");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_env_returns_none_without_smtp_host() {
        // Ensure SMTP_HOST is not set in the test environment.
        std::env::remove_var("SMTP_HOST");
        assert!(SmtpConfig::from_env().is_none());
    }

    #[test]
    fn mail_error_display_build() {
        let err = MailError::Build("missing body".to_string());
        assert_eq!(err.to_string(), "Email build error: missing body");
    }

    #[test]
    fn mail_error_display_address() {
        let addr_err: Result<lettre::Address, _> = "not-an-email".parse();
        let err = MailError::Address(addr_err.unwrap_err());
        assert!(err.to_string().contains("Email address parse error"));
    }
}
