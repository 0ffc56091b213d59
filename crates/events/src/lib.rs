//! Outcome notifications for the translation marketplace.
//!
//! Everything here is fire-and-forget email over SMTP: a failure is reported
//! to the caller as an error, never retried, and no delivery guarantee is
//! implied.

mod email;

pub use email::{MailError, Mailer, SmtpConfig};

use async_trait::async_trait;
use traduko_core::allocator::Notifier;
use traduko_core::error::CoreError;
use traduko_core::types::DbId;

/// [`Notifier`] implementation over the SMTP [`Mailer`].
#[derive(Clone)]
pub struct MailNotifier {
    mailer: Mailer,
}

impl MailNotifier {
    pub fn new(mailer: Mailer) -> Self {
        Self { mailer }
    }
}

#[async_trait]
impl Notifier for MailNotifier {
    async fn project_assigned(&self, email: &str, project: DbId) -> Result<(), CoreError> {
        self.mailer
            .send_project_assigned(email, project)
            .await
            .map_err(|e| CoreError::Internal(format!("assigned notification: {e}")))
    }

    async fn allocation_failed(&self, email: &str, project: DbId) -> Result<(), CoreError> {
        self.mailer
            .send_allocation_failed(email, project)
            .await
            .map_err(|e| CoreError::Internal(format!("allocation-failed notification: {e}")))
    }
}
