use async_trait::async_trait;

use super::{Email, Mailer};

/// Used when no relay is configured: the mail is only written to the log.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: &Email) -> anyhow::Result<()> {
        tracing::info!(to = %email.to, subject = %email.subject, body = %email.text, "email (not delivered, no relay configured)");
        Ok(())
    }
}
