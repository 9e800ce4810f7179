use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde_json::json;

use super::{Email, Mailer};

/// Sends mail through an HTTP relay that accepts `{from, to, subject, text}`
/// as JSON with a bearer API key.
pub struct HttpMailRelay {
    url: String,
    api_key: String,
    from: String,
    client: reqwest::Client,
}

impl HttpMailRelay {
    pub fn new(url: String, api_key: String, from: String, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build mail relay client")?;
        Ok(Self {
            url,
            api_key,
            from,
            client,
        })
    }
}

#[async_trait]
impl Mailer for HttpMailRelay {
    async fn send(&self, email: &Email) -> anyhow::Result<()> {
        let body = json!({
            "from": self.from,
            "to": email.to,
            "subject": email.subject,
            "text": email.text,
        });

        self.client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .context("failed to reach mail relay")?
            .error_for_status()
            .context("mail relay returned error")?;

        tracing::info!(to = %email.to, subject = %email.subject, "email sent");
        Ok(())
    }
}
