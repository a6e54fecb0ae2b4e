use std::{sync::Arc, time::Duration};

use anyhow::Context;
use async_trait::async_trait;
use serde_json::json;
use tracing::{info, warn};

use crate::config::MailConfig;

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_welcome(&self, username: &str, email: &str) -> anyhow::Result<()>;
}

/// Sends mail through a SendGrid-style JSON API.
#[derive(Clone)]
pub struct HttpMailer {
    client: reqwest::Client,
    cfg: MailConfig,
}

impl HttpMailer {
    pub fn new(cfg: MailConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .context("build mail http client")?;
        Ok(Self { client, cfg })
    }
}

pub(crate) fn welcome_payload(from: &str, username: &str, email: &str) -> serde_json::Value {
    json!({
        "personalizations": [{ "to": [{ "email": email, "name": username }] }],
        "from": { "email": from },
        "subject": "Welcome to devhub",
        "content": [{
            "type": "text/plain",
            "value": format!("Hi {username}, thanks for signing up!"),
        }],
    })
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send_welcome(&self, username: &str, email: &str) -> anyhow::Result<()> {
        self.client
            .post(&self.cfg.api_url)
            .bearer_auth(&self.cfg.api_key)
            .json(&welcome_payload(&self.cfg.from, username, email))
            .send()
            .await
            .context("mail api request")?
            .error_for_status()
            .context("mail api response")?;
        Ok(())
    }
}

/// Used when no mail API is configured.
#[derive(Clone, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send_welcome(&self, username: &str, _email: &str) -> anyhow::Result<()> {
        info!(%username, "mail not configured, skipping welcome email");
        Ok(())
    }
}

/// Fire-and-forget welcome email; failures only reach the log.
pub fn spawn_welcome(mailer: Arc<dyn Mailer>, username: String, email: String) {
    tokio::spawn(async move {
        if let Err(e) = mailer.send_welcome(&username, &email).await {
            warn!(error = %e, %username, "error sending welcome email");
        }
    });
}
