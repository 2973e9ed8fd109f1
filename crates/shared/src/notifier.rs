use std::io::Write;
use std::sync::Mutex;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::info;

use crate::config::{MailgunConfig, RunMode};
use crate::error::DeliveryError;

#[derive(Debug, Clone)]
pub struct DeliveryContext {
    pub source_post_url: String,
}

/// Final destination of a run's serialized result.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn deliver(&self, payload: &str, context: &DeliveryContext) -> Result<(), DeliveryError>;
}

/// Picks the notifier for a run mode.
pub fn notifier_for(mode: &RunMode) -> Result<Box<dyn Notifier>> {
    Ok(match mode {
        RunMode::Local => Box::new(ConsoleNotifier::stdout()),
        RunMode::Mailgun(config) => Box::new(MailgunNotifier::new(config.clone())?),
    })
}

/// Writes the payload as one line.
pub struct ConsoleNotifier {
    out: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleNotifier {
    pub fn stdout() -> Self {
        Self::new(Box::new(std::io::stdout()))
    }

    pub fn new(out: Box<dyn Write + Send>) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }
}

#[async_trait]
impl Notifier for ConsoleNotifier {
    async fn deliver(&self, payload: &str, context: &DeliveryContext) -> Result<(), DeliveryError> {
        let mut out = self
            .out
            .lock()
            .map_err(|_| std::io::Error::other("output lock poisoned"))?;
        writeln!(out, "{}", payload)?;
        out.flush()?;

        info!(source = %context.source_post_url, "printed reading list");
        Ok(())
    }
}

#[derive(Deserialize)]
struct MailgunResponse {
    #[serde(default)]
    id: Option<String>,
}

pub struct MailgunNotifier {
    client: Client,
    config: MailgunConfig,
}

impl MailgunNotifier {
    pub fn new(config: MailgunConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, config })
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/v3/sandbox{}.mailgun.org/messages",
            self.config.api_base.trim_end_matches('/'),
            self.config.sandbox_id
        )
    }

    fn recipient(&self) -> String {
        match &self.config.email_name {
            Some(name) => format!("{} <{}>", name, self.config.email_address),
            None => self.config.email_address.clone(),
        }
    }
}

#[async_trait]
impl Notifier for MailgunNotifier {
    async fn deliver(&self, payload: &str, context: &DeliveryContext) -> Result<(), DeliveryError> {
        let from = format!(
            "big picture reads <postmaster@sandbox{}.mailgun.org>",
            self.config.sandbox_id
        );
        let subject = format!("big picture reads json {}", chrono::Utc::now().timestamp());
        let to = self.recipient();

        let form = [
            ("from", from.as_str()),
            ("to", to.as_str()),
            ("subject", subject.as_str()),
            ("text", payload),
            ("v:source_post", context.source_post_url.as_str()),
        ];

        let response = self
            .client
            .post(self.messages_url())
            .basic_auth("api", Some(&self.config.api_key))
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("unknown error"));
            return Err(DeliveryError::Rejected { status, body });
        }

        let id = response
            .json::<MailgunResponse>()
            .await
            .ok()
            .and_then(|r| r.id)
            .unwrap_or_default();
        info!(message_id = %id, to = %self.config.email_address, "reading list emailed");
        Ok(())
    }
}
