use std::time::Duration;

use anyhow::Context as _;
use reqwest::header::ACCEPT;
use serde::Serialize;

use crate::config::MailApiConfig;
use crate::domain::repository::MailPort;
use crate::domain::types::MailMessage;
use crate::error::RegistrationServiceError;

const MAIL_API_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MailAddress<'a> {
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

/// Brevo-style transactional mail payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendMailBody<'a> {
    sender: MailAddress<'a>,
    to: Vec<MailAddress<'a>>,
    subject: &'a str,
    text_content: &'a str,
}

/// Sends mail through a JSON HTTP API authenticated with an `api-key` header.
#[derive(Clone)]
pub struct HttpMailer {
    client: reqwest::Client,
    config: MailApiConfig,
}

impl HttpMailer {
    pub fn new(config: MailApiConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(MAIL_API_TIMEOUT)
            .build()
            .context("build mail API client")?;
        Ok(Self { client, config })
    }
}

impl MailPort for HttpMailer {
    async fn send(&self, message: &MailMessage) -> Result<(), RegistrationServiceError> {
        let body = SendMailBody {
            sender: MailAddress {
                email: &self.config.sender_email,
                name: self.config.sender_name.as_deref(),
            },
            to: vec![MailAddress {
                email: &message.to,
                name: None,
            }],
            subject: &message.subject,
            text_content: &message.text,
        };

        let resp = self
            .client
            .post(&self.config.url)
            .header("api-key", &self.config.api_key)
            .header(ACCEPT, "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "mail API unreachable");
                RegistrationServiceError::DeliveryFailed
            })?;

        let status = resp.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), to = %message.to, "mail API rejected message");
            return Err(RegistrationServiceError::DeliveryFailed);
        }
        Ok(())
    }
}

/// Stand-in used when no mail API is configured. The text (which carries
/// the OTP) is only emitted at debug level.
#[derive(Clone, Default)]
pub struct LogMailer;

impl MailPort for LogMailer {
    async fn send(&self, message: &MailMessage) -> Result<(), RegistrationServiceError> {
        tracing::info!(to = %message.to, subject = %message.subject, "mail API not configured, message not sent");
        tracing::debug!(to = %message.to, text = %message.text, "undelivered message");
        Ok(())
    }
}

/// Mail transport selected at startup.
#[derive(Clone)]
pub enum Mailer {
    Http(HttpMailer),
    Log(LogMailer),
}

impl Mailer {
    pub fn from_config(config: Option<MailApiConfig>) -> anyhow::Result<Self> {
        match config {
            Some(api) => Ok(Self::Http(HttpMailer::new(api)?)),
            None => Ok(Self::Log(LogMailer)),
        }
    }
}

impl MailPort for Mailer {
    async fn send(&self, message: &MailMessage) -> Result<(), RegistrationServiceError> {
        match self {
            Self::Http(mailer) => mailer.send(message).await,
            Self::Log(mailer) => mailer.send(message).await,
        }
    }
}
