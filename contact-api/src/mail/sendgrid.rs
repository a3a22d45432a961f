//! SendGrid v3 Mail Send client.
//!
//! Reference: https://www.twilio.com/docs/sendgrid/api-reference/mail-send/mail-send

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::{error, info, warn};

use super::{ContactEmail, MailError, Mailer};
use crate::Config;

const MAIL_SEND_PATH: &str = "/v3/mail/send";

/// Mailer backed by the SendGrid HTTP API.
#[derive(Clone)]
pub struct SendGridMailer {
    client: Client,
    api_key: String,
    endpoint: String,
    to_email: String,
    from_email: String,
    from_name: String,
}

impl SendGridMailer {
    /// Build a mailer from the loaded configuration.
    ///
    /// Missing credentials are not an error here; they make every
    /// [`Mailer::send`] fail fast instead.
    pub fn new(config: &Config) -> Result<Self, MailError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()?;

        Ok(Self::with_client(client, config))
    }

    /// Build a mailer around an existing HTTP client.
    pub fn with_client(client: Client, config: &Config) -> Self {
        Self {
            client,
            api_key: config.sendgrid_api_key.trim().to_string(),
            endpoint: format!(
                "{}{}",
                config.sendgrid_base_url.trim_end_matches('/'),
                MAIL_SEND_PATH
            ),
            to_email: config.contact_to_email.trim().to_string(),
            from_email: config.contact_from_email.trim().to_string(),
            from_name: config.contact_from_name.clone(),
        }
    }

    fn is_configured(&self) -> bool {
        !self.api_key.is_empty() && !self.to_email.is_empty()
    }

    fn build_request<'a>(&'a self, email: &'a ContactEmail) -> MailSendRequest<'a> {
        MailSendRequest {
            personalizations: vec![Personalization {
                to: vec![Address {
                    email: &self.to_email,
                    name: None,
                }],
            }],
            from: Address {
                email: &self.from_email,
                name: Some(&self.from_name),
            },
            reply_to: Address {
                email: &email.reply_to_email,
                name: Some(&email.reply_to_name),
            },
            subject: &email.subject,
            content: vec![
                Content {
                    content_type: "text/plain",
                    value: &email.text_body,
                },
                Content {
                    content_type: "text/html",
                    value: &email.html_body,
                },
            ],
        }
    }
}

#[async_trait]
impl Mailer for SendGridMailer {
    async fn send(&self, name: &str, email: &str, message: &str) -> Result<(), MailError> {
        if !self.is_configured() {
            error!(
                has_api_key = !self.api_key.is_empty(),
                has_to_email = !self.to_email.is_empty(),
                "sendgrid_not_configured"
            );
            return Err(MailError::NotConfigured);
        }

        let contact_email = ContactEmail::new(name, email, message);
        let request = self.build_request(&contact_email);

        let response = match self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => {
                if e.is_timeout() {
                    error!(error = %e, "sendgrid_send_timeout");
                } else {
                    error!(error = %e, "sendgrid_send_error");
                }
                return Err(MailError::Transport(e));
            }
        };

        let status = response.status();
        info!(status_code = status.as_u16(), "sendgrid_response");

        if status.is_success() {
            return Ok(());
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                warn!(error = %e, "sendgrid_error_body_unreadable");
                String::new()
            }
        };

        error!(status_code = status.as_u16(), body = %body, "sendgrid_send_rejected");

        Err(MailError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}

// =============================================================================
// Wire Types
// =============================================================================

#[derive(Debug, Serialize)]
struct MailSendRequest<'a> {
    personalizations: Vec<Personalization<'a>>,
    from: Address<'a>,
    reply_to: Address<'a>,
    subject: &'a str,
    content: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Personalization<'a> {
    to: Vec<Address<'a>>,
}

#[derive(Debug, Serialize)]
struct Address<'a> {
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(rename = "type")]
    content_type: &'static str,
    value: &'a str,
}
