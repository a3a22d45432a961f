//! Outbound notification email.
//!
//! The handler only sees the [`Mailer`] trait. [`SendGridMailer`] is the
//! production implementation; tests substitute their own.
//!
//! ## Flow
//!
//! ```text
//! validated fields → ContactEmail::new() → SendGridMailer::send() → SendGrid v3 API
//! ```

pub mod message;
pub mod sendgrid;

use async_trait::async_trait;
use thiserror::Error;

pub use message::{escape_html, ContactEmail};
pub use sendgrid::SendGridMailer;

/// Why a notification was not sent.
#[derive(Debug, Error)]
pub enum MailError {
    /// API key or destination inbox is missing.
    #[error("mailer is not configured")]
    NotConfigured,

    /// The provider answered with a non-success status.
    #[error("provider rejected the message with status {status}")]
    Rejected { status: u16, body: String },

    /// The request never got a response.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Sends a contact notification for one validated submission.
///
/// A single attempt is made. `Ok` means the provider accepted the message.
#[async_trait]
pub trait Mailer: Send + Sync + 'static {
    async fn send(&self, name: &str, email: &str, message: &str) -> Result<(), MailError>;
}
