//! Contact API - contact form endpoint with email relay.
//!
//! This library provides the modules behind the `contact-api` binary:
//! - `web`: the `POST /api/contact` handler, submission parsing and validation
//! - `mail`: notification construction and the SendGrid mailer
//! - `config`: environment configuration loaded once at startup
//!
//! ## Flow
//!
//! ```text
//! Browser form → POST /api/contact → validate → Mailer::send → SendGrid → inbox
//! ```

pub mod config;
pub mod mail;
pub mod web;

// Re-export commonly used types
pub use config::Config;
pub use mail::{MailError, Mailer, SendGridMailer};
pub use web::{router, AppState, ContactError, ContactResponse};
