//! Configuration module for environment variable parsing.
//!
//! Everything is read once at startup into an immutable [`Config`] that is
//! handed to the mailer and the router state. Nothing reads the environment
//! after that.

use std::env;
use tracing::warn;

/// Sender display name used when `CONTACT_FROM_NAME` is unset or blank.
pub const DEFAULT_FROM_NAME: &str = "DavPadDev Contact Form";

/// SendGrid API base URL used when `SENDGRID_BASE_URL` is unset or blank.
pub const DEFAULT_SENDGRID_BASE_URL: &str = "https://api.sendgrid.com";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the web server to listen on
    pub port: u16,

    /// SendGrid API key (blank when not configured)
    pub sendgrid_api_key: String,

    /// Base URL of the SendGrid API
    pub sendgrid_base_url: String,

    /// Inbox that receives contact notifications (blank when not configured)
    pub contact_to_email: String,

    /// "From" address on outgoing notifications
    pub contact_from_email: String,

    /// "From" display name on outgoing notifications
    pub contact_from_name: String,

    /// Outbound HTTP request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let contact_to_email = env_string("CONTACT_TO_EMAIL");

        Config {
            port: parse_number("PORT", 8080),

            sendgrid_api_key: env_string("SENDGRID_API_KEY"),

            sendgrid_base_url: resolve(
                &env_string("SENDGRID_BASE_URL"),
                DEFAULT_SENDGRID_BASE_URL,
            ),

            contact_from_email: resolve(&env_string("CONTACT_FROM_EMAIL"), &contact_to_email),

            contact_from_name: resolve(&env_string("CONTACT_FROM_NAME"), DEFAULT_FROM_NAME),

            contact_to_email,

            request_timeout_ms: parse_number("REQUEST_TIMEOUT_MS", 10_000),
        }
    }

    /// Whether both the API key and the destination inbox are present.
    pub fn is_mail_configured(&self) -> bool {
        !self.sendgrid_api_key.trim().is_empty() && !self.contact_to_email.trim().is_empty()
    }
}

/// Return `value` unless it is blank, in which case return `fallback`.
pub fn resolve(value: &str, fallback: &str) -> String {
    if value.trim().is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}

/// Read a variable, treating an unset variable as an empty string.
fn env_string(name: &str) -> String {
    env::var(name).unwrap_or_default()
}

/// Parse a numeric variable, falling back to `default` when unset or invalid.
fn parse_number<T: std::str::FromStr + Copy + std::fmt::Display>(name: &str, default: T) -> T {
    let raw = match env::var(name) {
        Ok(v) if !v.trim().is_empty() => v,
        _ => return default,
    };

    match raw.trim().parse() {
        Ok(value) => value,
        Err(_) => {
            warn!(env_var = name, value = %raw, default = %default, "Invalid number, using default");
            default
        }
    }
}
