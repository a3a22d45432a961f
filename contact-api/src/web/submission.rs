//! Contact form submission parsing and validation.
//!
//! Checks run in a fixed order and the first failure wins:
//! 1. Body present and valid JSON
//! 2. Honeypot empty
//! 3. Name, then email, then message

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

use super::handlers::ContactResponse;

/// Minimum message length in characters.
pub const MIN_MESSAGE_CHARS: usize = 5;

const HONEYPOT_FIELD: &str = "honeypot";

/// Every failure the contact endpoint reports to the caller.
///
/// The `Display` text is the exact `error` string returned in the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ContactError {
    #[error("Request body is empty.")]
    EmptyBody,

    #[error("Invalid JSON.")]
    InvalidJson,

    #[error("Spam detected.")]
    SpamDetected,

    #[error("Name is required.")]
    NameRequired,

    #[error("A valid email is required.")]
    InvalidEmail,

    #[error("Message is too short.")]
    MessageTooShort,

    #[error("Message received, but email sending failed.")]
    DeliveryFailed,
}

impl ContactError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ContactError::DeliveryFailed => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ContactError {
    fn into_response(self) -> Response {
        (
            self.status_code(),
            Json(ContactResponse::failure(self.to_string())),
        )
            .into_response()
    }
}

/// Raw submission as posted by the browser form.
///
/// Every field is optional here; absence is reported by [`Submission::validate`].
#[derive(Debug, Default, Clone, Deserialize)]
pub struct Submission {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    /// Hidden form field. Browsers with a human behind them leave it empty.
    #[serde(default)]
    pub honeypot: Option<String>,
}

/// A submission that passed every check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidSubmission {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl Submission {
    /// Parse a raw request body, matching field names case-insensitively.
    pub fn parse(body: &[u8]) -> Result<Self, ContactError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(ContactError::EmptyBody);
        }

        let value: Value = serde_json::from_slice(body).map_err(|_| ContactError::InvalidJson)?;

        let fields = match value {
            Value::Null => return Err(ContactError::EmptyBody),
            Value::Object(fields) => fields,
            _ => return Err(ContactError::InvalidJson),
        };

        // Keys fold in document order, so the last spelling of a field wins.
        // A filled honeypot under any spelling still marks the submission.
        let mut tripped_honeypot = None;
        let mut lowered = Map::with_capacity(fields.len());
        for (key, value) in fields {
            let key = key.to_lowercase();
            if key == HONEYPOT_FIELD {
                if let Some(filled) = value.as_str().filter(|v| !v.trim().is_empty()) {
                    tripped_honeypot = Some(filled.to_string());
                }
            }
            lowered.insert(key, value);
        }

        let mut submission: Submission =
            serde_json::from_value(Value::Object(lowered)).map_err(|_| ContactError::InvalidJson)?;

        if tripped_honeypot.is_some() && !submission.is_spam() {
            submission.honeypot = tripped_honeypot;
        }

        Ok(submission)
    }

    /// Whether the honeypot field carries anything but whitespace.
    pub fn is_spam(&self) -> bool {
        !is_blank(&self.honeypot)
    }

    /// Run the spam check and field validation in order.
    pub fn validate(self) -> Result<ValidSubmission, ContactError> {
        if self.is_spam() {
            return Err(ContactError::SpamDetected);
        }

        let name = match self.name {
            Some(name) if !name.trim().is_empty() => name,
            _ => return Err(ContactError::NameRequired),
        };

        // Any '@' is accepted; no further address syntax checks.
        let email = match self.email {
            Some(email) if !email.trim().is_empty() && email.contains('@') => email,
            _ => return Err(ContactError::InvalidEmail),
        };

        let message = match self.message {
            Some(message)
                if !message.trim().is_empty() && message.chars().count() >= MIN_MESSAGE_CHARS =>
            {
                message
            }
            _ => return Err(ContactError::MessageTooShort),
        };

        Ok(ValidSubmission {
            name,
            email,
            message,
        })
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map(|v| v.trim().is_empty()).unwrap_or(true)
}
