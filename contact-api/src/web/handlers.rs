//! Contact endpoint handlers.
//!
//! The contact handler:
//! 1. Parses the raw body
//! 2. Runs the honeypot check and field validation
//! 3. Sends one notification through the configured [`Mailer`]
//! 4. Answers with `{success, error}`
//!
//! Every failure becomes a JSON response; nothing escapes the handler.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::mail::Mailer;
use crate::web::submission::{ContactError, Submission};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub mailer: Arc<dyn Mailer>,
}

impl AppState {
    pub fn new(mailer: Arc<dyn Mailer>) -> Self {
        Self { mailer }
    }
}

// =============================================================================
// Health Check
// =============================================================================

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

// =============================================================================
// Contact Form
// =============================================================================

/// Contact endpoint response body.
///
/// `error` is always present, as `null` on success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactResponse {
    pub success: bool,
    pub error: Option<String>,
}

impl ContactResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }
}

/// Contact form endpoint.
pub async fn contact(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let body = match body {
        Ok(body) => body,
        Err(e) => {
            warn!(error = %e, "contact_body_unreadable");
            return ContactError::InvalidJson.into_response();
        }
    };

    info!(body_length = body.len(), "contact_received");

    match process_contact(state.mailer.as_ref(), &body).await {
        Ok(()) => (StatusCode::OK, Json(ContactResponse::ok())).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Validate one raw submission and relay it.
pub async fn process_contact(mailer: &dyn Mailer, body: &[u8]) -> Result<(), ContactError> {
    let submission = Submission::parse(body).map_err(|e| {
        warn!(reason = %e, "contact_parse_failed");
        e
    })?;

    if submission.is_spam() {
        warn!("contact_spam_detected");
        return Err(ContactError::SpamDetected);
    }

    let valid = submission.validate().map_err(|e| {
        info!(reason = %e, "contact_validation_failed");
        e
    })?;

    if let Err(e) = mailer.send(&valid.name, &valid.email, &valid.message).await {
        error!(error = %e, "contact_send_failed");
        return Err(ContactError::DeliveryFailed);
    }

    info!("contact_sent");

    Ok(())
}
