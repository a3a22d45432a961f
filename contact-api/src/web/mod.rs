//! Web server module for the contact form endpoint.
//!
//! - `POST /api/contact` validates a submission and relays it by email
//! - `GET /health` answers `{"status":"ok"}`

pub mod handlers;
pub mod submission;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

pub use handlers::{contact, health, process_contact, AppState, ContactResponse, HealthResponse};
pub use submission::{ContactError, Submission, ValidSubmission};

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/contact", post(contact))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
