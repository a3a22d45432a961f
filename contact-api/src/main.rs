//! Contact API server.
//!
//! Serves the contact form endpoint and relays valid submissions to the
//! configured inbox through SendGrid.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::{net::TcpListener, signal};
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use contact_api::{router, AppState, Config, SendGridMailer};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize structured JSON logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().flatten_event(true))
        .init();

    info!("contact_api_starting");

    // Load configuration
    let config = Config::from_env();
    info!(
        port = config.port,
        sendgrid_api_key_configured = !config.sendgrid_api_key.trim().is_empty(),
        contact_to_email_configured = !config.contact_to_email.trim().is_empty(),
        from_name = %config.contact_from_name,
        request_timeout_ms = config.request_timeout_ms,
        "config_loaded"
    );

    if !config.is_mail_configured() {
        warn!("mail_not_configured_submissions_will_fail");
    }

    let mailer = SendGridMailer::new(&config).context("Failed to build HTTP client")?;

    let state = AppState::new(Arc::new(mailer));
    let app = router(state);

    // Bind to address
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!(address = %addr, "contact_api_listening");

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("contact_api_shutdown_complete");

    Ok(())
}

/// Create a future that completes when a shutdown signal is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "ctrl_c_handler_failed");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "sigterm_handler_failed");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT"),
        _ = terminate => info!("Received SIGTERM"),
    }

    info!("contact_api_shutting_down");
}
