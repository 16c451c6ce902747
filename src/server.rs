//! # Trigger Server
//!
//! This module runs the `axum`-based web server that receives the
//! job-completion event from the triggering infrastructure and reports
//! the pipeline outcome back as an HTTP status code plus a short status
//! line.
//!
//! The server is designed for graceful shutdown, listening to a signal
//! from the main application to stop serving requests and terminate
//! cleanly.

use crate::handler::AlertHandler;
use axum::{body::Bytes, extract::State, http::StatusCode, routing::post, Router};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{debug, error, trace};

/// Builds the trigger router. Exposed separately so integration tests can
/// serve it on an ephemeral port.
pub fn router(handler: Arc<AlertHandler>) -> Router {
    Router::new().route("/", post(trigger)).with_state(handler)
}

async fn trigger(
    State(handler): State<Arc<AlertHandler>>,
    body: Bytes,
) -> (StatusCode, String) {
    let outcome = handler.handle_raw(&body).await;
    let status = StatusCode::from_u16(outcome.status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    debug!(status = %status, "{}", outcome.status_text());
    // HTTP forbids a body on 204; the status string goes to the log only.
    if status == StatusCode::NO_CONTENT {
        return (status, String::new());
    }
    (status, outcome.status_text().to_string())
}

/// Runs the server until a shutdown signal is received.
pub async fn run(
    listener: TcpListener,
    handler: Arc<AlertHandler>,
    mut shutdown_rx: watch::Receiver<()>,
) {
    let app = router(handler);

    tokio::select! {
        biased;
        _ = shutdown_rx.changed() => {
            trace!("Trigger server received shutdown signal via select.");
        }
        result = axum::serve(listener, app.into_make_service()) => {
            if let Err(e) = result {
                error!("Trigger server error: {}", e);
            }
        }
    }
    trace!("Trigger server task finished.");
}
