//! Flagwatch - data-quality anomaly alert notifier
//!
//! A small service that reacts to data-quality job completion events:
//! it reads the freshly produced flagged-report table and, when the table
//! has rows, delivers a formatted alert to a chat webhook.

use anyhow::{bail, Result};
use clap::Parser;
use flagwatch::{
    bigquery::BigQueryClient,
    cli::Cli,
    config::Config,
    formatting::ChatTextFormatter,
    handler::AlertHandler,
    notification::chat::ChatClient,
    server,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration by layering sources: defaults, file, environment, and CLI args.
    let config = Config::load(&cli).unwrap_or_else(|err| {
        eprintln!("Failed to load configuration: {err}");
        // Exit if configuration fails, as it's a critical step.
        std::process::exit(1);
    });

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    info!("Flagwatch starting up...");

    // Log the loaded configuration settings for visibility
    info!("-------------------- Configuration --------------------");
    info!("Log Level: {}", config.log_level);
    info!("Listen Address: {}", config.server.bind_addr);
    info!("BigQuery Base URL: {}", config.bigquery.base_url);
    info!(
        "BigQuery Auth Token: {}",
        if config.bigquery.auth_token.is_some() {
            "Configured"
        } else {
            "Not configured"
        }
    );
    // The webhook URL is a credential; log only its presence.
    info!(
        "Chat Webhook: {}",
        if config.chat.webhook_url.is_empty() {
            "Not configured"
        } else {
            "Configured"
        }
    );
    info!("-------------------------------------------------------");

    if config.chat.webhook_url.is_empty() {
        bail!("chat.webhook_url must be configured");
    }

    // =========================================================================
    // 1. Instantiate Services
    // =========================================================================
    let store = Arc::new(BigQueryClient::new(
        config.bigquery.base_url.clone(),
        config.bigquery.auth_token.clone(),
    ));
    let notifier = Arc::new(ChatClient::new(config.chat.webhook_url.clone()));
    let handler = Arc::new(AlertHandler::new(
        store,
        notifier,
        Box::new(ChatTextFormatter),
    ));

    // =========================================================================
    // 2. Start the Trigger Server
    // =========================================================================
    let (shutdown_tx, shutdown_rx) = watch::channel(());
    let listener = TcpListener::bind(&config.server.bind_addr).await?;
    info!("Listening for trigger events on {}", config.server.bind_addr);

    let server_task = tokio::spawn(server::run(listener, handler, shutdown_rx));

    // Wait for shutdown signal
    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received. Shutting down gracefully...");

    shutdown_tx.send(()).expect("Failed to send shutdown signal");

    if let Err(e) = server_task.await {
        error!("Trigger server task panicked: {:?}", e);
    }

    info!("All tasks shut down. Exiting.");

    Ok(())
}
