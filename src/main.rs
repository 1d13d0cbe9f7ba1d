use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use mail_ingest::classify::Classifier;
use mail_ingest::config::Config;
use mail_ingest::gmail::GmailClient;
use mail_ingest::http::{AppState, api_routes};
use mail_ingest::ingest::IngestService;
use mail_ingest::store;
use mail_ingest::token::StaticTokenSource;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = Config::from_env().context("failed to load configuration")?;

    let token_source = Arc::new(StaticTokenSource::new(config.access_token.clone()));
    let gmail = Arc::new(GmailClient::new(token_source, Classifier::default()));

    let shared = store::load_aws_config(&config).await;
    let headers = Arc::new(store::header_store(&shared, &config));
    let blobs = Arc::new(store::blob_store(&shared, &config));

    let ingest = Arc::new(IngestService::new(gmail, headers, blobs));
    let app = api_routes(AppState { ingest });

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!(addr = %addr, "mail-ingest listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    info!("Shutdown signal received");
}
