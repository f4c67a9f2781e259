//! phone-recon - Main entry point
//!
//! Serves screenshot phone extraction and CRM roster reconciliation over the
//! Model Context Protocol (MCP) on stdio.

use anyhow::Result;
use phone_recon::ocr::{OcrEngine, TesseractOcr};
use phone_recon::repositories::{
    ExtractedNumberRepository, InMemoryExtractedNumberRepository, InMemoryMatchRepository,
    InMemoryRosterRepository, MatchRepository, RosterRepository,
};
use phone_recon::services::{ReconciliationService, ReconciliationServiceImpl};
use phone_recon::{Config, MetricsTracker, PhoneReconServer};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    let config = Config::from_env();

    // Initialize logging (stderr only to avoid polluting stdout/MCP communication)
    let log_level = match &config {
        Ok(cfg) => cfg.log_level.clone(),
        Err(_) => Config::default().log_level,
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = match config {
        Ok(cfg) => {
            info!(log_level = %cfg.log_level, "Configuration loaded successfully");
            cfg
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    info!(
        tesseract = %config.tesseract_path.display(),
        ocr_timeout_secs = config.ocr_timeout_secs,
        max_concurrent_ocr = config.max_concurrent_ocr,
        "Starting phone-recon MCP server"
    );

    let ocr = Arc::new(TesseractOcr::new(
        config.tesseract_path.clone(),
        config.ocr_timeout(),
    )) as Arc<dyn OcrEngine>;

    // Initialize repositories
    let extracted_repo =
        Arc::new(InMemoryExtractedNumberRepository::new()) as Arc<dyn ExtractedNumberRepository>;
    let roster_repo = Arc::new(InMemoryRosterRepository::new()) as Arc<dyn RosterRepository>;
    let match_repo = Arc::new(InMemoryMatchRepository::new()) as Arc<dyn MatchRepository>;

    let metrics = MetricsTracker::new();
    let service = Arc::new(
        ReconciliationServiceImpl::new(ocr, extracted_repo, roster_repo, match_repo)
            .with_metrics(metrics.clone())
            .with_max_concurrent_ocr(config.max_concurrent_ocr),
    ) as Arc<dyn ReconciliationService>;

    let server = PhoneReconServer::new(service, config.default_source);

    // Run the server (this will block until the server exits)
    info!("Starting MCP server with stdio transport");
    phone_recon::server::run_server(server).await?;

    info!("{}", metrics.summary());
    info!("phone-recon shutdown complete");
    Ok(())
}
