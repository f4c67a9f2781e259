//! MCP server for phone extraction and roster reconciliation.
//!
//! This module exposes the reconciliation service to AI assistants through
//! the Model Context Protocol.

pub mod handlers;

pub use handlers::PhoneReconServer;

use anyhow::Result;
use rmcp::transport::io::stdio;
use rmcp::ServiceExt;

/// Run the server with stdio transport until the client disconnects.
pub async fn run_server(server: PhoneReconServer) -> Result<()> {
    // Serve the server with stdio transport
    let service = server.serve(stdio()).await?;

    // Wait for completion
    service.waiting().await?;

    Ok(())
}
