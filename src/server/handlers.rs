//! MCP tool handlers for the phone reconciliation server.
//!
//! This module implements all the MCP tools using the rmcp SDK's tool_router pattern.

use crate::domain::SourceHint;
use crate::error::{ServiceError, StoreError};
use crate::models::MatchFilter;
use crate::roster::{ColumnMapping, DEFAULT_PREVIEW_ROWS};
use crate::services::{ReconciliationService, ScreenshotRequest};
use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::*;
use rmcp::{tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// The MCP server exposing extraction, roster import and comparison tools.
#[derive(Clone)]
pub struct PhoneReconServer {
    service: Arc<dyn ReconciliationService>,
    default_source: SourceHint,
    tool_router: ToolRouter<Self>,
}

// Implement ServerHandler using the tool_handler macro
#[tool_handler]
impl ServerHandler for PhoneReconServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities {
                tools: Some(Default::default()),
                ..Default::default()
            },
            server_info: Implementation {
                name: "phone-recon".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                icons: None,
                title: None,
                website_url: None,
            },
            instructions: Some("Extracts phone numbers from chat screenshots and OCR text, imports CRM roster CSV exports, and reconciles extracted numbers against the roster.".into()),
        }
    }
}

// Helper structs for tool parameters
#[derive(Debug, Deserialize, JsonSchema)]
struct ExtractTextParams {
    /// Recognized text to scan
    text: String,
    /// whatsapp, sms, call_log; defaults to the server's configured source
    #[serde(default)]
    source: Option<String>,
    /// Store the numbers for later comparison
    #[serde(default)]
    store: Option<bool>,
    /// Screenshot the text came from; its earlier numbers are replaced
    #[serde(default)]
    screenshot_id: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct ExtractScreenshotParams {
    /// Image files to recognize
    image_paths: Vec<String>,
    #[serde(default)]
    source: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct PhoneParams {
    phone: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct PreviewRosterParams {
    path: String,
    #[serde(default)]
    rows: Option<usize>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct ImportRosterParams {
    path: String,
    /// Column mapping; detected from the headers when omitted
    #[serde(default)]
    mapping: Option<ColumnMapping>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct ComparisonResultsParams {
    /// all, exact, partial, new, existing
    #[serde(default)]
    filter: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct ScreenshotNumbersParams {
    /// Screenshot id, the image path for screenshots run through OCR
    screenshot_id: String,
}

#[derive(Debug, Serialize)]
struct NormalizedResponse<'a> {
    raw: &'a str,
    normalized: String,
}

// Helper function to convert errors to MCP errors
fn to_mcp_error(e: impl std::fmt::Display) -> McpError {
    McpError {
        code: ErrorCode::INTERNAL_ERROR,
        message: Cow::from(e.to_string()),
        data: None,
    }
}

fn invalid_params(message: impl Into<String>) -> McpError {
    McpError {
        code: ErrorCode::INVALID_PARAMS,
        message: Cow::from(message.into()),
        data: None,
    }
}

fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json_response = serde_json::to_string_pretty(value).map_err(to_mcp_error)?;
    Ok(CallToolResult::success(vec![Content::text(json_response)]))
}

// Tool router implementation
#[tool_router]
impl PhoneReconServer {
    /// Create a new server over a reconciliation service.
    pub fn new(service: Arc<dyn ReconciliationService>, default_source: SourceHint) -> Self {
        Self {
            service,
            default_source,
            tool_router: Self::tool_router(),
        }
    }

    fn source(&self, label: Option<&str>) -> SourceHint {
        label
            .map(SourceHint::from_label)
            .unwrap_or(self.default_source)
    }

    /// Extract phone numbers from recognized text.
    #[tool(
        description = "Extract phone numbers from OCR or chat text. Returns each candidate parsed to E.164 with country and validity. Set store=true to keep the numbers for comparison against the roster."
    )]
    async fn extract_phone_numbers(
        &self,
        params: Parameters<ExtractTextParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;
        let source = self.source(params.source.as_deref());

        tracing::debug!(
            text_len = params.text.len(),
            source = %source,
            store = ?params.store,
            "MCP Handler: extract_phone_numbers called"
        );

        if params.store.unwrap_or(false) || params.screenshot_id.is_some() {
            let outcome = self
                .service
                .extract_text(&params.text, source, params.screenshot_id)
                .await
                .map_err(to_mcp_error)?;
            return json_result(&outcome);
        }

        let numbers = self.service.extract_numbers(&params.text, source);
        json_result(&serde_json::json!({
            "source": source,
            "count": numbers.len(),
            "numbers": numbers,
        }))
    }

    /// Run OCR on screenshots and store the numbers found.
    #[tool(
        description = "Run OCR on one or more screenshot image files, extract phone numbers, and store them per screenshot. Re-processing a screenshot replaces its earlier numbers. Failures are reported per file."
    )]
    async fn extract_from_screenshot(
        &self,
        params: Parameters<ExtractScreenshotParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;
        if params.image_paths.is_empty() {
            return Err(invalid_params("image_paths cannot be empty"));
        }

        let source = self.source(params.source.as_deref());
        let requests = params
            .image_paths
            .iter()
            .map(|path| ScreenshotRequest::for_path(PathBuf::from(path), source))
            .collect();

        tracing::info!(
            screenshots = params.image_paths.len(),
            "MCP Handler: extract_from_screenshot called"
        );

        let batch = self.service.process_batch(requests).await;
        json_result(&batch)
    }

    /// Parse a single phone number.
    #[tool(
        description = "Parse one phone number string into E.164 with country code, country name, number type and validity"
    )]
    async fn parse_phone_number(
        &self,
        params: Parameters<PhoneParams>,
    ) -> Result<CallToolResult, McpError> {
        let parsed = self.service.parse_number(&params.0.phone);
        json_result(&parsed)
    }

    /// Normalize a phone number to its comparison key.
    #[tool(
        description = "Normalize a phone number to the key used for roster comparison (E.164 when parseable, digits otherwise)"
    )]
    async fn normalize_phone_number(
        &self,
        params: Parameters<PhoneParams>,
    ) -> Result<CallToolResult, McpError> {
        let raw = params.0.phone;
        let normalized = self.service.normalize_number(&raw);
        json_result(&NormalizedResponse {
            raw: &raw,
            normalized,
        })
    }

    /// Preview a roster CSV export.
    #[tool(
        description = "Preview a CRM CSV export: column headers, the first rows, and a suggested column mapping for import"
    )]
    async fn preview_roster_csv(
        &self,
        params: Parameters<PreviewRosterParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;
        let preview = self
            .service
            .preview_roster(
                Path::new(&params.path),
                params.rows.unwrap_or(DEFAULT_PREVIEW_ROWS),
            )
            .await
            .map_err(to_mcp_error)?;

        json_result(&preview)
    }

    /// Import a roster CSV export.
    #[tool(
        description = "Import contacts from a CRM CSV export into the roster. Numbers are normalized; blank, invalid and duplicate rows are skipped and counted."
    )]
    async fn import_roster_csv(
        &self,
        params: Parameters<ImportRosterParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;

        tracing::info!(path = %params.path, "MCP Handler: import_roster_csv called");

        let stats = self
            .service
            .import_roster(Path::new(&params.path), params.mapping)
            .await
            .map_err(|e| {
                tracing::error!("Roster import failed: {}", e);
                to_mcp_error(e)
            })?;

        json_result(&stats)
    }

    /// Compare stored numbers against the roster.
    #[tool(
        description = "Compare all stored extracted numbers against the roster, replacing previous results. Exact key matches score 1.0, last-10-digit matches 0.8, others are new (0.0)."
    )]
    async fn run_comparison(&self) -> Result<CallToolResult, McpError> {
        let summary = self.service.run_comparison().await.map_err(to_mcp_error)?;
        json_result(&summary)
    }

    /// List stored comparison results.
    #[tool(
        description = "List comparison results, optionally filtered: all, exact, partial, new (not in roster) or existing (exact or partial)"
    )]
    async fn get_comparison_results(
        &self,
        params: Parameters<ComparisonResultsParams>,
    ) -> Result<CallToolResult, McpError> {
        let filter = match params.0.filter.as_deref() {
            Some(label) => label.parse::<MatchFilter>().map_err(invalid_params)?,
            None => MatchFilter::All,
        };

        let results = self
            .service
            .comparison_results(filter)
            .await
            .map_err(to_mcp_error)?;

        json_result(&serde_json::json!({
            "filter": filter,
            "count": results.len(),
            "results": results,
        }))
    }

    /// Aggregate reconciliation statistics.
    #[tool(
        description = "Totals of extracted and roster numbers, match counts by type, numbers not yet compared, and the match rate percentage"
    )]
    async fn get_comparison_stats(&self) -> Result<CallToolResult, McpError> {
        let stats = self.service.stats().await.map_err(to_mcp_error)?;
        json_result(&stats)
    }

    /// Statistics over extracted numbers.
    #[tool(
        description = "Counts of stored extracted numbers: total, valid, invalid, the top 10 countries, and counts by number type"
    )]
    async fn get_number_stats(&self) -> Result<CallToolResult, McpError> {
        let stats = self.service.number_stats().await.map_err(to_mcp_error)?;
        json_result(&stats)
    }

    /// Extracted numbers grouped by country.
    #[tool(
        description = "Stored extracted numbers grouped by country calling code, largest group first (up to 100 numbers listed per country)"
    )]
    async fn get_numbers_by_country(&self) -> Result<CallToolResult, McpError> {
        let groups = self
            .service
            .numbers_by_country()
            .await
            .map_err(to_mcp_error)?;
        json_result(&groups)
    }

    /// Numbers stored more than once.
    #[tool(
        description = "Find normalized phone numbers extracted more than once, e.g. the same contact seen in several screenshots, with every instance"
    )]
    async fn find_duplicate_numbers(&self) -> Result<CallToolResult, McpError> {
        let duplicates = self.service.find_duplicates().await.map_err(to_mcp_error)?;

        json_result(&serde_json::json!({
            "count": duplicates.len(),
            "duplicates": duplicates,
        }))
    }

    /// Numbers stored for one screenshot.
    #[tool(
        description = "List the numbers currently stored for one screenshot. Fails if the screenshot was never processed."
    )]
    async fn get_screenshot_numbers(
        &self,
        params: Parameters<ScreenshotNumbersParams>,
    ) -> Result<CallToolResult, McpError> {
        let screenshot_id = params.0.screenshot_id;
        let numbers = self
            .service
            .screenshot_numbers(&screenshot_id)
            .await
            .map_err(|e| {
                if matches!(e, ServiceError::Store(StoreError::NotFound(_))) {
                    invalid_params(e.to_string())
                } else {
                    to_mcp_error(e)
                }
            })?;

        json_result(&serde_json::json!({
            "screenshot_id": screenshot_id,
            "count": numbers.len(),
            "numbers": numbers,
        }))
    }
}
