//! Web fetch tool definition.

use std::time::Duration;

use rmcp::model::CallToolResult;
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{debug, info, instrument};

use super::super::common::{ToolOutcome, outcome_result};
use crate::domains::tools::catalog::CatalogEntry;

/// Appended when the body was cut at the size cap.
const TRUNCATION_MARKER: &str = "\n\n... (content truncated)";

/// Per-request timeout.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Parameters for the web fetch tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct WebFetchParams {
    /// The URL to fetch content from.
    pub url: String,

    /// Maximum content size to fetch, in KB.
    #[serde(default = "default_max_content_size")]
    pub max_content_size: u64,
}

fn default_max_content_size() -> u64 {
    500
}

/// Web fetch tool - downloads a URL as text.
pub struct WebFetchTool;

impl WebFetchTool {
    /// Handler identifier in the catalog.
    pub const NAME: &'static str = "web_fetch";

    #[instrument(skip_all, fields(url = %params.url))]
    pub async fn execute(params: &WebFetchParams) -> CallToolResult {
        info!("Web fetch tool called: {}", params.url);
        outcome_result(fetch(params).await)
    }

    pub fn catalog_entry() -> CatalogEntry {
        CatalogEntry::typed(|params: WebFetchParams| async move { Self::execute(&params).await })
    }
}

async fn fetch(params: &WebFetchParams) -> ToolOutcome {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| format!("Error: Failed to create HTTP client: {}", e))?;

    let mut response = client.get(&params.url).send().await.map_err(|e| {
        if e.is_timeout() {
            "Error fetching URL: Request timed out".to_string()
        } else if e.is_connect() {
            format!("Error fetching URL: Connection failed ({})", e)
        } else {
            format!("Error fetching URL: {}", e)
        }
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(format!(
            "Error: Failed to fetch URL. Status: {}",
            status
        ));
    }

    if let Some(length) = response.content_length() {
        let size_kb = length as f64 / 1024.0;
        if size_kb > params.max_content_size as f64 {
            return Err(format!(
                "Error: Content is too large to fetch ({:.2}KB). Maximum allowed size is {}KB.",
                size_kb, params.max_content_size
            ));
        }
    }

    // Content-Length is optional, so the cap is enforced while reading
    let limit = usize::try_from(params.max_content_size.saturating_mul(1024)).unwrap_or(usize::MAX);
    let mut body = Vec::new();
    let mut truncated = false;
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| format!("Error fetching URL: {}", e))?
    {
        let room = limit - body.len();
        if chunk.len() > room {
            body.extend_from_slice(&chunk[..room]);
            truncated = true;
            break;
        }
        body.extend_from_slice(&chunk);
    }
    debug!("Fetched {} bytes from {}", body.len(), params.url);

    let mut text = String::from_utf8_lossy(&body).into_owned();
    if truncated {
        text.push_str(TRUNCATION_MARKER);
    }
    Ok(format!("Content from {}:\n\n{}", params.url, text))
}
