//! File reading tools.
//!
//! `read_file` returns one file, bounded by the configured read limit.
//! `read_many_files` concatenates several files into labelled sections; a
//! problem with one path is reported inline and does not stop the others.

use std::fs;
use std::sync::Arc;

use rmcp::model::CallToolResult;
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{info, instrument, warn};

use super::super::common::{ToolOutcome, existing_path, outcome_result};
use crate::core::config::Config;
use crate::core::security::{PathSecurityError, ensure_file_size, truncate_text, validate_path};
use crate::domains::tools::catalog::CatalogEntry;

/// Response length cap for `read_many_files`.
const MAX_RESPONSE_CHARS: usize = 10_000;

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the read file tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ReadFileParams {
    /// The path to the file to read.
    pub path: String,
}

/// Parameters for the read many files tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ReadManyFilesParams {
    /// The file paths to read.
    pub paths: Vec<String>,

    /// Maximum size of each file to read, in KB.
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
}

fn default_max_file_size() -> u64 {
    100
}

// ============================================================================
// Tool Definitions
// ============================================================================

/// Read file tool - returns the contents of a UTF-8 text file.
pub struct ReadFileTool;

impl ReadFileTool {
    /// Handler identifier in the catalog.
    pub const NAME: &'static str = "read_file";

    #[instrument(skip_all, fields(path = %params.path))]
    pub fn execute(params: &ReadFileParams, config: &Config) -> CallToolResult {
        info!("Read file tool called: {}", params.path);
        outcome_result(read_file(params, config))
    }

    pub fn catalog_entry(config: Arc<Config>) -> CatalogEntry {
        CatalogEntry::typed(move |params: ReadFileParams| {
            let config = config.clone();
            async move { Self::execute(&params, &config) }
        })
    }
}

fn read_file(params: &ReadFileParams, config: &Config) -> ToolOutcome {
    let path = existing_path(&params.path, config, || {
        format!("Error: File does not exist: {}", params.path)
    })?;

    let metadata =
        fs::metadata(&path).map_err(|e| format!("Error reading file: {}", e))?;
    if metadata.is_dir() {
        return Err(format!("Error: Path is a directory, not a file: {}", params.path));
    }
    ensure_file_size(metadata.len(), config.limits.max_read_bytes)
        .map_err(|e| format!("Error: {}", e))?;

    fs::read_to_string(&path).map_err(|e| format!("Error reading file: {}", e))
}

/// Read many files tool - concatenates several files into one response.
pub struct ReadManyFilesTool;

impl ReadManyFilesTool {
    /// Handler identifier in the catalog.
    pub const NAME: &'static str = "read_many_files";

    #[instrument(skip_all, fields(count = params.paths.len()))]
    pub fn execute(params: &ReadManyFilesParams, config: &Config) -> CallToolResult {
        info!("Read many files tool called for {} paths", params.paths.len());

        let max_bytes = params.max_file_size.saturating_mul(1024);
        let mut response = String::new();
        for path in &params.paths {
            response.push_str(&read_section(path, max_bytes, config));
        }

        outcome_result(Ok(truncate_text(
            &response,
            MAX_RESPONSE_CHARS,
            "\n\n... (response truncated)",
        )))
    }

    pub fn catalog_entry(config: Arc<Config>) -> CatalogEntry {
        CatalogEntry::typed(move |params: ReadManyFilesParams| {
            let config = config.clone();
            async move { Self::execute(&params, &config) }
        })
    }
}

/// One labelled section of the `read_many_files` response.
fn read_section(input: &str, max_bytes: u64, config: &Config) -> String {
    let path = match validate_path(input, config) {
        Ok(path) => path,
        Err(PathSecurityError::PathNotFound { .. }) => {
            return format!("--- File not found: {} ---\n\n", input);
        }
        Err(e) => {
            warn!("Rejected path {}: {}", input, e);
            return format!("--- Path not allowed: {} ({}) ---\n\n", input, e);
        }
    };

    let metadata = match fs::metadata(&path) {
        Ok(metadata) => metadata,
        Err(e) => return format!("--- Error reading file: {} - {} ---\n\n", input, e),
    };
    if metadata.is_dir() {
        return format!("--- Path is a directory: {} ---\n\n", input);
    }
    if let Err(e) = ensure_file_size(metadata.len(), max_bytes) {
        return format!("--- {} ({}) ---\n\n", e, input);
    }

    match fs::read_to_string(&path) {
        Ok(content) => format!("--- {input} ---\n{content}\n--- End of {input} ---\n\n"),
        Err(e) => format!("--- Error reading file: {} - {} ---\n\n", input, e),
    }
}

// ============================================================================
// Tests
// ============================================================================
