//! Delete tool definition.
//!
//! A tool that deletes a single file. Directories are refused.

use std::fs;
use std::io;
use std::sync::Arc;

use rmcp::model::CallToolResult;
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{info, instrument};

use super::super::common::{ToolOutcome, existing_path, outcome_result};
use crate::core::config::Config;
use crate::domains::tools::catalog::CatalogEntry;

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the delete tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct FileDeleteParams {
    /// The path to the file to delete.
    pub path: String,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Delete tool - removes a file.
pub struct FileDeleteTool;

impl FileDeleteTool {
    /// Handler identifier in the catalog.
    pub const NAME: &'static str = "file_delete";

    #[instrument(skip_all, fields(path = %params.path))]
    pub fn execute(params: &FileDeleteParams, config: &Config) -> CallToolResult {
        info!("Delete tool called: '{}'", params.path);
        outcome_result(delete(params, config))
    }

    pub fn catalog_entry(config: Arc<Config>) -> CatalogEntry {
        CatalogEntry::typed(move |params: FileDeleteParams| {
            let config = config.clone();
            async move { Self::execute(&params, &config) }
        })
    }
}

fn delete(params: &FileDeleteParams, config: &Config) -> ToolOutcome {
    let target = existing_path(&params.path, config, || {
        format!("Error: File does not exist: {}", params.path)
    })?;

    if target.is_dir() {
        return Err(format!(
            "Error: Path is a directory, not a file: {}",
            params.path
        ));
    }

    fs::remove_file(&target).map_err(|e| match e.kind() {
        io::ErrorKind::PermissionDenied => {
            format!("Error: Permission denied: Cannot delete '{}'", params.path)
        }
        _ => format!("Error deleting file: {}", e),
    })?;

    info!("Successfully deleted '{}'", params.path);
    Ok(format!("Successfully deleted file: {}", params.path))
}

// ============================================================================
// Tests
// ============================================================================
