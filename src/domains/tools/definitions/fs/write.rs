//! File writing tools.
//!
//! `file_write` refuses to clobber an existing file unless asked to;
//! `write_file` always overwrites. Both stay inside the configured root.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use rmcp::model::CallToolResult;
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{info, instrument};

use super::super::common::{ToolOutcome, outcome_result, target_path};
use crate::core::config::Config;
use crate::domains::tools::catalog::CatalogEntry;

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the `file_write` tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct FileWriteParams {
    /// The path to the file to write.
    pub path: String,

    /// The content to write to the file.
    pub content: String,

    /// Whether to overwrite an existing file.
    #[serde(default)]
    pub overwrite: bool,
}

/// Parameters for the `write_file` tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct WriteFileParams {
    /// The path to the file to write.
    pub file_path: String,

    /// The content to write to the file.
    pub content: String,

    /// Whether to create parent directories if they don't exist.
    #[serde(default = "default_true")]
    pub create_directories: bool,
}

fn default_true() -> bool {
    true
}

// ============================================================================
// Tool Definitions
// ============================================================================

/// Safe write tool - creates a file, never replacing one unless told to.
pub struct FileWriteTool;

impl FileWriteTool {
    /// Handler identifier in the catalog.
    pub const NAME: &'static str = "file_write";

    #[instrument(skip_all, fields(path = %params.path, overwrite = params.overwrite))]
    pub fn execute(params: &FileWriteParams, config: &Config) -> CallToolResult {
        info!("File write tool called: {}", params.path);
        outcome_result(file_write(params, config))
    }

    pub fn catalog_entry(config: Arc<Config>) -> CatalogEntry {
        CatalogEntry::typed(move |params: FileWriteParams| {
            let config = config.clone();
            async move { Self::execute(&params, &config) }
        })
    }
}

fn file_write(params: &FileWriteParams, config: &Config) -> ToolOutcome {
    let path = target_path(&params.path, config)?;

    if path.exists() && !params.overwrite {
        return Err(format!(
            "Error: File already exists at {}. Use overwrite=true to overwrite.",
            params.path
        ));
    }

    create_parent(&path).map_err(|e| format!("Error writing file: {}", e))?;
    fs::write(&path, &params.content).map_err(|e| format!("Error writing file: {}", e))?;

    Ok(format!(
        "Successfully wrote {} characters to {}",
        params.content.chars().count(),
        params.path
    ))
}

/// Write tool - creates or overwrites a file.
pub struct WriteFileTool;

impl WriteFileTool {
    /// Handler identifier in the catalog.
    pub const NAME: &'static str = "write_file";

    #[instrument(skip_all, fields(path = %params.file_path))]
    pub fn execute(params: &WriteFileParams, config: &Config) -> CallToolResult {
        info!("Write file tool called: {}", params.file_path);
        outcome_result(write_file(params, config))
    }

    pub fn catalog_entry(config: Arc<Config>) -> CatalogEntry {
        CatalogEntry::typed(move |params: WriteFileParams| {
            let config = config.clone();
            async move { Self::execute(&params, &config) }
        })
    }
}

fn write_file(params: &WriteFileParams, config: &Config) -> ToolOutcome {
    let path = target_path(&params.file_path, config)?;

    if path.is_dir() {
        return Err(format!(
            "Error: Path is a directory, not a file: {}",
            params.file_path
        ));
    }
    if params.create_directories {
        create_parent(&path).map_err(|e| format!("Error writing file: {}", e))?;
    }
    fs::write(&path, &params.content).map_err(|e| format!("Error writing file: {}", e))?;

    Ok(format!(
        "Successfully wrote {} characters to {}",
        params.content.chars().count(),
        params.file_path
    ))
}

/// Create the parent directory of `path` if it is missing.
pub(super) fn create_parent(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.exists() => {
            fs::create_dir_all(parent)
        }
        _ => Ok(()),
    }
}

// ============================================================================
// Tests
// ============================================================================
