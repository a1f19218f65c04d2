//! Copy and move tool definitions.
//!
//! Both operate on single files. The source must exist inside the root and
//! the destination must resolve inside it; missing destination parents are
//! created.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use rmcp::model::CallToolResult;
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{info, instrument};

use super::super::common::{ToolOutcome, existing_path, outcome_result, target_path};
use super::write::create_parent;
use crate::core::config::Config;
use crate::domains::tools::catalog::CatalogEntry;

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters shared by the copy and move tools.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct FileTransferParams {
    /// The path to the source file.
    pub source: String,

    /// The path to the destination file.
    pub destination: String,
}

// ============================================================================
// Tool Definitions
// ============================================================================

/// Copy tool - duplicates a file.
pub struct FileCopyTool;

impl FileCopyTool {
    /// Handler identifier in the catalog.
    pub const NAME: &'static str = "file_copy";

    #[instrument(skip_all, fields(from = %params.source, to = %params.destination))]
    pub fn execute(params: &FileTransferParams, config: &Config) -> CallToolResult {
        info!("Copy tool called: '{}' -> '{}'", params.source, params.destination);
        outcome_result(copy(params, config))
    }

    pub fn catalog_entry(config: Arc<Config>) -> CatalogEntry {
        CatalogEntry::typed(move |params: FileTransferParams| {
            let config = config.clone();
            async move { Self::execute(&params, &config) }
        })
    }
}

fn copy(params: &FileTransferParams, config: &Config) -> ToolOutcome {
    let (source, destination) = resolve_pair(params, config)?;

    create_parent(&destination).map_err(|e| format!("Error copying file: {}", e))?;
    fs::copy(&source, &destination).map_err(|e| format!("Error copying file: {}", e))?;

    Ok(format!(
        "Successfully copied file from {} to {}",
        params.source, params.destination
    ))
}

/// Move tool - renames a file, never replacing an existing destination.
pub struct FileMoveTool;

impl FileMoveTool {
    /// Handler identifier in the catalog.
    pub const NAME: &'static str = "file_move";

    #[instrument(skip_all, fields(from = %params.source, to = %params.destination))]
    pub fn execute(params: &FileTransferParams, config: &Config) -> CallToolResult {
        info!("Move tool called: '{}' -> '{}'", params.source, params.destination);
        outcome_result(move_file(params, config))
    }

    pub fn catalog_entry(config: Arc<Config>) -> CatalogEntry {
        CatalogEntry::typed(move |params: FileTransferParams| {
            let config = config.clone();
            async move { Self::execute(&params, &config) }
        })
    }
}

fn move_file(params: &FileTransferParams, config: &Config) -> ToolOutcome {
    let (source, destination) = resolve_pair(params, config)?;

    if destination.exists() {
        return Err(format!(
            "Error: Destination file already exists: {}",
            params.destination
        ));
    }

    create_parent(&destination).map_err(|e| format!("Error moving file: {}", e))?;
    fs::rename(&source, &destination).map_err(|e| format!("Error moving file: {}", e))?;

    Ok(format!(
        "Successfully moved file from {} to {}",
        params.source, params.destination
    ))
}

/// Resolve and check both ends of a copy or move.
fn resolve_pair(params: &FileTransferParams, config: &Config) -> Result<(PathBuf, PathBuf), String> {
    let source = existing_path(&params.source, config, || {
        format!("Error: Source file does not exist: {}", params.source)
    })?;
    let destination = target_path(&params.destination, config)?;

    if source.is_dir() {
        return Err(format!(
            "Error: Source path is a directory, not a file: {}",
            params.source
        ));
    }
    Ok((source, destination))
}

// ============================================================================
// Tests
// ============================================================================
