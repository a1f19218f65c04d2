//! File permissions tool definition.

use std::sync::Arc;

use rmcp::model::CallToolResult;
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{info, instrument};

use super::super::common::{ToolOutcome, existing_path, outcome_result};
use crate::core::config::Config;
use crate::domains::tools::catalog::CatalogEntry;

/// Parameters for the file permissions tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct FilePermissionsParams {
    /// The path to the file.
    pub path: String,

    /// The new permissions in octal format (e.g. "755", "644").
    pub permissions: String,
}

/// File permissions tool - changes the mode bits of a file (Unix only).
pub struct FilePermissionsTool;

impl FilePermissionsTool {
    /// Handler identifier in the catalog.
    pub const NAME: &'static str = "file_permissions";

    #[instrument(skip_all, fields(path = %params.path, mode = %params.permissions))]
    pub fn execute(params: &FilePermissionsParams, config: &Config) -> CallToolResult {
        info!("Permissions tool called: {} -> {}", params.path, params.permissions);
        outcome_result(change_permissions(params, config))
    }

    pub fn catalog_entry(config: Arc<Config>) -> CatalogEntry {
        CatalogEntry::typed(move |params: FilePermissionsParams| {
            let config = config.clone();
            async move { Self::execute(&params, &config) }
        })
    }
}

/// Parse a three or four digit octal mode string such as `"644"`.
fn parse_mode(permissions: &str) -> Option<u32> {
    let digits_ok = (3..=4).contains(&permissions.len())
        && permissions.bytes().all(|b| (b'0'..=b'7').contains(&b));
    if !digits_ok {
        return None;
    }
    u32::from_str_radix(permissions, 8).ok()
}

fn change_permissions(params: &FilePermissionsParams, config: &Config) -> ToolOutcome {
    let path = existing_path(&params.path, config, || {
        format!("Error: File does not exist: {}", params.path)
    })?;

    let mode = parse_mode(&params.permissions).ok_or_else(|| {
        "Error: Invalid permissions format. Use octal format like '755' or '644'.".to_string()
    })?;

    set_mode(&path, mode).map_err(|e| format!("Error changing permissions: {}", e))?;

    Ok(format!(
        "Successfully changed permissions of {} to {}",
        params.path, params.permissions
    ))
}

#[cfg(unix)]
fn set_mode(path: &std::path::Path, mode: u32) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn set_mode(_path: &std::path::Path, _mode: u32) -> std::io::Result<()> {
    Err(std::io::Error::new(
        std::io::ErrorKind::Unsupported,
        "octal permissions are only supported on Unix",
    ))
}
