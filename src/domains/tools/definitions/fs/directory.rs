//! Directory creation tool definition.

use std::fs;
use std::sync::Arc;

use rmcp::model::CallToolResult;
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{info, instrument};

use super::super::common::{ToolOutcome, outcome_result, target_path};
use crate::core::config::Config;
use crate::domains::tools::catalog::CatalogEntry;

/// Parameters for the directory create tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DirectoryCreateParams {
    /// The path to the directory to create.
    pub path: String,

    /// Whether to create parent directories if they don't exist.
    #[serde(default = "default_recursive")]
    pub recursive: bool,
}

fn default_recursive() -> bool {
    true
}

/// Directory create tool - makes a new directory.
pub struct DirectoryCreateTool;

impl DirectoryCreateTool {
    /// Handler identifier in the catalog.
    pub const NAME: &'static str = "directory_create";

    #[instrument(skip_all, fields(path = %params.path))]
    pub fn execute(params: &DirectoryCreateParams, config: &Config) -> CallToolResult {
        info!("Directory create tool called: {}", params.path);
        outcome_result(create(params, config))
    }

    pub fn catalog_entry(config: Arc<Config>) -> CatalogEntry {
        CatalogEntry::typed(move |params: DirectoryCreateParams| {
            let config = config.clone();
            async move { Self::execute(&params, &config) }
        })
    }
}

fn create(params: &DirectoryCreateParams, config: &Config) -> ToolOutcome {
    let path = target_path(&params.path, config)?;

    if path.exists() {
        return Err(format!("Error: Directory already exists: {}", params.path));
    }

    let created = if params.recursive {
        fs::create_dir_all(&path)
    } else {
        fs::create_dir(&path)
    };
    created.map_err(|e| format!("Error creating directory: {}", e))?;

    Ok(format!("Successfully created directory: {}", params.path))
}
