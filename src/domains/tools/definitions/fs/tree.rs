//! Directory tree tool definition.

use std::path::Path;
use std::sync::Arc;

use rmcp::model::CallToolResult;
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{info, instrument};

use super::super::common::{ToolOutcome, existing_directory, outcome_result};
use super::list_dir::{default_directory, sorted_entries};
use crate::core::config::Config;
use crate::domains::tools::catalog::CatalogEntry;

/// Parameters for the directory tree tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DirectoryTreeParams {
    /// The directory to draw.
    #[serde(default = "default_directory")]
    pub directory: String,

    /// Maximum depth to traverse.
    #[serde(default = "default_max_depth", rename = "maxDepth")]
    pub max_depth: usize,

    /// Whether to show hidden files and directories.
    #[serde(default, rename = "showHidden")]
    pub show_hidden: bool,
}

fn default_max_depth() -> usize {
    3
}

/// Directory tree tool - draws a directory as an indented tree.
pub struct DirectoryTreeTool;

impl DirectoryTreeTool {
    /// Handler identifier in the catalog.
    pub const NAME: &'static str = "directory_tree";

    #[instrument(skip_all, fields(path = %params.directory, depth = params.max_depth))]
    pub fn execute(params: &DirectoryTreeParams, config: &Config) -> CallToolResult {
        info!("Directory tree tool called for path: {}", params.directory);
        outcome_result(tree(params, config))
    }

    pub fn catalog_entry(config: Arc<Config>) -> CatalogEntry {
        CatalogEntry::typed(move |params: DirectoryTreeParams| {
            let config = config.clone();
            async move { Self::execute(&params, &config) }
        })
    }
}

fn tree(params: &DirectoryTreeParams, config: &Config) -> ToolOutcome {
    let dir = existing_directory(&params.directory, config)?;

    let mut diagram = String::new();
    draw(&dir, "", 0, params, &mut diagram)
        .map_err(|e| format!("Error generating directory tree: {}", e))?;

    Ok(format!(
        "Directory tree for {}:\n\n{}",
        params.directory, diagram
    ))
}

fn draw(
    dir: &Path,
    prefix: &str,
    depth: usize,
    params: &DirectoryTreeParams,
    out: &mut String,
) -> std::io::Result<()> {
    if depth >= params.max_depth {
        return Ok(());
    }

    let entries = sorted_entries(dir, params.show_hidden)?;
    let count = entries.len();
    for (index, (name, metadata)) in entries.into_iter().enumerate() {
        let last = index + 1 == count;
        let connector = if last { "└── " } else { "├── " };
        let suffix = if metadata.is_dir() { "/" } else { "" };
        out.push_str(&format!("{prefix}{connector}{name}{suffix}\n"));

        if metadata.is_dir() {
            let child_prefix = format!("{}{}", prefix, if last { "    " } else { "│   " });
            draw(&dir.join(&name), &child_prefix, depth + 1, params, out)?;
        }
    }
    Ok(())
}
