//! File glob tool definition.
//!
//! Patterns are matched against paths relative to the root directory
//! (`*` never crosses a `/`; use `**` for that).

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use globset::{GlobBuilder, GlobMatcher};
use ignore::WalkBuilder;
use rmcp::model::CallToolResult;
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{info, instrument};

use super::super::common::{ToolOutcome, outcome_result};
use super::display_relative;
use crate::core::config::Config;
use crate::domains::tools::catalog::CatalogEntry;

/// Matches listed in the response.
const MAX_RESULTS: usize = 100;

/// Parameters for the file glob tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct FileGlobParams {
    /// The glob pattern to match files against (e.g. `**/*.rs`, `*.toml`).
    pub pattern: String,
}

/// File glob tool - finds files whose relative path matches a glob.
pub struct FileGlobTool;

impl FileGlobTool {
    /// Handler identifier in the catalog.
    pub const NAME: &'static str = "file_glob";

    #[instrument(skip_all, fields(pattern = %params.pattern))]
    pub fn execute(params: &FileGlobParams, config: &Config) -> CallToolResult {
        info!("File glob tool called: {}", params.pattern);
        outcome_result(glob(params, config))
    }

    pub fn catalog_entry(config: Arc<Config>) -> CatalogEntry {
        CatalogEntry::typed(move |params: FileGlobParams| {
            let config = config.clone();
            async move { Self::execute(&params, &config) }
        })
    }
}

fn glob(params: &FileGlobParams, config: &Config) -> ToolOutcome {
    let pattern = Path::new(&params.pattern);
    if pattern.is_absolute() || pattern.components().any(|c| c == Component::ParentDir) {
        return Err(format!(
            "Error: Path traversal is not allowed ({})",
            params.pattern
        ));
    }

    let matcher = build_matcher(&params.pattern)
        .map_err(|e| format!("Error finding files with glob pattern: {}", e))?;
    let root = search_root(config)
        .map_err(|e| format!("Error finding files with glob pattern: {}", e))?;

    let walker = WalkBuilder::new(&root)
        .standard_filters(false)
        .hidden(true)
        .build();

    let mut files: Vec<String> = walker
        .flatten()
        .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_file()))
        .map(|entry| display_relative(entry.path(), &root))
        .filter(|relative| matcher.is_match(relative))
        .collect();
    files.sort();

    if files.is_empty() {
        return Ok(format!(
            "No files found matching pattern: {}",
            params.pattern
        ));
    }

    let mut response = format!(
        "Found {} file(s) matching pattern \"{}\":\n{}",
        files.len(),
        params.pattern,
        files[..files.len().min(MAX_RESULTS)].join("\n")
    );
    if files.len() > MAX_RESULTS {
        response.push_str(&format!(
            "\n\n... and {} more files",
            files.len() - MAX_RESULTS
        ));
    }
    Ok(response)
}

fn build_matcher(pattern: &str) -> Result<GlobMatcher, globset::Error> {
    let pattern = pattern.strip_prefix("./").unwrap_or(pattern);
    Ok(GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()?
        .compile_matcher())
}

/// The configured root, or the working directory when unrestricted.
fn search_root(config: &Config) -> std::io::Result<PathBuf> {
    match config.security.root_path {
        Some(ref root) => root.canonicalize(),
        None => std::env::current_dir(),
    }
}
