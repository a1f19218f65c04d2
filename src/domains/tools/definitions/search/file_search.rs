//! File search tool definition.
//!
//! Substring search over file names, and optionally over file contents.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use ignore::{DirEntry, WalkBuilder};
use rmcp::model::CallToolResult;
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{debug, info, instrument};

use super::super::common::{ToolOutcome, existing_directory, outcome_result};
use super::display_relative;
use crate::core::config::Config;
use crate::domains::tools::catalog::CatalogEntry;

/// Parameters for the file search tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct FileSearchParams {
    /// The text to look for in file names (or contents).
    pub pattern: String,

    /// The directory to search in.
    #[serde(default = "default_directory")]
    pub directory: String,

    /// Whether to also search file contents.
    #[serde(default, rename = "searchInContent")]
    pub search_in_content: bool,
}

fn default_directory() -> String {
    ".".to_string()
}

/// File search tool - finds files by name or content.
pub struct FileSearchTool;

impl FileSearchTool {
    /// Handler identifier in the catalog.
    pub const NAME: &'static str = "file_search";

    #[instrument(skip_all, fields(pattern = %params.pattern, dir = %params.directory))]
    pub fn execute(params: &FileSearchParams, config: &Config) -> CallToolResult {
        info!("File search tool called: '{}' in {}", params.pattern, params.directory);
        outcome_result(search(params, config))
    }

    pub fn catalog_entry(config: Arc<Config>) -> CatalogEntry {
        CatalogEntry::typed(move |params: FileSearchParams| {
            let config = config.clone();
            async move { Self::execute(&params, &config) }
        })
    }
}

fn search(params: &FileSearchParams, config: &Config) -> ToolOutcome {
    let dir = existing_directory(&params.directory, config)?;

    let walker = WalkBuilder::new(&dir)
        .standard_filters(false)
        .filter_entry(|entry| !is_skipped_directory(entry))
        .build();

    let mut results = Vec::new();
    for entry in walker.flatten() {
        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }
        if matches_entry(entry.path(), &params.pattern, params.search_in_content) {
            results.push(display_relative(entry.path(), &dir));
        }
    }
    results.sort();

    if results.is_empty() {
        return Ok(format!("No files found matching pattern: {}", params.pattern));
    }
    Ok(format!(
        "Found {} file(s):\n{}",
        results.len(),
        results.join("\n")
    ))
}

/// Hidden directories and `node_modules` below the search root are not walked.
fn is_skipped_directory(entry: &DirEntry) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_some_and(|ft| ft.is_dir()) {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || name == "node_modules"
}

fn matches_entry(path: &Path, pattern: &str, search_in_content: bool) -> bool {
    let name_matches = path
        .file_name()
        .is_some_and(|name| name.to_string_lossy().contains(pattern));
    if name_matches {
        return true;
    }
    if !search_in_content {
        return false;
    }
    match fs::read_to_string(path) {
        Ok(content) => content.contains(pattern),
        Err(e) => {
            debug!("Skipping unreadable file {}: {}", path.display(), e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::definitions::common::first_text;
    use tempfile::TempDir;

    fn setup() -> (TempDir, Config) {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("src")).unwrap();
        fs::create_dir_all(root.join("node_modules/pkg")).unwrap();
        fs::create_dir_all(root.join(".cache")).unwrap();
        fs::write(root.join("src/config.rs"), "struct Settings;").unwrap();
        fs::write(root.join("src/main.rs"), "use settings::load;").unwrap();
        fs::write(root.join("node_modules/pkg/config.js"), "").unwrap();
        fs::write(root.join(".cache/config.bin"), "").unwrap();

        let mut config = Config::default();
        config.security.root_path = Some(root.to_path_buf());
        (temp_dir, config)
    }

    fn params(pattern: &str, search_in_content: bool) -> FileSearchParams {
        FileSearchParams {
            pattern: pattern.to_string(),
            directory: ".".to_string(),
            search_in_content,
        }
    }

    #[test]
    fn test_name_search_skips_ignored_directories() {
        let (_temp_dir, config) = setup();
        let result = FileSearchTool::execute(&params("config", false), &config);
        assert_eq!(
            first_text(&result),
            Some("Found 1 file(s):\nsrc/config.rs")
        );
    }

    #[test]
    fn test_content_search() {
        let (_temp_dir, config) = setup();
        let result = FileSearchTool::execute(&params("settings", true), &config);
        assert_eq!(first_text(&result), Some("Found 1 file(s):\nsrc/main.rs"));

        let result = FileSearchTool::execute(&params("settings", false), &config);
        assert_eq!(
            first_text(&result),
            Some("No files found matching pattern: settings")
        );
    }

    #[test]
    fn test_search_outside_root_rejected() {
        let (_temp_dir, config) = setup();
        let search = FileSearchParams {
            directory: "../..".to_string(),
            ..params("x", false)
        };
        let result = FileSearchTool::execute(&search, &config);
        assert!(result.is_error.unwrap_or(false));
        assert!(first_text(&result).unwrap().contains("Path traversal is not allowed"));
    }
}
