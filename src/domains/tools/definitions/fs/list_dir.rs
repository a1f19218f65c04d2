//! Directory listing tool definitions.
//!
//! Three flavours of "what is in this directory":
//! - `directory_list`: one line per entry with type, mode and size
//! - `list_files`: names with a type tag, capped at `max_items`
//! - `file_list`: relative paths, optionally filtered and recursive

use std::fs::{self, Metadata};
use std::path::Path;
use std::sync::Arc;

use rmcp::model::CallToolResult;
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{info, instrument, warn};

use super::super::common::{ToolOutcome, existing_directory, outcome_result};
use crate::core::config::Config;
use crate::domains::tools::catalog::CatalogEntry;

/// Directories never descended into by a recursive `file_list`.
const SKIPPED_DIRECTORIES: &[&str] = &["node_modules"];

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the `directory_list` tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DirectoryListParams {
    /// The directory to list.
    #[serde(default = "default_directory")]
    pub directory: String,

    /// Whether to show hidden files and directories.
    #[serde(default, rename = "showHidden")]
    pub show_hidden: bool,
}

/// Parameters for the `list_files` tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListFilesParams {
    /// The directory path to list.
    #[serde(default = "default_directory")]
    pub path: String,

    /// Whether to show hidden files and directories.
    #[serde(default)]
    pub show_hidden: bool,

    /// Maximum number of items to return.
    #[serde(default = "default_max_items")]
    pub max_items: usize,
}

/// Parameters for the `file_list` tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct FileListParams {
    /// The directory to list.
    #[serde(default = "default_directory")]
    pub directory: String,

    /// Only include entries whose name contains this text.
    #[serde(default)]
    pub filter: Option<String>,

    /// Whether to list files recursively.
    #[serde(default)]
    pub recursive: bool,
}

pub(super) fn default_directory() -> String {
    ".".to_string()
}

fn default_max_items() -> usize {
    100
}

// ============================================================================
// Tool Definitions
// ============================================================================

/// Detailed directory listing.
pub struct DirectoryListTool;

impl DirectoryListTool {
    /// Handler identifier in the catalog.
    pub const NAME: &'static str = "directory_list";

    #[instrument(skip_all, fields(path = %params.directory))]
    pub fn execute(params: &DirectoryListParams, config: &Config) -> CallToolResult {
        info!("Directory list tool called for path: {}", params.directory);
        outcome_result(directory_list(params, config))
    }

    pub fn catalog_entry(config: Arc<Config>) -> CatalogEntry {
        CatalogEntry::typed(move |params: DirectoryListParams| {
            let config = config.clone();
            async move { Self::execute(&params, &config) }
        })
    }
}

fn directory_list(params: &DirectoryListParams, config: &Config) -> ToolOutcome {
    let dir = existing_directory(&params.directory, config)?;
    let entries = sorted_entries(&dir, params.show_hidden)
        .map_err(|e| format!("Error listing directory: {}", e))?;

    if entries.is_empty() {
        return Ok(format!("Directory is empty: {}", params.directory));
    }

    let lines: Vec<String> = entries
        .iter()
        .map(|(name, metadata)| {
            let (kind, size) = if metadata.is_dir() {
                ("DIR", "-".to_string())
            } else {
                ("FILE", format_size(metadata.len()))
            };
            format!("{} {} {} {}", kind, mode_string(metadata), size, name)
        })
        .collect();

    info!("Listed {} entries in {}", lines.len(), params.directory);
    Ok(format!(
        "Contents of {}:\n{}",
        params.directory,
        lines.join("\n")
    ))
}

/// Short directory listing with an item cap.
pub struct ListFilesTool;

impl ListFilesTool {
    /// Handler identifier in the catalog.
    pub const NAME: &'static str = "list_files";

    #[instrument(skip_all, fields(path = %params.path))]
    pub fn execute(params: &ListFilesParams, config: &Config) -> CallToolResult {
        info!("List files tool called for path: {}", params.path);
        outcome_result(list_files(params, config))
    }

    pub fn catalog_entry(config: Arc<Config>) -> CatalogEntry {
        CatalogEntry::typed(move |params: ListFilesParams| {
            let config = config.clone();
            async move { Self::execute(&params, &config) }
        })
    }
}

fn list_files(params: &ListFilesParams, config: &Config) -> ToolOutcome {
    let dir = existing_directory(&params.path, config)?;
    let entries = sorted_entries(&dir, params.show_hidden)
        .map_err(|e| format!("Error listing directory: {}", e))?;

    let mut response = format!("Contents of directory \"{}\":\n", params.path);
    for (name, metadata) in entries.iter().take(params.max_items) {
        if metadata.is_dir() {
            response.push_str(&format!("[DIR] {}\n", name));
        } else {
            response.push_str(&format!("[FILE] {} ({} bytes)\n", name, metadata.len()));
        }
    }
    if entries.len() > params.max_items {
        response.push_str(&format!(
            "\n... and {} more items",
            entries.len() - params.max_items
        ));
    }

    Ok(response)
}

/// Relative-path listing with an optional name filter and recursion.
pub struct FileListTool;

impl FileListTool {
    /// Handler identifier in the catalog.
    pub const NAME: &'static str = "file_list";

    #[instrument(skip_all, fields(path = %params.directory, recursive = params.recursive))]
    pub fn execute(params: &FileListParams, config: &Config) -> CallToolResult {
        info!("File list tool called for path: {}", params.directory);
        outcome_result(file_list(params, config))
    }

    pub fn catalog_entry(config: Arc<Config>) -> CatalogEntry {
        CatalogEntry::typed(move |params: FileListParams| {
            let config = config.clone();
            async move { Self::execute(&params, &config) }
        })
    }
}

fn file_list(params: &FileListParams, config: &Config) -> ToolOutcome {
    let dir = existing_directory(&params.directory, config)?;

    let mut results = Vec::new();
    collect_files(&dir, &dir, params, &mut results)
        .map_err(|e| format!("Error listing files: {}", e))?;

    if results.is_empty() {
        return Ok(format!("No files found in directory: {}", params.directory));
    }
    Ok(format!(
        "Files in {}:\n{}",
        params.directory,
        results.join("\n")
    ))
}

fn collect_files(
    base: &Path,
    dir: &Path,
    params: &FileListParams,
    results: &mut Vec<String>,
) -> std::io::Result<()> {
    for (name, metadata) in sorted_entries(dir, true)? {
        if let Some(ref filter) = params.filter {
            if !name.contains(filter.as_str()) {
                continue;
            }
        }

        let path = dir.join(&name);
        let relative = path.strip_prefix(base).unwrap_or(&path).display().to_string();

        if metadata.is_dir() {
            if !params.recursive {
                results.push(format!("{}/ (directory)", relative));
            } else if !name.starts_with('.') && !SKIPPED_DIRECTORIES.contains(&name.as_str()) {
                results.push(format!("{}/ (directory)", relative));
                collect_files(base, &path, params, results)?;
            }
        } else {
            results.push(format!("{} ({} bytes)", relative, metadata.len()));
        }
    }
    Ok(())
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Directory entries sorted by name, with metadata that follows symlinks.
pub(super) fn sorted_entries(
    dir: &Path,
    show_hidden: bool,
) -> std::io::Result<Vec<(String, Metadata)>> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!("Error reading entry: {}", e);
                continue;
            }
        };

        let name = entry.file_name().to_string_lossy().into_owned();
        if !show_hidden && name.starts_with('.') {
            continue;
        }

        match fs::metadata(entry.path()) {
            Ok(metadata) => entries.push((name, metadata)),
            Err(e) => warn!("Failed to get metadata for {}: {}", name, e),
        }
    }
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(entries)
}

#[cfg(unix)]
fn mode_string(metadata: &Metadata) -> String {
    use std::os::unix::fs::PermissionsExt;
    format!("{:03o}", metadata.permissions().mode() & 0o777)
}

#[cfg(not(unix))]
fn mode_string(metadata: &Metadata) -> String {
    if metadata.permissions().readonly() {
        "r--".to_string()
    } else {
        "rw-".to_string()
    }
}

/// Format file size in human-readable format.
fn format_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];

    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", size as u64, UNITS[unit_index])
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::definitions::common::first_text;
    use tempfile::TempDir;

    fn setup() -> (TempDir, Config) {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("file1.txt"), "content").unwrap();
        fs::write(root.join("file2.txt"), "content").unwrap();
        fs::write(root.join(".hidden"), "secret").unwrap();
        fs::create_dir(root.join("subdir")).unwrap();
        fs::write(root.join("subdir/inner.rs"), "fn main() {}").unwrap();
        fs::create_dir(root.join("node_modules")).unwrap();
        fs::write(root.join("node_modules/dep.js"), "x").unwrap();

        let mut config = Config::default();
        config.security.root_path = Some(root.to_path_buf());
        (temp_dir, config)
    }

    #[test]
    fn test_directory_list() {
        let (_temp_dir, config) = setup();
        let params: DirectoryListParams = serde_json::from_value(serde_json::json!({})).unwrap();
        let result = DirectoryListTool::execute(&params, &config);
        let text = first_text(&result).unwrap();

        assert!(text.starts_with("Contents of .:\n"));
        assert!(text.contains("FILE"));
        assert!(text.contains("7 B file1.txt"));
        assert!(text.contains("DIR"));
        assert!(text.contains("subdir"));
        assert!(!text.contains(".hidden"));
    }

    #[test]
    fn test_directory_list_show_hidden() {
        let (_temp_dir, config) = setup();
        let params: DirectoryListParams =
            serde_json::from_value(serde_json::json!({ "showHidden": true })).unwrap();
        let result = DirectoryListTool::execute(&params, &config);
        assert!(first_text(&result).unwrap().contains(".hidden"));
    }

    #[test]
    fn test_directory_list_nonexistent() {
        let (_temp_dir, config) = setup();
        let params = DirectoryListParams {
            directory: "nope".to_string(),
            show_hidden: false,
        };
        let result = DirectoryListTool::execute(&params, &config);
        assert!(result.is_error.unwrap_or(false));
        assert_eq!(
            first_text(&result),
            Some("Error: Directory does not exist: nope")
        );
    }

    #[test]
    fn test_directory_list_on_file() {
        let (_temp_dir, config) = setup();
        let params = DirectoryListParams {
            directory: "file1.txt".to_string(),
            show_hidden: false,
        };
        let result = DirectoryListTool::execute(&params, &config);
        assert!(first_text(&result).unwrap().contains("not a directory"));
    }

    #[test]
    fn test_list_files_caps_items() {
        let (_temp_dir, config) = setup();
        let params = ListFilesParams {
            path: ".".to_string(),
            show_hidden: false,
            max_items: 2,
        };
        let result = ListFilesTool::execute(&params, &config);
        let text = first_text(&result).unwrap();
        assert!(text.contains("[FILE] file1.txt (7 bytes)"));
        assert!(text.contains("[FILE] file2.txt (7 bytes)"));
        assert!(!text.contains("subdir"));
        assert!(text.ends_with("... and 2 more items"));
    }

    #[test]
    fn test_file_list_flat() {
        let (_temp_dir, config) = setup();
        let params = FileListParams {
            directory: ".".to_string(),
            filter: None,
            recursive: false,
        };
        let result = FileListTool::execute(&params, &config);
        let text = first_text(&result).unwrap();
        assert!(text.contains("subdir/ (directory)"));
        assert!(text.contains("node_modules/ (directory)"));
        assert!(!text.contains("inner.rs"));
    }

    #[test]
    fn test_file_list_recursive_skips_node_modules() {
        let (_temp_dir, config) = setup();
        let params = FileListParams {
            directory: ".".to_string(),
            filter: None,
            recursive: true,
        };
        let result = FileListTool::execute(&params, &config);
        let text = first_text(&result).unwrap();
        assert!(text.contains(&format!("subdir{}inner.rs (12 bytes)", std::path::MAIN_SEPARATOR)));
        assert!(!text.contains("node_modules"));
        assert!(!text.contains("dep.js"));
    }

    #[test]
    fn test_file_list_filter() {
        let (_temp_dir, config) = setup();
        let params = FileListParams {
            directory: ".".to_string(),
            filter: Some("file2".to_string()),
            recursive: false,
        };
        let result = FileListTool::execute(&params, &config);
        let text = first_text(&result).unwrap();
        assert!(text.contains("file2.txt"));
        assert!(!text.contains("file1.txt"));

        let params = FileListParams {
            directory: ".".to_string(),
            filter: Some("zzz".to_string()),
            recursive: false,
        };
        let result = FileListTool::execute(&params, &config);
        assert_eq!(
            first_text(&result),
            Some("No files found in directory: .")
        );
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(500), "500 B");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(1048576), "1.0 MB");
    }
}
