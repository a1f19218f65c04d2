//! File edit tool definition.
//!
//! Literal text replacement inside a file, first occurrence or all of them.

use std::fs;
use std::sync::Arc;

use rmcp::model::CallToolResult;
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{info, instrument};

use super::super::common::{ToolOutcome, existing_path, outcome_result};
use crate::core::config::Config;
use crate::core::security::ensure_file_size;
use crate::domains::tools::catalog::CatalogEntry;

/// Largest file the edit tool will rewrite.
const MAX_EDIT_BYTES: u64 = 100 * 1024;

/// Parameters for the file edit tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct FileEditParams {
    /// The path to the file to edit.
    pub file_path: String,

    /// The exact literal text to replace.
    pub old_content: String,

    /// The exact literal text to replace with.
    pub new_content: String,

    /// Replace all occurrences of `old_content` instead of the first.
    #[serde(default)]
    pub replace_all: bool,
}

/// File edit tool - replaces literal text in a file.
pub struct FileEditTool;

impl FileEditTool {
    /// Handler identifier in the catalog.
    pub const NAME: &'static str = "file_edit";

    #[instrument(skip_all, fields(path = %params.file_path, replace_all = params.replace_all))]
    pub fn execute(params: &FileEditParams, config: &Config) -> CallToolResult {
        info!("File edit tool called: {}", params.file_path);
        outcome_result(edit(params, config))
    }

    pub fn catalog_entry(config: Arc<Config>) -> CatalogEntry {
        CatalogEntry::typed(move |params: FileEditParams| {
            let config = config.clone();
            async move { Self::execute(&params, &config) }
        })
    }
}

fn edit(params: &FileEditParams, config: &Config) -> ToolOutcome {
    let path = existing_path(&params.file_path, config, || {
        format!("Error: File does not exist: {}", params.file_path)
    })?;

    let metadata = fs::metadata(&path).map_err(|e| format!("Error editing file: {}", e))?;
    if metadata.is_dir() {
        return Err(format!(
            "Error: Path is a directory, not a file: {}",
            params.file_path
        ));
    }
    ensure_file_size(metadata.len(), MAX_EDIT_BYTES).map_err(|e| format!("Error: {}", e))?;

    if params.old_content.is_empty() {
        return Err("Error: The text to replace must not be empty".to_string());
    }

    let content = fs::read_to_string(&path).map_err(|e| format!("Error editing file: {}", e))?;
    let updated = if params.replace_all {
        content.replace(&params.old_content, &params.new_content)
    } else {
        if !content.contains(&params.old_content) {
            return Err(format!(
                "Error: The specified text to replace was not found in the file: {}",
                params.file_path
            ));
        }
        content.replacen(&params.old_content, &params.new_content, 1)
    };

    fs::write(&path, updated).map_err(|e| format!("Error editing file: {}", e))?;

    Ok(format!(
        "Successfully updated file: {}. Replaced {} occurrence(s) of specified text.",
        params.file_path,
        if params.replace_all { "all" } else { "first" }
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::definitions::common::first_text;
    use tempfile::TempDir;

    fn setup(content: &str) -> (TempDir, Config) {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("doc.txt"), content).unwrap();
        let mut config = Config::default();
        config.security.root_path = Some(temp_dir.path().to_path_buf());
        (temp_dir, config)
    }

    fn params(old: &str, new: &str, replace_all: bool) -> FileEditParams {
        FileEditParams {
            file_path: "doc.txt".to_string(),
            old_content: old.to_string(),
            new_content: new.to_string(),
            replace_all,
        }
    }

    #[test]
    fn test_replace_first_occurrence() {
        let (temp_dir, config) = setup("foo bar foo");
        let result = FileEditTool::execute(&params("foo", "baz", false), &config);
        assert!(first_text(&result).unwrap().contains("Replaced first occurrence(s)"));
        assert_eq!(
            fs::read_to_string(temp_dir.path().join("doc.txt")).unwrap(),
            "baz bar foo"
        );
    }

    #[test]
    fn test_replace_all_occurrences() {
        let (temp_dir, config) = setup("foo bar foo");
        FileEditTool::execute(&params("foo", "baz", true), &config);
        assert_eq!(
            fs::read_to_string(temp_dir.path().join("doc.txt")).unwrap(),
            "baz bar baz"
        );
    }

    #[test]
    fn test_missing_text_is_error() {
        let (temp_dir, config) = setup("foo bar");
        let result = FileEditTool::execute(&params("qux", "baz", false), &config);
        assert!(result.is_error.unwrap_or(false));
        assert!(first_text(&result).unwrap().contains("was not found"));
        assert_eq!(
            fs::read_to_string(temp_dir.path().join("doc.txt")).unwrap(),
            "foo bar"
        );
    }

    #[test]
    fn test_large_file_rejected() {
        let (_temp_dir, config) = setup(&"a".repeat(200 * 1024));
        let result = FileEditTool::execute(&params("a", "b", false), &config);
        assert!(first_text(&result).unwrap().contains("Maximum allowed size is 100KB"));
    }
}
