//! Text search tool definition.
//!
//! A small in-process grep: regular expression matching over every text
//! file under a path, reported as `file:line:text`.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use ignore::WalkBuilder;
use regex::{Regex, RegexBuilder};
use rmcp::model::CallToolResult;
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{debug, info, instrument};

use super::super::common::{ToolOutcome, existing_path, outcome_result};
use super::display_relative;
use crate::core::config::Config;
use crate::core::security::{TRUNCATION_MARKER, truncate_text};
use crate::domains::tools::catalog::CatalogEntry;

/// Character cap on the reported matches.
const MAX_OUTPUT_CHARS: usize = 5000;

/// Parameters for the text search tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct TextSearchParams {
    /// The pattern to search for (regular expression).
    pub pattern: String,

    /// The file or directory to search in.
    #[serde(default = "default_path")]
    pub path: String,

    /// Whether the search is case sensitive.
    #[serde(default = "default_case_sensitive")]
    pub case_sensitive: bool,
}

fn default_path() -> String {
    ".".to_string()
}

fn default_case_sensitive() -> bool {
    true
}

/// Text search tool - regex search through file contents.
pub struct TextSearchTool;

impl TextSearchTool {
    /// Handler identifier in the catalog.
    pub const NAME: &'static str = "text_search";

    #[instrument(skip_all, fields(pattern = %params.pattern, path = %params.path))]
    pub fn execute(params: &TextSearchParams, config: &Config) -> CallToolResult {
        info!("Text search tool called: '{}' in {}", params.pattern, params.path);
        outcome_result(text_search(params, config))
    }

    pub fn catalog_entry(config: Arc<Config>) -> CatalogEntry {
        CatalogEntry::typed(move |params: TextSearchParams| {
            let config = config.clone();
            async move { Self::execute(&params, &config) }
        })
    }
}

fn text_search(params: &TextSearchParams, config: &Config) -> ToolOutcome {
    let regex = RegexBuilder::new(&params.pattern)
        .case_insensitive(!params.case_sensitive)
        .build()
        .map_err(|e| format!("Error searching for pattern: {}", e))?;

    let target = existing_path(&params.path, config, || {
        format!("Error: Path does not exist: {}", params.path)
    })?;

    let mut output = String::new();
    if target.is_file() {
        let label = target
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| params.path.clone());
        search_file(&target, &label, &regex, &mut output);
    } else {
        let walker = WalkBuilder::new(&target)
            .standard_filters(false)
            .filter_entry(|entry| entry.file_name() != ".git")
            .build();
        for entry in walker.flatten() {
            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }
            let label = display_relative(entry.path(), &target);
            search_file(entry.path(), &label, &regex, &mut output);
            if output.len() > MAX_OUTPUT_CHARS * 4 {
                break;
            }
        }
    }

    if output.is_empty() {
        return Ok(format!("No matches found for pattern: {}", params.pattern));
    }

    Ok(format!(
        "Search results for pattern \"{}\" in path \"{}\":\n\n{}",
        params.pattern,
        params.path,
        truncate_text(&output, MAX_OUTPUT_CHARS, TRUNCATION_MARKER)
    ))
}

/// Append `label:line:text` for every matching line of a text file.
fn search_file(path: &Path, label: &str, regex: &Regex, output: &mut String) {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            debug!("Skipping {}: {}", path.display(), e);
            return;
        }
    };
    for (index, line) in content.lines().enumerate() {
        if regex.is_match(line) {
            output.push_str(&format!("{}:{}:{}\n", label, index + 1, line));
        }
    }
}
