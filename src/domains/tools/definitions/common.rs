//! Common utilities shared across the built-in tools.
//!
//! Tools compute a `Result<String, String>` (success text or error text) and
//! convert it into a call result here, so every tool reports failures the
//! same way: as error text content, never as a protocol error.

use std::path::PathBuf;

use rmcp::model::{CallToolResult, Content, RawContent};
use tracing::warn;

use crate::core::config::Config;
use crate::core::security::{PathSecurityError, resolve_path, validate_path};

/// Outcome of a tool body: success text or error text.
pub type ToolOutcome = Result<String, String>;

/// Create an error result with a formatted message.
pub fn error_result(message: &str) -> CallToolResult {
    warn!("{}", message);
    CallToolResult::error(vec![Content::text(message.to_string())])
}

/// Create a success result with text content.
pub fn success_result(content: String) -> CallToolResult {
    CallToolResult::success(vec![Content::text(content)])
}

/// Convert a tool outcome into a call result.
pub fn outcome_result(outcome: ToolOutcome) -> CallToolResult {
    match outcome {
        Ok(text) => success_result(text),
        Err(message) => error_result(&message),
    }
}

/// Resolve a path that must already exist.
///
/// `missing` builds the tool-specific message for a path that does not exist.
pub fn existing_path(
    input: &str,
    config: &Config,
    missing: impl FnOnce() -> String,
) -> Result<PathBuf, String> {
    validate_path(input, config).map_err(|e| match e {
        PathSecurityError::PathNotFound { .. } => missing(),
        e => path_error(&e),
    })
}

/// Resolve `input` to an existing directory.
pub fn existing_directory(input: &str, config: &Config) -> Result<PathBuf, String> {
    let path = existing_path(input, config, || {
        format!("Error: Directory does not exist: {}", input)
    })?;
    if !path.is_dir() {
        return Err(format!("Error: Path is not a directory: {}", input));
    }
    Ok(path)
}

/// Resolve a path that may not exist yet.
pub fn target_path(input: &str, config: &Config) -> Result<PathBuf, String> {
    resolve_path(input, config).map_err(|e| path_error(&e))
}

fn path_error(e: &PathSecurityError) -> String {
    if e.is_escape() {
        format!("Error: Path traversal is not allowed ({})", e)
    } else {
        format!("Error: {}", e)
    }
}

/// Text of the first content block, if it is text.
pub fn first_text(result: &CallToolResult) -> Option<&str> {
    result.content.first().and_then(|content| match &content.raw {
        RawContent::Text(text) => Some(text.text.as_str()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn rooted_config(root: &std::path::Path) -> Config {
        let mut config = Config::default();
        config.security.root_path = Some(root.to_path_buf());
        config
    }

    #[test]
    fn test_outcome_result() {
        let ok = outcome_result(Ok("done".to_string()));
        assert_eq!(ok.is_error, Some(false));
        assert_eq!(first_text(&ok), Some("done"));

        let err = outcome_result(Err("Error: nope".to_string()));
        assert_eq!(err.is_error, Some(true));
        assert_eq!(first_text(&err), Some("Error: nope"));
    }

    #[test]
    fn test_existing_path_uses_missing_message() {
        let temp_dir = TempDir::new().unwrap();
        let config = rooted_config(temp_dir.path());
        let err = existing_path("ghost.txt", &config, || "Error: gone".to_string()).unwrap_err();
        assert_eq!(err, "Error: gone");
    }

    #[test]
    fn test_target_path_rejects_escape() {
        let temp_dir = TempDir::new().unwrap();
        let config = rooted_config(temp_dir.path());
        let err = target_path("../../etc/passwd", &config).unwrap_err();
        assert!(err.starts_with("Error: Path traversal is not allowed"));
    }
}
