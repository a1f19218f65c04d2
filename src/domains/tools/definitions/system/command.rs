//! Shell command tools.
//!
//! Both tools run through [`run_shell`], so a command that outlives its
//! deadline is killed rather than left running in the background.

use std::time::Duration;

use rmcp::model::CallToolResult;
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{info, instrument, warn};

use super::super::common::{ToolOutcome, outcome_result};
use crate::core::process::{CommandError, CommandOutput, run_shell};
use crate::core::security::{TRUNCATION_MARKER, truncate_text};
use crate::domains::tools::catalog::CatalogEntry;

/// Deadline for `run_command`.
const RUN_COMMAND_TIMEOUT: Duration = Duration::from_secs(10);

/// Character cap on `shell_command` output.
const MAX_OUTPUT_CHARS: usize = 5000;

/// Substrings that make `shell_command` refuse to run a command.
const DANGEROUS_PATTERNS: &[&str] = &["rm -rf /", "dd", "mkfs", "format", ">:", ">/dev/null"];

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the `run_command` tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct RunCommandParams {
    /// The shell command to execute.
    pub command: String,
}

/// Parameters for the `shell_command` tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ShellCommandParams {
    /// The shell command to execute.
    pub command: String,

    /// Command timeout in seconds. Fractions are allowed.
    #[serde(default = "default_timeout")]
    pub timeout: f64,
}

fn default_timeout() -> f64 {
    30.0
}

// ============================================================================
// Tool Definitions
// ============================================================================

/// Run command tool - executes a shell command with a 10 second deadline.
pub struct RunCommandTool;

impl RunCommandTool {
    /// Handler identifier in the catalog.
    pub const NAME: &'static str = "run_command";

    #[instrument(skip_all, fields(command = %params.command))]
    pub async fn execute(params: &RunCommandParams) -> CallToolResult {
        info!("Run command tool called: {}", params.command);
        let outcome = run_shell(&params.command, RUN_COMMAND_TIMEOUT)
            .await
            .map(|output| report(&params.command, &output, None))
            .map_err(|e| failure(&params.command, &e));
        outcome_result(outcome)
    }

    pub fn catalog_entry() -> CatalogEntry {
        CatalogEntry::typed(|params: RunCommandParams| async move {
            Self::execute(&params).await
        })
    }
}

/// Shell command tool - executes a shell command after a blocklist check.
pub struct ShellCommandTool;

impl ShellCommandTool {
    /// Handler identifier in the catalog.
    pub const NAME: &'static str = "shell_command";

    #[instrument(skip_all, fields(command = %params.command, timeout = params.timeout))]
    pub async fn execute(params: &ShellCommandParams) -> CallToolResult {
        info!("Shell command tool called: {}", params.command);
        outcome_result(shell_command(params).await)
    }

    pub fn catalog_entry() -> CatalogEntry {
        CatalogEntry::typed(|params: ShellCommandParams| async move {
            Self::execute(&params).await
        })
    }
}

async fn shell_command(params: &ShellCommandParams) -> ToolOutcome {
    if let Some(pattern) = dangerous_pattern(&params.command) {
        warn!("Refusing command containing '{}'", pattern);
        return Err(format!(
            "Error: Command contains potentially dangerous operation: {}",
            pattern
        ));
    }

    let output = run_shell(&params.command, deadline(params.timeout)?)
        .await
        .map_err(|e| failure(&params.command, &e))?;

    Ok(report(&params.command, &output, Some(MAX_OUTPUT_CHARS)))
}

/// Seconds to a deadline; negative values mean an immediate deadline.
fn deadline(seconds: f64) -> Result<Duration, String> {
    Duration::try_from_secs_f64(seconds.max(0.0))
        .map_err(|_| format!("Error: Invalid timeout: {}", seconds))
}

/// The first blocklisted substring found in `command`, case-insensitively.
fn dangerous_pattern(command: &str) -> Option<&'static str> {
    let lowered = command.to_lowercase();
    DANGEROUS_PATTERNS
        .iter()
        .copied()
        .find(|pattern| lowered.contains(pattern))
}

fn report(command: &str, output: &CommandOutput, max_chars: Option<usize>) -> String {
    let text = match output.primary_text() {
        "" => "Command executed successfully with no output",
        text => text,
    };
    let text = match max_chars {
        Some(max) => truncate_text(text, max, TRUNCATION_MARKER),
        None => text.to_string(),
    };
    format!("Command: {}\n\nOutput:\n{}", command, text)
}

fn failure(command: &str, error: &CommandError) -> String {
    format!("Error executing command: {}\n\nError: {}", command, error)
}

// ============================================================================
// Tests
// ============================================================================
