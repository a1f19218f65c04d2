//! MCP Server Entry Point
//!
//! Initializes logging, loads configuration, registers the tools found in
//! the tools directory and serves them over stdio.

use std::process::ExitCode;

use anyhow::Result;
use tracing::{Level, error, info};
use tracing_subscriber::{EnvFilter, fmt};

use mcp_tool_server::core::{Config, McpServer, StdioTransport};

#[tokio::main]
async fn main() -> ExitCode {
    // Load configuration from environment
    let config = Config::from_env();

    // Initialize logging
    init_logging(&config.logging.level);

    match run(config).await {
        Ok(()) => {
            info!("Server shutting down");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Server failed: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(config: Config) -> Result<()> {
    config.validate()?;

    info!("Starting {} v{}", config.server.name, config.server.version);

    let mut server = McpServer::new(config);
    let report = server.load_tools().await;
    info!("Server initialized with tools: {}", server.tool_names().join(", "));
    if !report.is_clean() {
        info!("{} tool file(s) skipped", report.diagnostics.len());
    }

    StdioTransport::run(server).await?;
    Ok(())
}

/// Initialize the logging subsystem.
///
/// Logs go to stderr; stdout carries MCP frames only.
fn init_logging(level: &str) {
    let level = match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .init();
}
