//! MCP Tool Server Library
//!
//! A Model Context Protocol (MCP) server whose tools are declared by
//! manifests in a directory and implemented by a built-in handler catalog.
//!
//! # Architecture
//!
//! - **core**: Configuration, error handling, path and size guards,
//!   subprocess execution, the server handler and the stdio transport
//! - **domains**: Business logic organized by bounded contexts
//!   - **tools**: Tool descriptors, the handler catalog, the manifest loader
//!     and the built-in tool implementations
//!
//! # Example
//!
//! ```rust,no_run
//! use mcp_tool_server::core::{Config, McpServer, StdioTransport};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let mut server = McpServer::new(config);
//!     let report = server.load_tools().await;
//!     eprintln!("{}", report);
//!     StdioTransport::run(server).await?;
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result};
