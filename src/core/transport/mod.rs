//! Transport layer for the MCP server.
//!
//! The server speaks MCP over standard input/output. Stdout carries protocol
//! frames only; all diagnostics go to stderr through `tracing`.

mod error;
pub mod stdio;

pub use error::{TransportError, TransportResult};
pub use stdio::StdioTransport;
