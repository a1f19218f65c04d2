//! Tools domain module.
//!
//! This module handles all tool-related functionality for the MCP server.
//! Tools are executable functions that can be called by MCP clients to perform
//! specific actions or computations.
//!
//! ## Architecture
//!
//! - `definitions/` - Built-in tool implementations (one file per tool family)
//! - `catalog.rs` - Handler identifier → implementation table
//! - `descriptor.rs` - The tool record and the `ToolRegistrar` seam
//! - `loader.rs` - Manifest discovery, validation and registration
//! - `router.rs` - ToolRouter builder for the inline tools
//! - `error.rs` - Tool-specific error types
//!
//! ## Adding a New Tool
//!
//! 1. Create the implementation in `definitions/`
//! 2. Register it in `HandlerCatalog::builtin()`
//! 3. Drop a manifest naming its handler into the tools directory

pub mod catalog;
pub mod definitions;
pub mod descriptor;
mod error;
pub mod loader;
pub mod router;

pub use catalog::{CatalogEntry, HandlerCatalog};
pub use descriptor::{ToolDescriptor, ToolRegistrar};
pub use error::ToolError;
pub use loader::{LoadDiagnostic, LoadReport, ToolLoader, ToolManifest};
pub use router::build_tool_router;
