//! MCP Server implementation and lifecycle management.
//!
//! The server starts with the inline tools from `build_tool_router`, then
//! [`McpServer::load_tools`] fills in everything the manifest directory
//! declares. Tool calls are dispatched by name through the rmcp
//! `#[tool_handler]` routing.

use rmcp::{ServerHandler, handler::server::tool::ToolRouter, model::*, tool_handler};
use std::sync::Arc;
use tracing::info;

use super::config::Config;
use crate::domains::tools::{HandlerCatalog, LoadReport, ToolLoader, build_tool_router};

/// The main MCP server handler.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Tool router for handling tool calls.
    tool_router: ToolRouter<Self>,
}

impl McpServer {
    /// Create a new MCP server carrying only the inline tools.
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            tool_router: build_tool_router::<Self>(),
        }
    }

    /// Register every valid manifest from the configured tools directory.
    ///
    /// Never fails; per-file problems are in the returned report.
    pub async fn load_tools(&mut self) -> LoadReport {
        let dir = self.config.tools.resolved_dir();
        info!("Loading tools from {}", dir.display());

        let catalog = HandlerCatalog::builtin(self.config.clone());
        ToolLoader::new(dir, catalog)
            .load(&mut self.tool_router)
            .await
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Get the server configuration.
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    /// Names of every registered tool, sorted.
    pub fn tool_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .tool_router
            .list_all()
            .into_iter()
            .map(|t| t.name.to_string())
            .collect();
        names.sort();
        names
    }
}

/// ServerHandler implementation with tool_handler macro for automatic tool routing.
#[tool_handler]
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: self.config.server.name.clone(),
                version: self.config.server.version.clone(),
                ..Default::default()
            },
            instructions: Some(self.config.server.instructions.clone()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}
