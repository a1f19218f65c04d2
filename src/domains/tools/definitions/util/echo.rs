//! Echo tools.
//!
//! `ping_pong` and `echo` are registered inline by the server; `file_echo`
//! is the catalog variant loaded from a manifest.

use rmcp::{handler::server::tool::cached_schema_for_type, model::CallToolResult};
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{debug, instrument};

use super::super::common::success_result;
use crate::domains::tools::catalog::CatalogEntry;
use crate::domains::tools::descriptor::{ToolDescriptor, parameters_from_schema, typed_handler};

/// Parameters for the ping tool (none).
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct PingPongParams {}

/// Parameters for the echo tools.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct EchoParams {
    /// The message to echo back.
    pub message: String,
}

/// Liveness check - always answers "pong".
pub struct PingPongTool;

impl PingPongTool {
    pub const NAME: &'static str = "ping_pong";
    pub const DESCRIPTION: &'static str = "Ping the server and receive a pong back";

    pub fn execute() -> CallToolResult {
        debug!("Ping received");
        success_result("pong".to_string())
    }

    pub fn descriptor() -> ToolDescriptor {
        ToolDescriptor::new(
            Self::NAME,
            Self::DESCRIPTION,
            parameters_from_schema(&cached_schema_for_type::<PingPongParams>()),
            typed_handler(|_: PingPongParams| async { Self::execute() }),
        )
    }
}

/// Echo tool - returns the message it was given.
pub struct EchoTool;

impl EchoTool {
    pub const NAME: &'static str = "echo";
    pub const DESCRIPTION: &'static str =
        "Send a message to the server and receive the message back";

    #[instrument(skip_all)]
    pub fn execute(params: &EchoParams) -> CallToolResult {
        debug!("Echoing {} characters", params.message.len());
        success_result(params.message.clone())
    }

    pub fn descriptor() -> ToolDescriptor {
        ToolDescriptor::new(
            Self::NAME,
            Self::DESCRIPTION,
            parameters_from_schema(&cached_schema_for_type::<EchoParams>()),
            typed_handler(|params: EchoParams| async move { Self::execute(&params) }),
        )
    }
}

/// Echo tool exposed through a manifest.
pub struct FileEchoTool;

impl FileEchoTool {
    /// Handler identifier in the catalog.
    pub const NAME: &'static str = "file_echo";

    pub fn catalog_entry() -> CatalogEntry {
        CatalogEntry::typed(|params: EchoParams| async move { EchoTool::execute(&params) })
    }
}
