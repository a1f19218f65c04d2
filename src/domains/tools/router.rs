//! Tool Router - builds the rmcp ToolRouter for the inline tools.
//!
//! Only the tools the server always carries are registered here. Everything
//! else arrives through the [`ToolLoader`](super::loader::ToolLoader).

use rmcp::handler::server::tool::ToolRouter;

use super::definitions::{EchoTool, PingPongTool};
use super::descriptor::ToolRegistrar;

/// Build the tool router with the inline tools registered.
pub fn build_tool_router<S>() -> ToolRouter<S>
where
    S: Send + Sync + 'static,
{
    let mut router = ToolRouter::new();
    router.register(PingPongTool::descriptor());
    router.register(EchoTool::descriptor());
    router
}
