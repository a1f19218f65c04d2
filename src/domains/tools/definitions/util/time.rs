//! Current time tool definition.

use chrono::{DateTime, Local, TimeZone};
use rmcp::model::CallToolResult;
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::debug;

use super::super::common::success_result;
use crate::domains::tools::catalog::CatalogEntry;

/// Parameters for the current time tool (none).
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct CurrentTimeParams {}

/// Current time tool - reports the local date and time.
pub struct CurrentTimeTool;

impl CurrentTimeTool {
    /// Handler identifier in the catalog.
    pub const NAME: &'static str = "get_current_time";

    pub fn execute() -> CallToolResult {
        debug!("Current time requested");
        success_result(format_time(&Local::now()))
    }

    pub fn catalog_entry() -> CatalogEntry {
        CatalogEntry::typed(|_: CurrentTimeParams| async { Self::execute() })
    }
}

fn format_time<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!(
        "Current date and time: {}",
        now.format("%a %b %d %Y %H:%M:%S GMT%z")
    )
}
