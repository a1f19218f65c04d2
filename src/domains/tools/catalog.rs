//! Handler Catalog - the statically linked table of tool implementations.
//!
//! Tool manifests name their handler by identifier; the loader resolves the
//! identifier here. When adding a new built-in tool:
//! 1. Create the tool file in `definitions/`
//! 2. Export it in `definitions/mod.rs`
//! 3. Register it here in `HandlerCatalog::builtin()`
//! 4. Ship a manifest for it in the `tools/` directory

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use rmcp::{
    handler::server::tool::cached_schema_for_type,
    model::{CallToolResult, JsonObject},
};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;

use crate::core::config::Config;

use super::definitions::{
    CalculatorTool, CurrentTimeTool, DirectoryCreateTool, DirectoryListTool, DirectoryTreeTool,
    FileCopyTool, FileDeleteTool, FileEchoTool, FileEditTool, FileGlobTool, FileListTool,
    FileMoveTool, FilePermissionsTool, FileSearchTool, FileWriteTool, ListFilesTool,
    ReadFileTool, ReadManyFilesTool, RunCommandTool, ShellCommandTool, TextSearchTool,
    WebFetchTool, WriteFileTool,
};
use super::descriptor::{ToolHandlerFn, typed_handler};
use super::error::ToolError;

/// A catalog entry: the handler plus the schema of the parameters it accepts.
#[derive(Clone)]
pub struct CatalogEntry {
    pub handler: ToolHandlerFn,
    pub schema: Arc<JsonObject>,
}

impl CatalogEntry {
    /// Build an entry from a typed tool function.
    pub fn typed<P, F, Fut>(run: F) -> Self
    where
        P: DeserializeOwned + JsonSchema + Send + 'static,
        F: Fn(P) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = CallToolResult> + Send + 'static,
    {
        Self {
            handler: typed_handler(run),
            schema: cached_schema_for_type::<P>(),
        }
    }

    /// Whether the handler's parameter struct has a property with this name.
    pub fn accepts_parameter(&self, name: &str) -> bool {
        self.schema
            .get("properties")
            .and_then(|p| p.as_object())
            .is_some_and(|p| p.contains_key(name))
    }
}

/// Handler identifier → implementation.
#[derive(Clone, Default)]
pub struct HandlerCatalog {
    entries: HashMap<String, CatalogEntry>,
}

impl HandlerCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// The catalog of every tool compiled into the server.
    pub fn builtin(config: Arc<Config>) -> Self {
        let mut catalog = Self::new();
        catalog.insert(CalculatorTool::NAME, CalculatorTool::catalog_entry());
        catalog.insert(CurrentTimeTool::NAME, CurrentTimeTool::catalog_entry());
        catalog.insert(FileEchoTool::NAME, FileEchoTool::catalog_entry());
        catalog.insert(ReadFileTool::NAME, ReadFileTool::catalog_entry(config.clone()));
        catalog.insert(
            ReadManyFilesTool::NAME,
            ReadManyFilesTool::catalog_entry(config.clone()),
        );
        catalog.insert(FileWriteTool::NAME, FileWriteTool::catalog_entry(config.clone()));
        catalog.insert(WriteFileTool::NAME, WriteFileTool::catalog_entry(config.clone()));
        catalog.insert(FileEditTool::NAME, FileEditTool::catalog_entry(config.clone()));
        catalog.insert(FileCopyTool::NAME, FileCopyTool::catalog_entry(config.clone()));
        catalog.insert(FileMoveTool::NAME, FileMoveTool::catalog_entry(config.clone()));
        catalog.insert(FileDeleteTool::NAME, FileDeleteTool::catalog_entry(config.clone()));
        catalog.insert(
            FilePermissionsTool::NAME,
            FilePermissionsTool::catalog_entry(config.clone()),
        );
        catalog.insert(
            DirectoryCreateTool::NAME,
            DirectoryCreateTool::catalog_entry(config.clone()),
        );
        catalog.insert(
            DirectoryListTool::NAME,
            DirectoryListTool::catalog_entry(config.clone()),
        );
        catalog.insert(ListFilesTool::NAME, ListFilesTool::catalog_entry(config.clone()));
        catalog.insert(FileListTool::NAME, FileListTool::catalog_entry(config.clone()));
        catalog.insert(
            DirectoryTreeTool::NAME,
            DirectoryTreeTool::catalog_entry(config.clone()),
        );
        catalog.insert(FileSearchTool::NAME, FileSearchTool::catalog_entry(config.clone()));
        catalog.insert(FileGlobTool::NAME, FileGlobTool::catalog_entry(config.clone()));
        catalog.insert(TextSearchTool::NAME, TextSearchTool::catalog_entry(config));
        catalog.insert(RunCommandTool::NAME, RunCommandTool::catalog_entry());
        catalog.insert(ShellCommandTool::NAME, ShellCommandTool::catalog_entry());
        catalog.insert(WebFetchTool::NAME, WebFetchTool::catalog_entry());
        catalog
    }

    /// Add or replace an entry.
    pub fn insert(&mut self, id: impl Into<String>, entry: CatalogEntry) {
        self.entries.insert(id.into(), entry);
    }

    /// Look up a handler by identifier.
    pub fn get(&self, id: &str) -> Result<&CatalogEntry, ToolError> {
        self.entries.get(id).ok_or_else(|| ToolError::not_found(id))
    }

    /// All handler identifiers, sorted.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<_> = self.entries.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builtin() -> HandlerCatalog {
        HandlerCatalog::builtin(Arc::new(Config::default()))
    }

    #[test]
    fn test_builtin_ids() {
        let catalog = builtin();
        assert_eq!(catalog.len(), 23);
        let ids = catalog.ids();
        for expected in [
            "calculator",
            "get_current_time",
            "file_echo",
            "read_file",
            "read_many_files",
            "file_write",
            "write_file",
            "file_edit",
            "file_copy",
            "file_move",
            "file_delete",
            "file_permissions",
            "directory_create",
            "directory_list",
            "list_files",
            "file_list",
            "directory_tree",
            "file_search",
            "file_glob",
            "text_search",
            "run_command",
            "shell_command",
            "web_fetch",
        ] {
            assert!(ids.contains(&expected), "missing handler {expected}");
        }
    }

    #[test]
    fn test_unknown_id_is_not_found() {
        let catalog = builtin();
        assert!(matches!(catalog.get("teleport"), Err(ToolError::NotFound(_))));
    }

    #[test]
    fn test_entry_schema_lists_parameters() {
        let catalog = builtin();
        let calculator = catalog.get("calculator").unwrap();
        assert!(calculator.accepts_parameter("operation"));
        assert!(calculator.accepts_parameter("a"));
        assert!(!calculator.accepts_parameter("c"));
    }

    #[tokio::test]
    async fn test_dispatch_through_catalog() {
        let catalog = builtin();
        let entry = catalog.get("calculator").unwrap();
        let args = serde_json::json!({ "operation": "multiply", "a": 6, "b": 7 });
        let result = (entry.handler)(args.as_object().unwrap().clone())
            .await
            .unwrap();
        assert_eq!(
            super::super::definitions::common::first_text(&result),
            Some("Result: 6 multiply 7 = 42")
        );
    }
}
