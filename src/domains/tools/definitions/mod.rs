//! Tool definitions module.
//!
//! This module exports all built-in tool implementations.
//! Each tool is defined in its own file for better maintainability.

pub mod common;
pub mod fs;
pub mod search;
pub mod system;
pub mod util;
pub mod web;

pub use fs::{
    DirectoryCreateTool, DirectoryListTool, DirectoryTreeTool, FileCopyTool, FileDeleteTool,
    FileEditTool, FileListTool, FileMoveTool, FilePermissionsTool, FileWriteTool, ListFilesTool,
    ReadFileTool, ReadManyFilesTool, WriteFileTool,
};
pub use search::{FileGlobTool, FileSearchTool, TextSearchTool};
pub use system::{RunCommandTool, ShellCommandTool};
pub use util::{CalculatorTool, CurrentTimeTool, EchoTool, FileEchoTool, PingPongTool};
pub use web::WebFetchTool;
