//! Search tools: by name, by glob, and by regular expression.

pub mod file_search;
pub mod glob;
pub mod text;

pub use file_search::{FileSearchParams, FileSearchTool};
pub use glob::{FileGlobParams, FileGlobTool};
pub use text::{TextSearchParams, TextSearchTool};

use std::path::Path;

/// `path` relative to `base`, with `/` separators on every platform.
fn display_relative(path: &Path, base: &Path) -> String {
    let relative = path.strip_prefix(base).unwrap_or(path);
    relative.to_string_lossy().replace('\\', "/")
}
