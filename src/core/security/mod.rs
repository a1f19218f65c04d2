// Security module for path validation and size limits
//
// This module provides utilities to ensure that file system operations
// are restricted to configured safe directories, preventing path traversal
// attacks, and that tool responses stay within bounded sizes.

pub mod limits;
pub mod path_validator;

pub use limits::{SizeLimitError, TRUNCATION_MARKER, ensure_file_size, truncate_text};
pub use path_validator::{PathSecurityError, resolve_path, validate_path};
