use std::io;
use std::path::{Component, Path, PathBuf};

use crate::core::config::Config;

/// Errors that can occur during path validation
#[derive(Debug, thiserror::Error)]
pub enum PathSecurityError {
    #[error("Path '{path}' is outside allowed root directory '{root}'")]
    OutsideRootDirectory { path: PathBuf, root: PathBuf },

    #[error("Symlink '{path}' points outside allowed root directory")]
    SymlinkOutsideRoot { path: PathBuf },

    #[error("Cannot canonicalize path '{path}': {error}")]
    CannotCanonicalize { path: PathBuf, error: io::Error },

    #[error("Path does not exist: '{path}'")]
    PathNotFound { path: PathBuf },

    #[error("IO error for path '{path}': {error}")]
    IoError { path: PathBuf, error: io::Error },
}

impl PathSecurityError {
    /// Whether the path was rejected for escaping the root (as opposed to not existing).
    pub fn is_escape(&self) -> bool {
        matches!(
            self,
            Self::OutsideRootDirectory { .. } | Self::SymlinkOutsideRoot { .. }
        )
    }
}

/// Validates that an existing path is within the configured security boundaries.
///
/// This function performs the following checks:
/// 1. Anchors relative input at the configured root (or the working directory)
/// 2. Canonicalizes the path to resolve `.`, `..`, and symlinks
/// 3. If a root path is configured, ensures the canonical path is within that root
/// 4. Handles symlinks according to the configured policy
///
/// # Arguments
///
/// * `input_path` - The path to validate (can be relative or absolute)
/// * `config` - The server configuration containing security settings
///
/// # Returns
///
/// * `Ok(PathBuf)` - The canonicalized, validated path
/// * `Err(PathSecurityError)` - If validation fails
///
/// # Examples
///
/// ```rust,ignore
/// let config = Config::from_env();
/// let safe_path = validate_path("docs/readme.md", &config)?;
/// ```
pub fn validate_path(input_path: &str, config: &Config) -> Result<PathBuf, PathSecurityError> {
    let path = anchor(input_path, config);

    // If no root path is configured, only do basic canonicalization
    let Some(ref root) = config.security.root_path else {
        return canonicalize_path(&path);
    };

    let canonical_root = canonical_root(root)?;

    // Check if path exists before canonicalization
    if !path.exists() && !path.is_symlink() {
        return Err(PathSecurityError::PathNotFound { path });
    }

    // Handle symlinks according to policy
    if path.is_symlink() && !config.security.allow_symlinks {
        let target = path.read_link().map_err(|e| PathSecurityError::IoError {
            path: path.clone(),
            error: e,
        })?;

        // Relative link targets are relative to the link's directory
        let target = match path.parent() {
            Some(parent) if target.is_relative() => parent.join(target),
            _ => target,
        };

        let canonical_target = canonicalize_path(&target)
            .map_err(|_| PathSecurityError::SymlinkOutsideRoot { path: path.clone() })?;

        if !is_within_root(&canonical_target, &canonical_root) {
            return Err(PathSecurityError::SymlinkOutsideRoot { path });
        }
    }

    let canonical_path = path.canonicalize().map_err(|e| PathSecurityError::CannotCanonicalize {
        path: path.clone(),
        error: e,
    })?;

    if !is_within_root(&canonical_path, &canonical_root) {
        // A link that passed the lexical check but resolves elsewhere
        if path.is_symlink() {
            return Err(PathSecurityError::SymlinkOutsideRoot { path });
        }
        return Err(PathSecurityError::OutsideRootDirectory {
            path: canonical_path,
            root: canonical_root,
        });
    }

    Ok(canonical_path)
}

/// Resolves a path that may not exist yet (write targets, new directories,
/// copy and move destinations) and checks it against the configured root.
///
/// The path is normalized lexically, then its deepest existing ancestor is
/// canonicalized so that symlinked parents cannot smuggle the final path
/// outside the root.
pub fn resolve_path(input_path: &str, config: &Config) -> Result<PathBuf, PathSecurityError> {
    let path = normalize_lexically(&anchor(input_path, config));

    let Some(ref root) = config.security.root_path else {
        return Ok(path);
    };

    let canonical_root = canonical_root(root)?;

    let (existing, remainder) = split_existing(&path)?;
    let canonical_existing =
        existing
            .canonicalize()
            .map_err(|e| PathSecurityError::CannotCanonicalize {
                path: existing.to_path_buf(),
                error: e,
            })?;
    // joining an empty remainder would append a trailing separator
    let resolved = if remainder.as_os_str().is_empty() {
        canonical_existing
    } else {
        canonical_existing.join(remainder)
    };

    if !is_within_root(&resolved, &canonical_root) {
        return Err(PathSecurityError::OutsideRootDirectory {
            path: resolved,
            root: canonical_root,
        });
    }

    Ok(resolved)
}

/// Joins relative input onto the root, or the working directory when no root is set.
fn anchor(input_path: &str, config: &Config) -> PathBuf {
    let path = Path::new(input_path);
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match config.security.root_path {
        Some(ref root) => root.join(path),
        None => std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf()),
    }
}

fn canonical_root(root: &Path) -> Result<PathBuf, PathSecurityError> {
    root.canonicalize().map_err(|e| PathSecurityError::IoError {
        path: root.to_path_buf(),
        error: e,
    })
}

/// Removes `.` components and folds `..` into its parent without touching the filesystem.
fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                // `..` at the root stays at the root
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => normalized.push(".."),
            },
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// Splits a path into its deepest existing ancestor and the remaining components.
fn split_existing(path: &Path) -> Result<(&Path, PathBuf), PathSecurityError> {
    for ancestor in path.ancestors() {
        if ancestor.as_os_str().is_empty() {
            break;
        }
        if ancestor.exists() {
            let remainder = path
                .strip_prefix(ancestor)
                .map(Path::to_path_buf)
                .unwrap_or_default();
            return Ok((ancestor, remainder));
        }
    }
    Err(PathSecurityError::PathNotFound {
        path: path.to_path_buf(),
    })
}

/// Checks if a path is within (or equal to) a root directory
fn is_within_root(path: &Path, root: &Path) -> bool {
    path.starts_with(root)
}

/// Canonicalizes a path, mapping a missing path to `PathNotFound`.
fn canonicalize_path(path: &Path) -> Result<PathBuf, PathSecurityError> {
    path.canonicalize().map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            PathSecurityError::PathNotFound {
                path: path.to_path_buf(),
            }
        } else {
            PathSecurityError::CannotCanonicalize {
                path: path.to_path_buf(),
                error: e,
            }
        }
    })
}
