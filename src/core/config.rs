//! Configuration management for the MCP server.
//!
//! This module provides a centralized configuration structure that can be
//! populated from environment variables or defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::error::{Error, Result};

/// Default directory scanned for tool manifests.
pub const DEFAULT_TOOLS_DIR: &str = "tools";

/// Default upper bound for a single file read by a tool (100 KB).
pub const DEFAULT_MAX_READ_BYTES: u64 = 100 * 1024;

/// Main configuration structure for the MCP server.
///
/// This struct contains all configurable aspects of the server, organized
/// by concern for clarity and maintainability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Tool discovery configuration.
    pub tools: ToolsConfig,

    /// Security and path validation configuration.
    pub security: SecurityConfig,

    /// Size limits applied by the tools.
    pub limits: LimitsConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,

    /// Instructions sent to clients during initialization.
    pub instructions: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,
}

/// Tool discovery configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// Directory holding the tool manifests.
    ///
    /// A relative value is resolved against the process working directory.
    pub dir: PathBuf,
}

/// Configuration for security and path validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Optional root directory for path operations.
    /// If None, no path restrictions are enforced.
    /// All file system operations will be validated against this root.
    pub root_path: Option<PathBuf>,

    /// Whether to allow symlinks in path validation.
    /// If true, symlinks are followed and their targets are validated.
    /// If false, symlinks pointing outside the root are rejected.
    pub allow_symlinks: bool,
}

/// Size limits shared by the file tools.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Largest file, in bytes, that `read_file` will return.
    pub max_read_bytes: u64,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            root_path: None,
            allow_symlinks: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                instructions: "These tools communicate with a reference Model Context Protocol (MCP) server."
                    .to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
            tools: ToolsConfig {
                dir: PathBuf::from(DEFAULT_TOOLS_DIR),
            },
            security: SecurityConfig::default(),
            limits: LimitsConfig {
                max_read_bytes: DEFAULT_MAX_READ_BYTES,
            },
        }
    }
}

impl ToolsConfig {
    /// The tools directory as an absolute path, anchored at the working directory.
    pub fn resolved_dir(&self) -> PathBuf {
        resolve_against_cwd(&self.dir)
    }
}

fn resolve_against_cwd(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match std::env::current_dir() {
        Ok(cwd) => cwd.join(path),
        Err(e) => {
            warn!("Cannot determine working directory ({}), using {:?} as is", e, path);
            path.to_path_buf()
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Environment variables are expected to be prefixed with `MCP_`.
    /// For example: `MCP_SERVER_NAME`, `MCP_LOG_LEVEL`, `MCP_TOOLS_DIR`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(instructions) = std::env::var("MCP_SERVER_INSTRUCTIONS") {
            config.server.instructions = instructions;
        }

        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Ok(dir) = std::env::var("MCP_TOOLS_DIR") {
            config.tools.dir = PathBuf::from(dir);
        }

        // Without an explicit root, tools are confined to the working directory
        if let Ok(root_path) = std::env::var("MCP_ROOT_PATH") {
            config.security.root_path = Some(PathBuf::from(root_path));
            info!("Path security enabled: root directory set to {:?}", config.security.root_path);
        } else {
            match std::env::current_dir() {
                Ok(cwd) => {
                    info!("MCP_ROOT_PATH not set - confining paths to working directory {:?}", cwd);
                    config.security.root_path = Some(cwd);
                }
                Err(e) => {
                    warn!(
                        "MCP_ROOT_PATH not set and working directory unavailable ({}) - \
                         no path restrictions active.",
                        e
                    );
                }
            }
        }

        if let Ok(allow_symlinks) = std::env::var("MCP_ALLOW_SYMLINKS") {
            config.security.allow_symlinks = allow_symlinks.parse().unwrap_or(true);
            info!("Symlinks allowed: {}", config.security.allow_symlinks);
        }

        if let Ok(max) = std::env::var("MCP_MAX_READ_BYTES") {
            match max.parse() {
                Ok(bytes) => config.limits.max_read_bytes = bytes,
                Err(e) => warn!("Ignoring invalid MCP_MAX_READ_BYTES '{}': {}", max, e),
            }
        }

        config
    }

    /// Reject configurations the server cannot start with.
    pub fn validate(&self) -> Result<()> {
        if self.server.name.trim().is_empty() {
            return Err(Error::config("server name must not be empty"));
        }
        if self.limits.max_read_bytes == 0 {
            return Err(Error::config("max_read_bytes must be greater than zero"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Mutex to ensure env var tests run serially
    static ENV_TEST_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_tools_dir_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("MCP_TOOLS_DIR", "/opt/mcp/tools");
        }
        let config = Config::from_env();
        assert_eq!(config.tools.dir, PathBuf::from("/opt/mcp/tools"));
        assert_eq!(config.tools.resolved_dir(), PathBuf::from("/opt/mcp/tools"));
        unsafe {
            std::env::remove_var("MCP_TOOLS_DIR");
        }
    }

    #[test]
    fn test_root_defaults_to_working_directory() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::remove_var("MCP_ROOT_PATH");
        }
        let config = Config::from_env();
        assert_eq!(config.security.root_path, std::env::current_dir().ok());
    }

    #[test]
    fn test_invalid_max_read_bytes_is_ignored() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("MCP_MAX_READ_BYTES", "lots");
        }
        let config = Config::from_env();
        assert_eq!(config.limits.max_read_bytes, DEFAULT_MAX_READ_BYTES);
        unsafe {
            std::env::remove_var("MCP_MAX_READ_BYTES");
        }
    }

    #[test]
    fn test_relative_tools_dir_resolves_against_cwd() {
        let config = Config::default();
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(config.tools.resolved_dir(), cwd.join(DEFAULT_TOOLS_DIR));
    }

    #[test]
    fn test_validate() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.server.name = "  ".to_string();
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        let mut config = Config::default();
        config.limits.max_read_bytes = 0;
        assert!(config.validate().is_err());
    }
}
