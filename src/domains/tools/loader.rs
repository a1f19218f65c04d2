//! Tool Registry Loader.
//!
//! Scans a directory of tool manifests (`*.toml` or `*.json`), validates
//! each one, resolves its handler in the [`HandlerCatalog`] and registers
//! the resulting [`ToolDescriptor`]. A bad file never stops the others:
//! every problem becomes a [`LoadDiagnostic`] in the returned [`LoadReport`].
//!
//! A manifest carries exactly four fields:
//!
//! ```toml
//! name = "calculator"
//! description = "Perform basic mathematical calculations"
//! handler = "calculator"
//!
//! [parameters.operation]
//! type = "string"
//! enum = ["add", "subtract", "multiply", "divide"]
//! ```

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use rmcp::model::JsonObject;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::catalog::HandlerCatalog;
use super::descriptor::{OPTIONAL_KEY, ToolDescriptor, ToolRegistrar};

/// File extensions recognised as tool manifests.
pub const TOOL_FILE_EXTENSIONS: &[&str] = &["toml", "json"];

// ============================================================================
// Manifest
// ============================================================================

/// The validated contents of a tool manifest.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolManifest {
    pub name: String,
    pub description: String,
    pub parameters: JsonObject,
    /// Identifier of the implementation in the handler catalog.
    pub handler: String,
}

/// Why a parsed manifest is not a usable tool.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidToolFormat {
    #[error("expected a table of fields, found {0}")]
    NotATable(&'static str),

    #[error("{}", .0.join("; "))]
    Fields(Vec<String>),

    #[error("handler `{0}` is not a known callable")]
    UnknownHandler(String),
}

impl ToolManifest {
    /// Validate a parsed manifest.
    ///
    /// Every field problem is collected, not just the first one.
    pub fn from_value(value: Value) -> Result<Self, InvalidToolFormat> {
        let Value::Object(mut fields) = value else {
            return Err(InvalidToolFormat::NotATable(kind_of(&value)));
        };

        let mut problems = Vec::new();
        let name = take_string(&mut fields, "name", &mut problems);
        let description = take_string(&mut fields, "description", &mut problems);
        let handler = take_string(&mut fields, "handler", &mut problems);
        let parameters = take_parameters(&mut fields, &mut problems);

        if let Some(ref name) = name {
            if name.trim().is_empty() {
                problems.push("`name` must not be empty".to_string());
            }
        }
        if let Some(ref handler) = handler {
            if handler.trim().is_empty() {
                problems.push("`handler` must not be empty".to_string());
            }
        }

        match (name, description, parameters, handler) {
            (Some(name), Some(description), Some(parameters), Some(handler))
                if problems.is_empty() =>
            {
                Ok(Self {
                    name,
                    description,
                    parameters,
                    handler,
                })
            }
            _ => Err(InvalidToolFormat::Fields(problems)),
        }
    }

    /// Parse manifest text according to the file's extension.
    pub fn parse(extension: &str, contents: &str) -> Result<Value, String> {
        match extension {
            "toml" => toml::from_str::<Value>(contents).map_err(|e| e.to_string()),
            "json" => serde_json::from_str::<Value>(contents).map_err(|e| e.to_string()),
            other => Err(format!("unsupported manifest extension `{}`", other)),
        }
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "a table",
    }
}

fn take_string(fields: &mut JsonObject, key: &str, problems: &mut Vec<String>) -> Option<String> {
    match fields.remove(key) {
        Some(Value::String(s)) => Some(s),
        Some(other) => {
            problems.push(format!("`{}` must be a string, found {}", key, kind_of(&other)));
            None
        }
        None => {
            problems.push(format!("`{}` is missing", key));
            None
        }
    }
}

fn take_parameters(fields: &mut JsonObject, problems: &mut Vec<String>) -> Option<JsonObject> {
    match fields.remove("parameters") {
        Some(Value::Object(parameters)) => {
            let before = problems.len();
            for (name, fragment) in &parameters {
                if !fragment.is_object() {
                    problems.push(format!(
                        "parameter `{}` must be a table, found {}",
                        name,
                        kind_of(fragment)
                    ));
                }
            }
            (problems.len() == before).then_some(parameters)
        }
        Some(other) => {
            problems.push(format!(
                "`parameters` must be a table, found {}",
                kind_of(&other)
            ));
            None
        }
        None => {
            problems.push("`parameters` is missing".to_string());
            None
        }
    }
}

// ============================================================================
// Diagnostics
// ============================================================================

/// A non-fatal problem found while loading the tools directory.
#[derive(Debug, Error)]
pub enum LoadDiagnostic {
    #[error("Tools directory does not exist: {}", .path.display())]
    MissingDirectory { path: PathBuf },

    #[error("Failed to read tools directory {}: {error}", .path.display())]
    UnreadableDirectory { path: PathBuf, error: String },

    #[error(
        "Invalid tool format in file: {file}. Required exports: name, description, parameters, handler ({reason})"
    )]
    InvalidFormat {
        file: String,
        reason: InvalidToolFormat,
    },

    #[error("Failed to load tool from {file}: {error}")]
    LoadFailed { file: String, error: String },
}

impl LoadDiagnostic {
    /// The file the diagnostic is about, if it concerns a single file.
    pub fn file(&self) -> Option<&str> {
        match self {
            Self::InvalidFormat { file, .. } | Self::LoadFailed { file, .. } => Some(file),
            Self::MissingDirectory { .. } | Self::UnreadableDirectory { .. } => None,
        }
    }
}

/// Outcome of one pass over the tools directory.
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Names registered, in the order they were registered.
    pub registered: Vec<String>,
    pub diagnostics: Vec<LoadDiagnostic>,
}

impl LoadReport {
    /// True when every candidate file loaded.
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

impl fmt::Display for LoadReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} tool(s) registered, {} problem(s)",
            self.registered.len(),
            self.diagnostics.len()
        )
    }
}

// ============================================================================
// Loader
// ============================================================================

/// Loads tool manifests from one directory.
#[derive(Clone)]
pub struct ToolLoader {
    dir: PathBuf,
    catalog: HandlerCatalog,
}

impl ToolLoader {
    pub fn new(dir: impl Into<PathBuf>, catalog: HandlerCatalog) -> Self {
        Self {
            dir: dir.into(),
            catalog,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Load every manifest in the directory and register the valid ones.
    ///
    /// Files are processed one at a time in directory order. This never
    /// fails; problems are reported in the returned [`LoadReport`].
    pub async fn load<R>(&self, registrar: &mut R) -> LoadReport
    where
        R: ToolRegistrar + ?Sized,
    {
        let mut report = LoadReport::default();

        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) => {
                let diagnostic = if e.kind() == io::ErrorKind::NotFound {
                    LoadDiagnostic::MissingDirectory {
                        path: self.dir.clone(),
                    }
                } else {
                    LoadDiagnostic::UnreadableDirectory {
                        path: self.dir.clone(),
                        error: e.to_string(),
                    }
                };
                warn!("{}", diagnostic);
                report.diagnostics.push(diagnostic);
                return report;
            }
        };

        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) => {
                    let diagnostic = LoadDiagnostic::UnreadableDirectory {
                        path: self.dir.clone(),
                        error: e.to_string(),
                    };
                    warn!("{}", diagnostic);
                    report.diagnostics.push(diagnostic);
                    break;
                }
            };

            let path = entry.path();
            let Some(extension) = manifest_extension(&path) else {
                debug!("Ignoring {}", path.display());
                continue;
            };
            if !tokio::fs::metadata(&path).await.is_ok_and(|m| m.is_file()) {
                debug!("Ignoring non-file {}", path.display());
                continue;
            }

            match self.load_file(&path, extension).await {
                Ok(descriptor) => {
                    info!("Registered tool: {}", descriptor.name);
                    report.registered.push(descriptor.name.clone());
                    registrar.register(descriptor);
                }
                Err(diagnostic) => {
                    warn!("{}", diagnostic);
                    report.diagnostics.push(diagnostic);
                }
            }
        }

        info!("Loaded tools from {}: {}", self.dir.display(), report);
        report
    }

    async fn load_file(&self, path: &Path, extension: &str) -> Result<ToolDescriptor, LoadDiagnostic> {
        let file = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| LoadDiagnostic::LoadFailed {
                file: file.clone(),
                error: e.to_string(),
            })?;

        let value = ToolManifest::parse(extension, &contents).map_err(|error| {
            LoadDiagnostic::LoadFailed {
                file: file.clone(),
                error,
            }
        })?;

        ToolManifest::from_value(value)
            .and_then(|manifest| self.descriptor(manifest))
            .map_err(|reason| LoadDiagnostic::InvalidFormat { file, reason })
    }

    /// Resolve a manifest's handler and build its descriptor.
    pub fn descriptor(&self, manifest: ToolManifest) -> Result<ToolDescriptor, InvalidToolFormat> {
        let entry = self
            .catalog
            .get(&manifest.handler)
            .map_err(|_| InvalidToolFormat::UnknownHandler(manifest.handler.clone()))?;

        for name in manifest.parameters.keys() {
            if !entry.accepts_parameter(name) {
                warn!(
                    "Tool {} declares parameter `{}` that handler `{}` does not accept",
                    manifest.name, name, manifest.handler
                );
            }
        }

        Ok(ToolDescriptor::new(
            manifest.name,
            manifest.description,
            manifest.parameters,
            entry.handler.clone(),
        ))
    }
}

/// The manifest extension of `path`, if it has one.
fn manifest_extension(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?;
    TOOL_FILE_EXTENSIONS
        .iter()
        .copied()
        .find(|known| *known == extension)
}

/// Whether a manifest parameter is optional for the client.
pub fn is_optional(fragment: &Value) -> bool {
    fragment
        .get(OPTIONAL_KEY)
        .and_then(Value::as_bool)
        .unwrap_or(false)
        || fragment.get("default").is_some()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Config;
    use crate::domains::tools::definitions::common::first_text;
    use rmcp::handler::server::tool::ToolRouter;
    use serde_json::json;
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;

    const CALCULATOR_TOML: &str = r#"
name = "calculator"
description = "Perform basic mathematical calculations"
handler = "calculator"

[parameters.operation]
type = "string"
enum = ["add", "subtract", "multiply", "divide"]

[parameters.a]
type = "number"

[parameters.b]
type = "number"
"#;

    const ECHO_JSON: &str = r#"{
        "name": "file_echo",
        "description": "Echo a message",
        "handler": "file_echo",
        "parameters": { "message": { "type": "string" } }
    }"#;

    /// Records registrations in order.
    #[derive(Default)]
    struct Recorder {
        tools: Vec<ToolDescriptor>,
    }

    impl ToolRegistrar for Recorder {
        fn register(&mut self, descriptor: ToolDescriptor) {
            self.tools.push(descriptor);
        }
    }

    impl Recorder {
        fn names(&self) -> Vec<&str> {
            let mut names: Vec<_> = self.tools.iter().map(|t| t.name.as_str()).collect();
            names.sort_unstable();
            names
        }
    }

    fn loader(dir: &Path) -> ToolLoader {
        ToolLoader::new(dir, HandlerCatalog::builtin(Arc::new(Config::default())))
    }

    fn write(dir: &Path, file: &str, contents: &str) {
        fs::write(dir.join(file), contents).unwrap();
    }

    // ------------------------------------------------------------------
    // Manifest validation
    // ------------------------------------------------------------------

    #[test]
    fn test_from_value_valid() {
        let manifest = ToolManifest::from_value(json!({
            "name": "greet",
            "description": "Say hello",
            "parameters": {},
            "handler": "file_echo"
        }))
        .unwrap();
        assert_eq!(manifest.name, "greet");
        assert!(manifest.parameters.is_empty());
    }

    #[test]
    fn test_from_value_collects_every_problem() {
        let err = ToolManifest::from_value(json!({
            "name": 7,
            "parameters": "none",
            "handler": "x"
        }))
        .unwrap_err();
        let InvalidToolFormat::Fields(problems) = err else {
            panic!("Expected field problems");
        };
        assert_eq!(
            problems,
            vec![
                "`name` must be a string, found a number",
                "`description` is missing",
                "`parameters` must be a table, found a string",
            ]
        );
    }

    #[test]
    fn test_from_value_rejects_non_table() {
        assert_eq!(
            ToolManifest::from_value(json!([1, 2])),
            Err(InvalidToolFormat::NotATable("an array"))
        );
    }

    #[test]
    fn test_from_value_rejects_primitive_fragment() {
        let err = ToolManifest::from_value(json!({
            "name": "t",
            "description": "d",
            "parameters": { "path": "string" },
            "handler": "read_file"
        }))
        .unwrap_err();
        assert!(err.to_string().contains("parameter `path` must be a table"));
    }

    #[test]
    fn test_from_value_rejects_empty_name() {
        let err = ToolManifest::from_value(json!({
            "name": "  ",
            "description": "d",
            "parameters": {},
            "handler": "file_echo"
        }))
        .unwrap_err();
        assert_eq!(err.to_string(), "`name` must not be empty");
    }

    #[test]
    fn test_parse_by_extension() {
        let toml_value = ToolManifest::parse("toml", CALCULATOR_TOML).unwrap();
        assert_eq!(toml_value["parameters"]["a"]["type"], "number");

        let json_value = ToolManifest::parse("json", ECHO_JSON).unwrap();
        assert_eq!(json_value["handler"], "file_echo");

        assert!(ToolManifest::parse("json", "{ not json").is_err());
        assert!(ToolManifest::parse("yaml", "a: b").is_err());
    }

    #[test]
    fn test_is_optional() {
        assert!(is_optional(&json!({ "type": "string", "optional": true })));
        assert!(is_optional(&json!({ "type": "integer", "default": 3 })));
        assert!(!is_optional(&json!({ "type": "string" })));
    }

    // ------------------------------------------------------------------
    // Directory loading
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn test_valid_directory_registers_every_tool() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "calculator.toml", CALCULATOR_TOML);
        write(temp_dir.path(), "echo.json", ECHO_JSON);

        let mut recorder = Recorder::default();
        let report = loader(temp_dir.path()).load(&mut recorder).await;

        assert!(report.is_clean());
        assert_eq!(recorder.names(), vec!["calculator", "file_echo"]);
        let mut registered = report.registered.clone();
        registered.sort();
        assert_eq!(registered, vec!["calculator", "file_echo"]);
    }

    #[tokio::test]
    async fn test_mixed_directory_registers_only_valid() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "calculator.toml", CALCULATOR_TOML);
        write(
            temp_dir.path(),
            "no_handler.toml",
            "name = \"x\"\ndescription = \"y\"\n[parameters]\n",
        );
        write(
            temp_dir.path(),
            "unknown_handler.json",
            r#"{"name":"x","description":"y","parameters":{},"handler":"teleport"}"#,
        );
        write(temp_dir.path(), "README.md", "# not a tool");
        fs::create_dir(temp_dir.path().join("nested.toml")).unwrap();

        let mut recorder = Recorder::default();
        let report = loader(temp_dir.path()).load(&mut recorder).await;

        assert_eq!(recorder.names(), vec!["calculator"]);
        assert_eq!(report.diagnostics.len(), 2);
        for diagnostic in &report.diagnostics {
            assert!(matches!(diagnostic, LoadDiagnostic::InvalidFormat { .. }));
        }
        let unknown = report
            .diagnostics
            .iter()
            .find(|d| d.file() == Some("unknown_handler.json"))
            .unwrap();
        assert!(unknown.to_string().contains("handler `teleport` is not a known callable"));
    }

    #[tokio::test]
    async fn test_missing_directory_is_one_diagnostic() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("does-not-exist");

        let mut recorder = Recorder::default();
        let report = loader(&missing).load(&mut recorder).await;

        assert!(recorder.tools.is_empty());
        assert!(report.registered.is_empty());
        assert_eq!(report.diagnostics.len(), 1);
        match &report.diagnostics[0] {
            LoadDiagnostic::MissingDirectory { path } => assert_eq!(path, &missing),
            other => panic!("Expected MissingDirectory, got {other:?}"),
        }
        assert!(
            report.diagnostics[0]
                .to_string()
                .contains(&missing.display().to_string())
        );
    }

    #[tokio::test]
    async fn test_unparseable_file_does_not_stop_later_files() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "a_broken.json", "{ \"name\": ");
        write(temp_dir.path(), "b_broken.toml", "name = = \"x\"");
        write(temp_dir.path(), "c_calculator.toml", CALCULATOR_TOML);

        let mut recorder = Recorder::default();
        let report = loader(temp_dir.path()).load(&mut recorder).await;

        assert_eq!(recorder.names(), vec!["calculator"]);
        assert_eq!(report.diagnostics.len(), 2);
        for diagnostic in &report.diagnostics {
            assert!(matches!(diagnostic, LoadDiagnostic::LoadFailed { .. }));
            assert!(diagnostic.to_string().starts_with("Failed to load tool from"));
        }
    }

    #[tokio::test]
    async fn test_reload_is_idempotent() {
        struct TestServer {}

        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "calculator.toml", CALCULATOR_TOML);
        write(temp_dir.path(), "echo.json", ECHO_JSON);
        let loader = loader(temp_dir.path());

        let mut router: ToolRouter<TestServer> = ToolRouter::new();
        let first = loader.load(&mut router).await;
        let second = loader.load(&mut router).await;

        assert_eq!(first.registered.len(), 2);
        assert_eq!(second.registered.len(), 2);
        let mut names: Vec<String> = router.list_all().into_iter().map(|t| t.name.to_string()).collect();
        names.sort();
        assert_eq!(names, vec!["calculator", "file_echo"]);
    }

    #[tokio::test]
    async fn test_calculator_and_broken_scenario() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "calculator.toml", CALCULATOR_TOML);
        write(
            temp_dir.path(),
            "broken.toml",
            "name = \"broken\"\ndescription = \"no handler\"\n[parameters]\n",
        );

        let mut recorder = Recorder::default();
        let report = loader(temp_dir.path()).load(&mut recorder).await;

        assert_eq!(report.registered, vec!["calculator"]);
        assert_eq!(report.diagnostics.len(), 1);
        let message = report.diagnostics[0].to_string();
        assert!(message.starts_with("Invalid tool format in file: broken.toml"));
        assert!(message.contains("`handler` is missing"));

        let calculator = &recorder.tools[0];
        let schema = calculator.input_schema();
        assert_eq!(schema["required"].as_array().unwrap().len(), 3);

        let args = json!({ "operation": "divide", "a": 10, "b": 0 })
            .as_object()
            .unwrap()
            .clone();
        let result = (calculator.handler)(args).await.unwrap();
        assert!(result.is_error.unwrap_or(false));
        assert_eq!(
            first_text(&result),
            Some("Error: Division by zero is not allowed")
        );
    }

    #[tokio::test]
    async fn test_registered_handler_rejects_malformed_arguments() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "calculator.toml", CALCULATOR_TOML);

        let mut recorder = Recorder::default();
        loader(temp_dir.path()).load(&mut recorder).await;

        let args = json!({ "operation": "divide", "a": "ten" })
            .as_object()
            .unwrap()
            .clone();
        let err = (recorder.tools[0].handler)(args).await.unwrap_err();
        assert_eq!(err.code, rmcp::model::ErrorCode::INVALID_PARAMS);
    }

    // ------------------------------------------------------------------
    // Bundled manifests
    // ------------------------------------------------------------------

    fn bundled_dir() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("tools")
    }

    #[tokio::test]
    async fn test_bundled_manifests_load_cleanly() {
        let catalog = HandlerCatalog::builtin(Arc::new(Config::default()));
        let expected = catalog.len();

        let mut recorder = Recorder::default();
        let report = ToolLoader::new(bundled_dir(), catalog).load(&mut recorder).await;

        assert!(report.is_clean(), "diagnostics: {:?}", report.diagnostics);
        assert_eq!(report.registered.len(), expected);
    }

    #[test]
    fn test_bundled_manifests_match_handler_schemas() {
        let catalog = HandlerCatalog::builtin(Arc::new(Config::default()));

        for entry in fs::read_dir(bundled_dir()).unwrap() {
            let path = entry.unwrap().path();
            let Some(extension) = manifest_extension(&path) else {
                continue;
            };
            let contents = fs::read_to_string(&path).unwrap();
            let manifest =
                ToolManifest::from_value(ToolManifest::parse(extension, &contents).unwrap())
                    .unwrap();
            let handler = catalog.get(&manifest.handler).unwrap();

            for name in manifest.parameters.keys() {
                assert!(
                    handler.accepts_parameter(name),
                    "{}: handler does not accept `{}`",
                    path.display(),
                    name
                );
            }

            let required = handler
                .schema
                .get("required")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default();
            for name in required.iter().filter_map(Value::as_str) {
                let fragment = manifest.parameters.get(name).unwrap_or_else(|| {
                    panic!("{}: required `{}` not declared", path.display(), name)
                });
                assert!(
                    !is_optional(fragment),
                    "{}: required `{}` marked optional",
                    path.display(),
                    name
                );
            }
        }
    }
}
