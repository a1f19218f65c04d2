//! Tool descriptors and the registration seam.
//!
//! A [`ToolDescriptor`] is the four-field record every tool is reduced to
//! before it reaches the server: name, description, parameter schema and an
//! async handler. Anything implementing [`ToolRegistrar`] can receive them;
//! the rmcp [`ToolRouter`] is the production registrar.

use std::collections::HashSet;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, ToolRouter},
    model::{CallToolResult, JsonObject, Tool},
};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::error::ToolError;

/// Non-standard schema key marking a parameter as optional.
///
/// It is stripped when the descriptor is rendered as an MCP input schema.
pub const OPTIONAL_KEY: &str = "optional";

/// Shared async handler invoked with the raw call arguments.
pub type ToolHandlerFn =
    Arc<dyn Fn(JsonObject) -> BoxFuture<'static, Result<CallToolResult, McpError>> + Send + Sync>;

/// A validated, dispatchable tool.
#[derive(Clone)]
pub struct ToolDescriptor {
    /// Dispatch key.
    pub name: String,
    /// Human-readable description shown to clients.
    pub description: String,
    /// Parameter name → JSON-Schema property fragment.
    pub parameters: JsonObject,
    /// The tool implementation.
    pub handler: ToolHandlerFn,
}

impl fmt::Debug for ToolDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolDescriptor")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("parameters", &self.parameters)
            .finish_non_exhaustive()
    }
}

impl ToolDescriptor {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: JsonObject,
        handler: ToolHandlerFn,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
            handler,
        }
    }

    /// Render the parameters as an MCP `inputSchema` object.
    ///
    /// Parameters flagged `optional` or carrying a `default` are left out of
    /// `required`; every other parameter is required.
    pub fn input_schema(&self) -> JsonObject {
        let mut properties = JsonObject::new();
        let mut required = Vec::new();

        for (name, fragment) in &self.parameters {
            let mut fragment = fragment.clone();
            let optional = match fragment.as_object_mut() {
                Some(fields) => {
                    let flagged = fields
                        .remove(OPTIONAL_KEY)
                        .and_then(|v| v.as_bool())
                        .unwrap_or(false);
                    flagged || fields.contains_key("default")
                }
                None => false,
            };
            if !optional {
                required.push(Value::String(name.clone()));
            }
            properties.insert(name.clone(), fragment);
        }

        let mut schema = JsonObject::new();
        schema.insert("type".into(), Value::String("object".into()));
        schema.insert("properties".into(), Value::Object(properties));
        if !required.is_empty() {
            schema.insert("required".into(), Value::Array(required));
        }
        schema
    }

    /// Create a Tool model for this descriptor (metadata).
    pub fn to_tool(&self) -> Tool {
        Tool {
            name: self.name.clone().into(),
            description: Some(self.description.clone().into()),
            input_schema: Arc::new(self.input_schema()),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }

    /// Create a ToolRoute dispatching to this descriptor's handler.
    pub fn into_route<S>(self) -> ToolRoute<S>
    where
        S: Send + Sync + 'static,
    {
        let tool = self.to_tool();
        let handler = self.handler;
        ToolRoute::new_dyn(tool, move |ctx: ToolCallContext<'_, S>| {
            let args = ctx.arguments.clone().unwrap_or_default();
            let handler = handler.clone();
            async move { handler(args).await }.boxed()
        })
    }
}

/// Anything tools can be registered with.
pub trait ToolRegistrar {
    /// Register a tool. A later registration under the same name replaces the earlier one.
    fn register(&mut self, descriptor: ToolDescriptor);
}

impl<S> ToolRegistrar for ToolRouter<S>
where
    S: Send + Sync + 'static,
{
    fn register(&mut self, descriptor: ToolDescriptor) {
        self.add_route(descriptor.into_route());
    }
}

/// Wrap a typed tool function into a [`ToolHandlerFn`].
///
/// Arguments that fail to deserialize into `P` are reported as MCP
/// `invalid_params` errors; everything else is up to `run`.
pub fn typed_handler<P, F, Fut>(run: F) -> ToolHandlerFn
where
    P: DeserializeOwned + Send + 'static,
    F: Fn(P) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = CallToolResult> + Send + 'static,
{
    let run = Arc::new(run);
    Arc::new(move |arguments: JsonObject| {
        let run = run.clone();
        async move {
            let params = parse_arguments::<P>(arguments)?;
            Ok::<_, McpError>(run(params).await)
        }
        .boxed()
    })
}

/// Deserialize call arguments into a parameter struct.
pub fn parse_arguments<P: DeserializeOwned>(arguments: JsonObject) -> Result<P, ToolError> {
    serde_json::from_value(Value::Object(arguments))
        .map_err(|e| ToolError::invalid_arguments(e.to_string()))
}

/// Convert a generated JSON schema into a parameter map.
///
/// Properties absent from the schema's `required` list are flagged optional.
pub fn parameters_from_schema(schema: &JsonObject) -> JsonObject {
    let required: HashSet<&str> = schema
        .get("required")
        .and_then(Value::as_array)
        .map(|names| names.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    let mut parameters = JsonObject::new();
    if let Some(properties) = schema.get("properties").and_then(Value::as_object) {
        for (name, fragment) in properties {
            let mut fragment = fragment.clone();
            if !required.contains(name.as_str()) {
                if let Some(fields) = fragment.as_object_mut() {
                    fields.insert(OPTIONAL_KEY.into(), Value::Bool(true));
                }
            }
            parameters.insert(name.clone(), fragment);
        }
    }
    parameters
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::model::Content;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Deserialize)]
    struct GreetParams {
        who: String,
    }

    fn greet_descriptor() -> ToolDescriptor {
        let parameters = json!({
            "who": { "type": "string" },
            "loud": { "type": "boolean", "optional": true },
            "times": { "type": "integer", "default": 1 }
        });
        ToolDescriptor::new(
            "greet",
            "Say hello",
            parameters.as_object().unwrap().clone(),
            typed_handler(|params: GreetParams| async move {
                CallToolResult::success(vec![Content::text(format!("hello {}", params.who))])
            }),
        )
    }

    fn text_of(result: &CallToolResult) -> &str {
        match &result.content[0].raw {
            rmcp::model::RawContent::Text(text) => &text.text,
            _ => panic!("Expected text content"),
        }
    }

    #[test]
    fn test_input_schema_required_and_optional() {
        let schema = greet_descriptor().input_schema();
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["required"], json!(["who"]));
        assert!(schema["properties"]["loud"].get(OPTIONAL_KEY).is_none());
        assert_eq!(schema["properties"]["times"]["default"], 1);
    }

    #[test]
    fn test_empty_parameters_have_no_required() {
        let descriptor = ToolDescriptor::new(
            "noop",
            "Nothing",
            JsonObject::new(),
            typed_handler(|_: JsonObject| async { CallToolResult::success(vec![]) }),
        );
        let schema = descriptor.input_schema();
        assert!(schema.get("required").is_none());
        assert_eq!(schema["properties"], json!({}));
    }

    #[test]
    fn test_to_tool_metadata() {
        let tool = greet_descriptor().to_tool();
        assert_eq!(tool.name, "greet");
        assert_eq!(tool.description.as_deref(), Some("Say hello"));
        assert_eq!(tool.input_schema["required"], json!(["who"]));
    }

    #[tokio::test]
    async fn test_typed_handler_dispatch() {
        let descriptor = greet_descriptor();
        let args = json!({ "who": "world" }).as_object().unwrap().clone();
        let result = (descriptor.handler)(args).await.unwrap();
        assert_eq!(text_of(&result), "hello world");
    }

    #[tokio::test]
    async fn test_typed_handler_rejects_bad_arguments() {
        let descriptor = greet_descriptor();
        let args = json!({ "who": 42 }).as_object().unwrap().clone();
        let err = (descriptor.handler)(args).await.unwrap_err();
        assert!(err.message.contains("Invalid arguments"));
    }

    #[test]
    fn test_router_registration_replaces_by_name() {
        struct TestServer {}

        let mut router: ToolRouter<TestServer> = ToolRouter::new();
        router.register(greet_descriptor());
        let mut replacement = greet_descriptor();
        replacement.description = "Say hello again".to_string();
        router.register(replacement);

        let tools = router.list_all();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].description.as_deref(), Some("Say hello again"));
    }

    #[test]
    fn test_parameters_from_schema_flags_optional() {
        let schema = json!({
            "type": "object",
            "properties": {
                "path": { "type": "string" },
                "recursive": { "type": "boolean", "default": false }
            },
            "required": ["path"]
        });
        let parameters = parameters_from_schema(schema.as_object().unwrap());
        assert!(parameters["path"].get(OPTIONAL_KEY).is_none());
        assert_eq!(parameters["recursive"][OPTIONAL_KEY], true);
    }
}
