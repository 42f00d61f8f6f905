//! Tool Registry - central registration and dispatch for all tools.
//!
//! This module provides:
//! - A fixed, ordered set of tools built once at startup
//! - Tool metadata for `tools/list`
//! - Name-based dispatch for `tools/call`

use std::sync::Arc;

use rmcp::model::{JsonObject, Tool};
use tracing::{info, instrument, warn};

use super::definitions::PositionsTool;
use super::{ToolError, ToolHandler};
use crate::core::config::Config;

// ============================================================================
// Tool Registry
// ============================================================================

/// Tool registry - manages all available tools.
///
/// Contents are fixed once construction finishes; the registry is shared by
/// reference (`Arc<ToolRegistry>`) with every transport.
pub struct ToolRegistry {
    tools: Vec<Arc<dyn ToolHandler>>,
}

impl ToolRegistry {
    /// Create the registry with every built-in tool.
    pub fn new(config: &Config) -> Self {
        Self::empty().with_tool(Arc::new(PositionsTool::new(&config.api)))
    }

    /// Create a registry with no tools.
    pub fn empty() -> Self {
        Self { tools: Vec::new() }
    }

    /// Add a tool. A tool whose name is already registered is ignored.
    pub fn with_tool(mut self, tool: Arc<dyn ToolHandler>) -> Self {
        if self.get(tool.name()).is_some() {
            warn!("Tool already registered, ignoring: {}", tool.name());
            return self;
        }

        info!("Registering tool: {}", tool.name());
        self.tools.push(tool);
        self
    }

    /// Get all tool names, in registration order.
    pub fn tool_names(&self) -> Vec<&'static str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    /// Get all tools as Tool models (metadata), in registration order.
    pub fn list(&self) -> Vec<Tool> {
        self.tools.iter().map(|t| t.tool()).collect()
    }

    /// Look up a tool by name.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn ToolHandler>> {
        self.tools.iter().find(|t| t.name() == name)
    }

    /// Dispatch a call to the named tool and return its text unchanged.
    #[instrument(skip(self, arguments))]
    pub async fn invoke(&self, name: &str, arguments: JsonObject) -> Result<String, ToolError> {
        let Some(tool) = self.get(name) else {
            warn!("Unknown tool requested: {}", name);
            return Err(ToolError::not_found(name));
        };

        Ok(tool.execute(arguments).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct EchoTool(&'static str);

    #[async_trait]
    impl ToolHandler for EchoTool {
        fn name(&self) -> &'static str {
            self.0
        }

        fn tool(&self) -> Tool {
            Tool {
                name: self.0.into(),
                description: Some("echo".into()),
                input_schema: Arc::new(JsonObject::new()),
                annotations: None,
                output_schema: None,
                icons: None,
                meta: None,
                title: None,
            }
        }

        async fn execute(&self, arguments: JsonObject) -> String {
            serde_json::Value::Object(arguments).to_string()
        }
    }

    #[test]
    fn test_registry_tool_names() {
        let registry = ToolRegistry::new(&Config::default());
        assert_eq!(registry.tool_names(), vec!["get_positions"]);
    }

    #[test]
    fn test_registry_list() {
        let registry = ToolRegistry::new(&Config::default());
        let tools = registry.list();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].name, PositionsTool::NAME);
        assert!(tools[0].description.is_some());
    }

    #[test]
    fn test_registry_keeps_order_and_ignores_duplicates() {
        let registry = ToolRegistry::empty()
            .with_tool(Arc::new(EchoTool("b")))
            .with_tool(Arc::new(EchoTool("a")))
            .with_tool(Arc::new(EchoTool("b")));
        assert_eq!(registry.tool_names(), vec!["b", "a"]);
    }

    #[tokio::test]
    async fn test_registry_invoke_passes_arguments_through() {
        let registry = ToolRegistry::empty().with_tool(Arc::new(EchoTool("echo")));

        let mut args = JsonObject::new();
        args.insert("x".to_string(), serde_json::json!(1));

        let result = registry.invoke("echo", args).await.unwrap();
        assert_eq!(result, r#"{"x":1}"#);
    }

    #[tokio::test]
    async fn test_registry_invoke_unknown() {
        let registry = ToolRegistry::new(&Config::default());

        let err = registry
            .invoke("get_orders", JsonObject::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::NotFound(ref name) if name == "get_orders"));
        assert_eq!(err.to_string(), "Unknown tool: get_orders");

        // listing is unaffected by failed dispatch
        assert_eq!(registry.list().len(), 1);
    }

    #[tokio::test]
    async fn test_registry_invoke_validation_error_is_text() {
        let registry = ToolRegistry::new(&Config::default());
        let result = registry
            .invoke(PositionsTool::NAME, JsonObject::new())
            .await
            .unwrap();
        assert_eq!(result, "Error: Symbol is required");
    }
}
