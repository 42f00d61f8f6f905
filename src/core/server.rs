//! MCP Server implementation and lifecycle management.
//!
//! This module contains the main server handler that implements the MCP
//! protocol by delegating to the [`ToolRegistry`].
//!
//! The registry is built once in [`McpServer::new`] and shared by `Arc`, so
//! clones of the server (one per TCP connection, one per HTTP request) all
//! dispatch to the same immutable set of tools.

use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler,
    model::*,
    service::RequestContext,
};
use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::config::Config;
use super::error::Result;
use crate::domains::tools::{ToolError, ToolRegistry};

/// Instructions advertised to clients on initialization.
const INSTRUCTIONS: &str = "Y2K Fund positions server. Use get_positions with a ticker symbol \
     to see the latest positions held across fund accounts.";

/// The main MCP server handler.
///
/// This struct implements the `ServerHandler` trait from rmcp and routes
/// tool requests to the registry.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Registered tools.
    registry: Arc<ToolRegistry>,
}

impl McpServer {
    /// Create a new MCP server with the given configuration.
    pub fn new(config: Config) -> Self {
        let registry = ToolRegistry::new(&config);
        Self::with_registry(config, registry)
    }

    /// Create a server around an already-built registry.
    pub fn with_registry(config: Config, registry: ToolRegistry) -> Self {
        Self {
            config: Arc::new(config),
            registry: Arc::new(registry),
        }
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Get the tool registry.
    pub fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }

    /// Instructions sent to clients on initialization.
    pub fn instructions(&self) -> &'static str {
        INSTRUCTIONS
    }

    /// Invoke a tool and wrap its text in a single text content item.
    pub async fn invoke_tool(&self, name: &str, arguments: JsonObject) -> Result<CallToolResult> {
        let text = self.registry.invoke(name, arguments).await?;
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    // ========================================================================
    // HTTP Transport Support Methods
    // ========================================================================

    /// List all available tools as JSON (for HTTP transport).
    pub fn list_tools_json(&self) -> Vec<serde_json::Value> {
        self.registry
            .list()
            .into_iter()
            .map(|t| {
                serde_json::json!({
                    "name": t.name,
                    "description": t.description,
                    "inputSchema": t.input_schema
                })
            })
            .collect()
    }

    /// Call a tool by name and return the result as JSON (for HTTP transport).
    pub async fn call_tool_json(
        &self,
        name: &str,
        arguments: JsonObject,
    ) -> Result<serde_json::Value> {
        let result = self.invoke_tool(name, arguments).await?;
        Ok(serde_json::to_value(result)?)
    }
}

impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: self.config.server.name.clone(),
                version: self.config.server.version.clone(),
                ..Implementation::from_build_env()
            },
            ..Default::default()
        }
    }

    #[instrument(skip(self, _context))]
    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListToolsResult, McpError> {
        info!("Listing tools");
        Ok(ListToolsResult {
            tools: self.registry.list(),
            next_cursor: None,
            meta: None,
        })
    }

    #[instrument(skip(self, request, _context), fields(tool = %request.name))]
    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<CallToolResult, McpError> {
        info!("Calling tool: {}", request.name);
        let arguments = request.arguments.unwrap_or_default();

        match self.registry.invoke(&request.name, arguments).await {
            Ok(text) => Ok(CallToolResult::success(vec![Content::text(text)])),
            Err(e @ ToolError::NotFound(_)) => {
                warn!("{}", e);
                Err(McpError::invalid_params(e.to_string(), None))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn text_of(result: &CallToolResult) -> &str {
        match &result.content[0].raw {
            RawContent::Text(text) => &text.text,
            _ => panic!("Expected text content"),
        }
    }

    #[test]
    fn test_get_info() {
        let server = McpServer::new(Config::default());
        let info = server.get_info();
        assert!(info.capabilities.tools.is_some());
        assert!(info.capabilities.resources.is_none());
        assert_eq!(info.server_info.name, "y2kfund-mcp");
        assert!(info.instructions.unwrap().contains("get_positions"));
    }

    #[test]
    fn test_list_tools_json() {
        let server = McpServer::new(Config::default());
        let tools = server.list_tools_json();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0]["name"], "get_positions");
        assert_eq!(tools[0]["inputSchema"]["required"], serde_json::json!(["symbol"]));
    }

    #[tokio::test]
    async fn test_invoke_tool_wraps_text() {
        let server = McpServer::new(Config::default());
        let result = server
            .invoke_tool("get_positions", JsonObject::new())
            .await
            .unwrap();

        assert_eq!(result.content.len(), 1);
        assert_eq!(text_of(&result), "Error: Symbol is required");
        assert_ne!(result.is_error, Some(true));
    }

    #[tokio::test]
    async fn test_invoke_unknown_tool() {
        let server = McpServer::new(Config::default());
        let err = server
            .invoke_tool("get_trades", JsonObject::new())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Tool(ToolError::NotFound(_))));
        assert!(err.to_string().contains("get_trades"));
        assert_eq!(server.registry().list().len(), 1);
    }

    #[tokio::test]
    async fn test_call_tool_json() {
        let server = McpServer::new(Config::default());
        let value = server
            .call_tool_json("get_positions", JsonObject::new())
            .await
            .unwrap();

        assert_eq!(value["content"][0]["type"], "text");
        assert_eq!(value["content"][0]["text"], "Error: Symbol is required");
    }
}
