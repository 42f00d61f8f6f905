//! HTTP transport implementation.
//!
//! Stateless JSON-RPC over POST, so plain HTTP clients (curl, browsers) can
//! list and call tools without an MCP SDK.
//!
//! Routes:
//! - `POST {rpc_path}`: JSON-RPC 2.0 (`initialize`, `ping`, `tools/list`,
//!   `tools/call`, `notifications/*`)
//! - `GET /health`: liveness probe
//! - `GET /`: server summary

use axum::{
    Json, Router,
    extract::State,
    response::IntoResponse,
    routing::{get, post},
};
use rmcp::model::JsonObject;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, instrument, warn};

use super::{TransportError, TransportResult, config::HttpConfig, shutdown_signal};
use crate::Error;
use crate::core::McpServer;
use crate::domains::tools::ToolError;

/// Protocol version reported by `initialize`.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

const INVALID_REQUEST: i32 = -32600;
const METHOD_NOT_FOUND: i32 = -32601;
const INVALID_PARAMS: i32 = -32602;
const INTERNAL_ERROR: i32 = -32603;

/// JSON-RPC request structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Option<Value>,
}

/// JSON-RPC response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC error structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
}

impl JsonRpcResponse {
    /// Create a success response.
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Create an error response.
    pub fn error(id: Option<Value>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
            }),
        }
    }
}

/// HTTP transport handler.
pub struct HttpTransport {
    config: HttpConfig,
}

impl HttpTransport {
    /// Create a new HTTP transport with the given config.
    pub fn new(config: HttpConfig) -> Self {
        Self { config }
    }

    /// Get the bind address.
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.host, self.config.port)
    }

    /// Build the axum router for `server`.
    pub fn router(&self, server: McpServer) -> Router {
        let app = Router::new()
            .route(&self.config.rpc_path, post(handle_rpc))
            .route("/health", get(health_check))
            .route("/", get(root_handler))
            .layer(TraceLayer::new_for_http())
            .with_state(server);

        if self.config.enable_cors {
            app.layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            )
        } else {
            app
        }
    }

    /// Serve HTTP until Ctrl-C.
    pub async fn run(self, server: McpServer) -> TransportResult<()> {
        let addr = self.address();
        let app = self.router(server);

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| TransportError::bind(&addr, e))?;

        info!(
            "Ready - listening on {} (JSON-RPC at POST {}, CORS {})",
            addr,
            self.config.rpc_path,
            if self.config.enable_cors { "enabled" } else { "disabled" }
        );

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(TransportError::http)?;

        info!("HTTP transport stopped");
        Ok(())
    }
}

async fn root_handler(State(server): State<McpServer>) -> impl IntoResponse {
    Json(json!({
        "name": server.name(),
        "version": server.version(),
        "transport": "HTTP",
        "protocol": "JSON-RPC 2.0",
        "tools": server.registry().tool_names(),
    }))
}

async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

#[instrument(skip_all, fields(method))]
async fn handle_rpc(
    State(server): State<McpServer>,
    Json(request): Json<JsonRpcRequest>,
) -> Json<JsonRpcResponse> {
    tracing::Span::current().record("method", request.method.as_str());
    Json(process_request(&server, request).await)
}

/// Process a JSON-RPC request and return the response.
pub async fn process_request(server: &McpServer, request: JsonRpcRequest) -> JsonRpcResponse {
    let JsonRpcRequest {
        jsonrpc,
        id,
        method,
        params,
    } = request;

    if jsonrpc != "2.0" {
        return JsonRpcResponse::error(id, INVALID_REQUEST, "Invalid Request");
    }

    match method.as_str() {
        "initialize" => JsonRpcResponse::success(
            id,
            json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": { "tools": {} },
                "serverInfo": {
                    "name": server.name(),
                    "version": server.version()
                },
                "instructions": server.instructions()
            }),
        ),
        "ping" => JsonRpcResponse::success(id, json!({})),
        "tools/list" => JsonRpcResponse::success(id, json!({ "tools": server.list_tools_json() })),
        "tools/call" => handle_tools_call(server, id, params.unwrap_or(Value::Null)).await,
        m if m.starts_with("notifications/") => {
            info!("Received notification: {}", m);
            JsonRpcResponse::success(id, Value::Null)
        }
        m => {
            warn!("Unknown method: {}", m);
            JsonRpcResponse::error(id, METHOD_NOT_FOUND, "Method not found")
        }
    }
}

async fn handle_tools_call(server: &McpServer, id: Option<Value>, params: Value) -> JsonRpcResponse {
    let Some(name) = params.get("name").and_then(Value::as_str) else {
        return JsonRpcResponse::error(id, INVALID_PARAMS, "Missing tool name");
    };

    let arguments: JsonObject = match params.get("arguments") {
        None | Some(Value::Null) => JsonObject::new(),
        Some(Value::Object(map)) => map.clone(),
        Some(_) => {
            return JsonRpcResponse::error(id, INVALID_PARAMS, "Tool arguments must be an object");
        }
    };

    match server.call_tool_json(name, arguments).await {
        Ok(result) => JsonRpcResponse::success(id, result),
        Err(Error::Tool(e @ ToolError::NotFound(_))) => {
            JsonRpcResponse::error(id, INVALID_PARAMS, e.to_string())
        }
        Err(e) => JsonRpcResponse::error(id, INTERNAL_ERROR, e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Config;

    fn request(method: &str, params: Value) -> JsonRpcRequest {
        JsonRpcRequest {
            jsonrpc: "2.0".to_string(),
            id: Some(json!(1)),
            method: method.to_string(),
            params: Some(params),
        }
    }

    #[tokio::test]
    async fn test_tools_list() {
        let server = McpServer::new(Config::default());
        let response = process_request(&server, request("tools/list", json!({}))).await;

        let result = response.result.unwrap();
        assert_eq!(result["tools"][0]["name"], "get_positions");
    }

    #[tokio::test]
    async fn test_tools_call_returns_text() {
        let server = McpServer::new(Config::default());
        let response = process_request(
            &server,
            request("tools/call", json!({ "name": "get_positions", "arguments": {} })),
        )
        .await;

        let result = response.result.unwrap();
        assert_eq!(result["content"][0]["text"], "Error: Symbol is required");
    }

    #[tokio::test]
    async fn test_tools_call_unknown_tool() {
        let server = McpServer::new(Config::default());
        let response = process_request(
            &server,
            request("tools/call", json!({ "name": "get_orders", "arguments": {} })),
        )
        .await;

        let error = response.error.unwrap();
        assert_eq!(error.code, INVALID_PARAMS);
        assert_eq!(error.message, "Unknown tool: get_orders");
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let server = McpServer::new(Config::default());
        let response = process_request(&server, request("resources/list", json!({}))).await;
        assert_eq!(response.error.unwrap().code, METHOD_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_wrong_jsonrpc_version() {
        let server = McpServer::new(Config::default());
        let mut req = request("ping", json!({}));
        req.jsonrpc = "1.0".to_string();
        let response = process_request(&server, req).await;
        assert_eq!(response.error.unwrap().code, INVALID_REQUEST);
    }
}
