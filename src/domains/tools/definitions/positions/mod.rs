//! Positions query tool.
//!
//! Looks up the latest stock positions for a ticker symbol across the fund's
//! accounts and renders them as a text report.
//!
//! - `request`: argument parsing and validation
//! - `client`: backend seam and HTTP implementation
//! - `model`: wire types
//! - `report`: report layout and totals
//! - `format`: number formatting

mod client;
mod error;
mod format;
mod model;
mod report;
mod request;

pub use client::{HttpPositionsBackend, POSITIONS_ENDPOINT, PositionsBackend};
pub use error::{FetchError, PositionsError};
pub use model::{Amount, Position, PositionRecord, PositionsResponse};
pub use report::{PositionsOutcome, PositionsReport, Totals};
pub use request::PositionRequest;

use async_trait::async_trait;
use rmcp::{
    handler::server::tool::cached_schema_for_type,
    model::{JsonObject, Tool},
};
use schemars::JsonSchema;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::core::config::ApiConfig;
use crate::domains::tools::ToolHandler;

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters advertised for the positions tool.
///
/// Incoming arguments are validated by [`PositionRequest::parse`]; this type
/// only describes them to clients.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct PositionsParams {
    #[schemars(description = "Stock ticker symbol (e.g., MSFT, META, AAPL, GOOG, TSLA)")]
    pub symbol: String,

    #[schemars(description = "Optional user ID for filtering by user-specific account aliases")]
    #[serde(default)]
    pub user_id: Option<String>,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Positions tool - latest stock positions for a symbol.
#[derive(Clone)]
pub struct PositionsTool {
    backend: Arc<dyn PositionsBackend>,
}

impl PositionsTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "get_positions";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Get latest stock positions by symbol from Y2K Fund accounts. \
         Returns position data including quantity, market value, unrealized P&L, \
         average price, and account information (legal entity). \
         Data is fetched from the most recent snapshot.";

    /// Create the tool backed by the HTTP API.
    pub fn new(config: &ApiConfig) -> Self {
        Self::with_backend(Arc::new(HttpPositionsBackend::new(config)))
    }

    /// Create the tool with a custom backend.
    pub fn with_backend(backend: Arc<dyn PositionsBackend>) -> Self {
        Self { backend }
    }

    /// Validate, fetch and build the report without rendering it.
    #[instrument(skip_all)]
    pub async fn query(&self, arguments: &JsonObject) -> Result<PositionsOutcome, PositionsError> {
        let request = PositionRequest::parse(arguments)?;
        info!("Fetching positions for {}", request.symbol());

        let response = self.backend.fetch_positions(&request).await?;

        if !response.is_success() {
            return Err(PositionsError::backend(response.error));
        }

        let count = response.count();
        if count == 0 {
            return Ok(PositionsOutcome::Empty {
                symbol: request.symbol().to_string(),
            });
        }

        let report = PositionsReport::new(request.symbol(), count, response.positions)
            .map_err(PositionsError::Render)?;

        info!(
            "Found {} position(s) for {}",
            report.records().len(),
            report.symbol()
        );
        Ok(PositionsOutcome::Report(report))
    }

    /// Render a query result as the text returned to the client.
    pub fn render(result: Result<PositionsOutcome, PositionsError>) -> String {
        match result {
            Ok(outcome) => outcome.to_string(),
            Err(e) => {
                if e.is_validation() {
                    warn!("Rejected positions query: {}", e);
                } else {
                    warn!("Positions query failed: {}", e);
                }
                e.to_string()
            }
        }
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<PositionsParams>(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }
}

#[async_trait]
impl ToolHandler for PositionsTool {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn tool(&self) -> Tool {
        Self::to_tool()
    }

    async fn execute(&self, arguments: JsonObject) -> String {
        Self::render(self.query(&arguments).await)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};
    use std::sync::Mutex;

    /// Backend returning a canned body and recording every request.
    struct FakeBackend {
        body: Value,
        calls: Mutex<Vec<PositionRequest>>,
    }

    impl FakeBackend {
        fn new(body: Value) -> Arc<Self> {
            Arc::new(Self {
                body,
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<PositionRequest> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PositionsBackend for FakeBackend {
        async fn fetch_positions(
            &self,
            request: &PositionRequest,
        ) -> Result<PositionsResponse, FetchError> {
            self.calls.lock().unwrap().push(request.clone());
            Ok(serde_json::from_value(self.body.clone())?)
        }
    }

    fn args(value: Value) -> JsonObject {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    fn single_position_body() -> Value {
        json!({
            "success": true,
            "positions_count": 1,
            "positions": [{
                "legal_entity": "Fund A",
                "qty": 100,
                "market_value": 15000,
                "price": 150,
                "avgPrice": 100,
                "unrealized_pnl": 5000
            }]
        })
    }

    #[test]
    fn test_to_tool() {
        let tool = PositionsTool::to_tool();
        assert_eq!(tool.name, "get_positions");

        let description = tool.description.unwrap();
        for field in ["quantity", "market value", "unrealized P&L", "average price", "legal entity", "snapshot"] {
            assert!(description.contains(field), "missing {field}");
        }

        let schema = Value::Object((*tool.input_schema).clone());
        assert_eq!(schema["type"], "object");
        assert!(schema["properties"]["symbol"].is_object());
        assert!(schema["properties"]["user_id"].is_object());
        assert_eq!(schema["required"], json!(["symbol"]));
    }

    #[tokio::test]
    async fn test_missing_symbol_makes_no_call() {
        let backend = FakeBackend::new(single_position_body());
        let tool = PositionsTool::with_backend(backend.clone());

        for input in [json!({}), json!({ "symbol": "" }), json!({ "user_id": "u1" })] {
            let text = tool.execute(args(input)).await;
            assert_eq!(text, "Error: Symbol is required");
        }
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_symbol_type_makes_no_call() {
        let backend = FakeBackend::new(single_position_body());
        let tool = PositionsTool::with_backend(backend.clone());

        let text = tool.execute(args(json!({ "symbol": ["MSFT"] }))).await;
        assert!(text.starts_with("Error: Invalid arguments: "));
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_symbol_uppercased_and_user_id_forwarded() {
        let backend = FakeBackend::new(single_position_body());
        let tool = PositionsTool::with_backend(backend.clone());

        tool.execute(args(json!({ "symbol": "msft" }))).await;
        tool.execute(args(json!({ "symbol": "Meta", "user_id": "alice" }))).await;

        let calls = backend.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].symbol(), "MSFT");
        assert_eq!(calls[0].user_id(), None);
        assert_eq!(calls[1].symbol(), "META");
        assert_eq!(calls[1].user_id(), Some("alice"));
    }

    #[tokio::test]
    async fn test_zero_count_reports_no_positions() {
        let backend = FakeBackend::new(json!({
            "success": true,
            "positions": [],
            "positions_count": 0
        }));
        let tool = PositionsTool::with_backend(backend);

        let text = tool.execute(args(json!({ "symbol": "zzzz" }))).await;
        assert_eq!(text, "No positions found for symbol: ZZZZ");
    }

    #[tokio::test]
    async fn test_backend_failure_uses_payload_error() {
        let backend = FakeBackend::new(json!({ "success": false, "error": "invalid symbol" }));
        let tool = PositionsTool::with_backend(backend);

        let text = tool.execute(args(json!({ "symbol": "???" }))).await;
        assert_eq!(text, "Error: invalid symbol");
    }

    #[tokio::test]
    async fn test_backend_error_without_message() {
        let backend = FakeBackend::new(json!({ "success": false }));
        let tool = PositionsTool::with_backend(backend);

        let text = tool.execute(args(json!({ "symbol": "MSFT" }))).await;
        assert_eq!(text, "Error: Unknown error");
    }

    #[tokio::test]
    async fn test_single_position_report() {
        let backend = FakeBackend::new(single_position_body());
        let tool = PositionsTool::with_backend(backend);

        let text = tool.execute(args(json!({ "symbol": "msft" }))).await;
        assert!(text.starts_with("Found 1 position(s) for MSFT:"));
        assert!(text.contains("P&L %: 50.00%"));
        assert!(text.contains("Total Shares: 100"));
        assert!(text.contains("Total Market Value: $15,000.00"));
        assert!(text.contains("Total Unrealized P&L: $5,000.00"));
    }

    #[tokio::test]
    async fn test_query_returns_typed_outcome() {
        let backend = FakeBackend::new(single_position_body());
        let tool = PositionsTool::with_backend(backend);

        let outcome = tool.query(&args(json!({ "symbol": "msft" }))).await.unwrap();
        let PositionsOutcome::Report(report) = outcome else {
            panic!("expected a report");
        };
        assert_eq!(report.count(), 1);
        assert_eq!(report.totals().market_value, Amount::Integer(15000));

        let err = tool.query(&args(json!({}))).await.unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_malformed_record_is_fetch_error() {
        let backend = FakeBackend::new(json!({
            "success": true,
            "positions_count": 1,
            "positions": [{ "qty": "lots" }]
        }));
        let tool = PositionsTool::with_backend(backend);

        let text = tool.execute(args(json!({ "symbol": "MSFT" }))).await;
        assert!(text.starts_with("Error fetching positions: "));
    }

    #[tokio::test]
    async fn test_identical_calls_identical_reports() {
        let backend = FakeBackend::new(single_position_body());
        let tool = PositionsTool::with_backend(backend);

        let first = tool.execute(args(json!({ "symbol": "MSFT" }))).await;
        let second = tool.execute(args(json!({ "symbol": "MSFT" }))).await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_unreachable_backend_reports_fetch_error() {
        // Bind then drop a listener so the port is known to refuse connections.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let config = ApiConfig {
            base_url: format!("http://127.0.0.1:{port}"),
            timeout_secs: 5,
            ..ApiConfig::default()
        };
        let tool = PositionsTool::new(&config);

        let text = tool.execute(args(json!({ "symbol": "MSFT" }))).await;
        assert!(text.starts_with("Error fetching positions: "), "{text}");
        assert!(text.len() > "Error fetching positions: ".len());
    }
}
