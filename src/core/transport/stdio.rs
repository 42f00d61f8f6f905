//! STDIO transport implementation.
//!
//! Standard input/output transport for MCP - the default and recommended mode.
//! Logs go to stderr; stdout carries protocol messages only.

use rmcp::ServiceExt;
use tracing::info;

use super::{TransportError, TransportResult, shutdown_signal};
use crate::core::McpServer;

/// STDIO transport handler.
pub struct StdioTransport;

impl StdioTransport {
    /// Serve a single client over stdin/stdout.
    pub async fn run(server: McpServer) -> TransportResult<()> {
        info!("Ready - communicating via stdin/stdout");

        let service = server
            .serve(rmcp::transport::stdio())
            .await
            .map_err(TransportError::init)?;

        let cancel = service.cancellation_token();
        let interrupt = tokio::spawn(async move {
            shutdown_signal().await;
            cancel.cancel();
        });

        let reason = service.waiting().await.map_err(TransportError::service)?;
        interrupt.abort();

        info!("STDIO transport finished: {:?}", reason);
        Ok(())
    }
}
