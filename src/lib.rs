//! Y2K Fund positions MCP server.
//!
//! Exposes a single MCP tool, `get_positions`, that looks up the fund's
//! latest holdings of a ticker symbol through the Y2K Fund data API and
//! renders them as a plain-text report followed by the raw JSON.
//!
//! # Architecture
//!
//! - **core**: configuration, error handling, the MCP server handler and the
//!   stdio/TCP/HTTP transports
//! - **domains**: business logic
//!   - **tools**: the tool registry and the `get_positions` tool
//!
//! # Example
//!
//! ```rust,no_run
//! use y2kfund_mcp_server::core::{Config, McpServer, TransportService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     config.validate()?;
//!     let server = McpServer::new(config.clone());
//!     TransportService::new(config.transport).run(server).await?;
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result};
