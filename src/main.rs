//! Y2K Fund positions MCP server entry point.
//!
//! Initializes logging on stderr, loads configuration and serves the
//! configured transport until the client disconnects or Ctrl-C.

use anyhow::Result;
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, fmt};

use y2kfund_mcp_server::core::config::LoggingConfig;
use y2kfund_mcp_server::core::{Config, McpServer, TransportService};

#[tokio::main]
async fn main() -> Result<()> {
    // Config::from_env warns about invalid values; logging must already be up.
    dotenvy::dotenv().ok();
    init_logging(&LoggingConfig::from_env().level);

    let config = Config::from_env();

    info!("Starting {} v{}", config.server.name, config.server.version);
    config.validate()?;
    info!("Positions API: {}", config.api.base_url);

    let server = McpServer::new(config.clone());
    info!("Registered tools: {}", server.registry().tool_names().join(", "));

    let transport = TransportService::new(config.transport);
    transport.run(server).await?;

    info!("Server shutting down");

    Ok(())
}

/// Initialize the logging subsystem.
///
/// Everything goes to stderr so stdout stays reserved for the protocol.
fn init_logging(level: &str) {
    let level = match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .init();
}
