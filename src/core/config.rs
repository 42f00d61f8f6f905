//! Configuration management for the MCP server.
//!
//! This module provides a centralized configuration structure that can be
//! populated from environment variables (and `.env` files) or defaults.

use super::error::{Error, Result};
use super::transport::TransportConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};

/// Default Y2K Fund API endpoint.
pub const DEFAULT_API_BASE_URL: &str = "https://ibkr-data-fetch.y2k.fund";

/// Default timeout for API requests, in seconds.
pub const DEFAULT_API_TIMEOUT_SECS: u64 = 30;

/// Default user agent for API requests.
pub const DEFAULT_USER_AGENT: &str = "y2kfund-mcp/1.0.0";

/// Main configuration structure for the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// Backend API configuration.
    pub api: ApiConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,
}

/// Configuration for the Y2K Fund positions API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL, without a trailing slash.
    pub base_url: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,

    /// `User-Agent` header sent with every request.
    pub user_agent: String,
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout_secs: DEFAULT_API_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl LoggingConfig {
    /// Load the log level from `MCP_LOG_LEVEL`.
    ///
    /// Read on its own so logging can be initialized before the rest of the
    /// configuration, whose fallbacks are reported as warnings.
    pub fn from_env() -> Self {
        match std::env::var("MCP_LOG_LEVEL") {
            Ok(level) => Self { level },
            Err(_) => Self::default(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "y2kfund-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig::default(),
            transport: TransportConfig::default(),
            api: ApiConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Server settings use the `MCP_` prefix (`MCP_SERVER_NAME`,
    /// `MCP_LOG_LEVEL`, `MCP_TRANSPORT`, ...). Backend settings use
    /// `Y2K_API_BASE_URL`, `Y2K_API_TIMEOUT_SECS` and `Y2K_USER_AGENT`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        config.logging = LoggingConfig::from_env();

        // Load transport configuration from environment
        config.transport = TransportConfig::from_env();

        if let Ok(base_url) = std::env::var("Y2K_API_BASE_URL") {
            config.api.base_url = normalize_base_url(&base_url);
            info!("API base URL set to {}", config.api.base_url);
        }

        if let Ok(timeout) = std::env::var("Y2K_API_TIMEOUT_SECS") {
            match timeout.parse::<u64>() {
                Ok(secs) if secs > 0 => config.api.timeout_secs = secs,
                _ => warn!(
                    "Ignoring invalid Y2K_API_TIMEOUT_SECS={:?}, using {}s",
                    timeout, DEFAULT_API_TIMEOUT_SECS
                ),
            }
        }

        if let Ok(user_agent) = std::env::var("Y2K_USER_AGENT") {
            config.api.user_agent = user_agent;
        }

        config
    }

    /// Check that the configuration can be used to reach the backend.
    pub fn validate(&self) -> Result<()> {
        let base_url = &self.api.base_url;
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(Error::config(format!(
                "API base URL must start with http:// or https://, got {:?}",
                base_url
            )));
        }

        if self.api.timeout_secs == 0 {
            return Err(Error::config("API timeout must be greater than zero"));
        }

        if self.api.user_agent.trim().is_empty() {
            return Err(Error::config("User agent must not be empty"));
        }

        Ok(())
    }
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
