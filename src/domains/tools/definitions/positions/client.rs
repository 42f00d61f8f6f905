//! Positions backend client.
//!
//! [`PositionsBackend`] is the seam between the tool and the network. The
//! production implementation, [`HttpPositionsBackend`], issues a single
//! `GET {base_url}/query/positions` per query.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, HeaderValue};
use std::time::Duration;
use tracing::{debug, instrument};

use super::error::FetchError;
use super::model::PositionsResponse;
use super::request::PositionRequest;
use crate::core::config::ApiConfig;

/// Path of the positions query, relative to the API base URL.
pub const POSITIONS_ENDPOINT: &str = "/query/positions";

/// Source of position snapshots.
#[async_trait]
pub trait PositionsBackend: Send + Sync {
    /// Fetch the latest positions for a validated request.
    async fn fetch_positions(
        &self,
        request: &PositionRequest,
    ) -> Result<PositionsResponse, FetchError>;
}

/// HTTP implementation of [`PositionsBackend`].
///
/// A fresh `reqwest::Client` is built for every query and dropped when the
/// query finishes, successful or not.
#[derive(Debug, Clone)]
pub struct HttpPositionsBackend {
    url: String,
    timeout: Duration,
    user_agent: String,
}

impl HttpPositionsBackend {
    pub fn new(config: &ApiConfig) -> Self {
        Self {
            url: format!("{}{}", config.base_url, POSITIONS_ENDPOINT),
            timeout: config.timeout(),
            user_agent: config.user_agent.clone(),
        }
    }

    /// Full URL of the positions endpoint.
    pub fn url(&self) -> &str {
        &self.url
    }

    fn client(&self) -> Result<reqwest::Client, FetchError> {
        reqwest::Client::builder()
            .user_agent(self.user_agent.as_str())
            .timeout(self.timeout)
            .build()
            .map_err(FetchError::Client)
    }
}

#[async_trait]
impl PositionsBackend for HttpPositionsBackend {
    #[instrument(skip_all, fields(symbol = %request.symbol()))]
    async fn fetch_positions(
        &self,
        request: &PositionRequest,
    ) -> Result<PositionsResponse, FetchError> {
        let client = self.client()?;

        let response = client
            .get(&self.url)
            .query(&request.query_params())
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status,
                url: response.url().to_string(),
            });
        }

        let body = response.bytes().await?;
        debug!("Positions response received: {} bytes", body.len());

        Ok(serde_json::from_slice(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api_config(base_url: &str) -> ApiConfig {
        ApiConfig {
            base_url: base_url.to_string(),
            ..ApiConfig::default()
        }
    }

    #[test]
    fn test_endpoint_url() {
        let backend = HttpPositionsBackend::new(&api_config("https://api.example.com"));
        assert_eq!(backend.url(), "https://api.example.com/query/positions");
    }

    #[test]
    fn test_defaults_from_config() {
        let config = ApiConfig::default();
        let backend = HttpPositionsBackend::new(&config);
        assert_eq!(backend.timeout, Duration::from_secs(30));
        assert_eq!(backend.user_agent, "y2kfund-mcp/1.0.0");
    }

    #[test]
    fn test_client_builds() {
        let backend = HttpPositionsBackend::new(&ApiConfig::default());
        assert!(backend.client().is_ok());
    }
}
