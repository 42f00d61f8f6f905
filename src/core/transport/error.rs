//! Transport error types.

use thiserror::Error;

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Errors that can occur in transport operations.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Failed to bind to address.
    #[error("Failed to bind to {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    /// The MCP session could not be initialized.
    #[error("Server initialization error: {0}")]
    Init(String),

    /// The MCP session ended abnormally.
    #[error("Service error: {0}")]
    Service(String),

    /// HTTP server failure.
    #[error("HTTP error: {0}")]
    Http(String),
}

impl TransportError {
    /// Create a bind error.
    pub fn bind(address: impl Into<String>, source: std::io::Error) -> Self {
        Self::Bind {
            address: address.into(),
            source,
        }
    }

    /// Create an initialization error.
    pub fn init(msg: impl ToString) -> Self {
        Self::Init(msg.to_string())
    }

    /// Create a service error.
    pub fn service(msg: impl ToString) -> Self {
        Self::Service(msg.to_string())
    }

    /// Create an HTTP error.
    pub fn http(msg: impl ToString) -> Self {
        Self::Http(msg.to_string())
    }
}
