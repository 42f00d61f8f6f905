//! Error types for the positions tool.
//!
//! The `Display` output of [`PositionsError`] is the exact text returned to
//! the client, so these messages are part of the tool's contract.

use thiserror::Error;

/// Failures while talking to the positions backend.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// Connection, timeout or other transport failure.
    #[error("{}", with_causes(.0))]
    Request(#[from] reqwest::Error),

    /// The backend answered with a non-2xx status.
    #[error("server returned {status} for {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },

    /// The body was not the expected JSON document.
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl FetchError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Request(e) if e.is_timeout())
    }
}

/// Render an error followed by its source chain, `outer: inner: root`.
fn with_causes(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// Why a positions query produced no report.
#[derive(Debug, Error)]
pub enum PositionsError {
    /// No usable `symbol` argument.
    #[error("Error: Symbol is required")]
    MissingSymbol,

    /// Arguments present but of the wrong shape.
    #[error("Error: Invalid arguments: {0}")]
    InvalidArguments(String),

    /// The backend could not be reached or answered garbage.
    #[error("Error fetching positions: {0}")]
    Fetch(#[from] FetchError),

    /// The backend answered with `success: false`.
    #[error("Error: {message}")]
    Backend { message: String },

    /// The raw-data block could not be rendered.
    #[error("Error fetching positions: {0}")]
    Render(#[source] serde_json::Error),
}

impl PositionsError {
    pub fn invalid_arguments(msg: impl Into<String>) -> Self {
        Self::InvalidArguments(msg.into())
    }

    /// Backend-reported failure; `None` becomes "Unknown error".
    pub fn backend(message: Option<String>) -> Self {
        Self::Backend {
            message: message.unwrap_or_else(|| "Unknown error".to_string()),
        }
    }

    /// Whether the error was detected before any network I/O.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::MissingSymbol | Self::InvalidArguments(_))
    }
}
