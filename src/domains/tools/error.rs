//! Tool-specific error types.

use thiserror::Error;

/// Errors raised by the tool dispatcher.
///
/// Tool execution failures never show up here; they are part of the tool's
/// text output.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The requested tool was not found.
    #[error("Unknown tool: {0}")]
    NotFound(String),
}

impl ToolError {
    /// Create a new "not found" error.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound(name.into())
    }
}
