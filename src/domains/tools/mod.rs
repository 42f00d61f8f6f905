//! Tools domain module.
//!
//! This module handles all tool-related functionality for the MCP server.
//! Tools are executable functions that can be called by MCP clients.
//!
//! ## Architecture
//!
//! - `definitions/` - Individual tool implementations (one module per tool)
//! - `handler.rs` - The [`ToolHandler`] trait every tool implements
//! - `registry.rs` - Immutable tool registry and dispatcher
//! - `error.rs` - Tool-specific error types
//!
//! ## Adding a New Tool
//!
//! 1. Create a new module in `definitions/`
//! 2. Implement [`ToolHandler`] for it
//! 3. Export in `definitions/mod.rs`
//! 4. Register it in `ToolRegistry::new`
//!
//! **No need to modify `server.rs`!** Listing and dispatch go through the registry.

pub mod definitions;
mod error;
mod handler;
mod registry;

pub use error::ToolError;
pub use handler::ToolHandler;
pub use registry::ToolRegistry;
