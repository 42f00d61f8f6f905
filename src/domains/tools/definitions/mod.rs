//! Tool definitions module.
//!
//! This module exports all available tool definitions.
//! Each tool is defined in its own module for better maintainability.

pub mod positions;

pub use positions::{PositionsParams, PositionsTool};
