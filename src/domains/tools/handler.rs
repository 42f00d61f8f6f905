//! Tool handler trait.

use rmcp::model::{JsonObject, Tool};

/// A tool that can be listed and invoked through the registry.
///
/// `execute` always yields text: tools report their own failures inside the
/// returned string rather than as protocol errors.
#[async_trait::async_trait]
pub trait ToolHandler: Send + Sync {
    /// Unique name the tool is invoked by.
    fn name(&self) -> &'static str;

    /// Descriptor advertised in `tools/list`.
    fn tool(&self) -> Tool;

    /// Execute the tool with the given arguments.
    async fn execute(&self, arguments: JsonObject) -> String;
}
