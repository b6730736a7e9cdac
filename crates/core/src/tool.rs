//! Tool result type shared by the dispatcher and the agent loop.

use serde::{Deserialize, Serialize};

/// The result of a tool execution.
///
/// `output` is always human-readable text that can be sent back to the
/// model verbatim, whether or not the tool succeeded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolResult {
    /// Whether the tool executed successfully
    pub success: bool,

    /// The output content
    pub output: String,

    /// The underlying failure message, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ToolResult {
    /// A successful result.
    pub fn ok(output: impl Into<String>) -> Self {
        Self {
            success: true,
            output: output.into(),
            error: None,
        }
    }

    /// A failed result whose output is `Error: <message>`.
    pub fn error(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            success: false,
            output: format!("Error: {message}"),
            error: Some(message),
        }
    }

    /// A failed result for a tool name that isn't in the catalog.
    pub fn unknown_tool(name: &str) -> Self {
        let message = format!("Unknown tool: {name}");
        Self {
            success: false,
            output: message.clone(),
            error: Some(message),
        }
    }
}
