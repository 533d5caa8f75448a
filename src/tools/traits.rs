//! Tool trait and result envelope

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::context::ToolContext;
use super::error::ToolError;
use crate::sandbox::ErrorCode;

/// A tool that can be called by the LLM
#[async_trait]
pub trait Tool: Send + Sync {
    /// Tool name (matches the LLM tool_use name)
    fn name(&self) -> &'static str;

    /// Human-readable description
    fn description(&self) -> &'static str;

    /// JSON Schema for input parameters
    fn input_schema(&self) -> Value;

    /// Execute the tool, returning the `data` object on success
    ///
    /// Argument validation must complete before any I/O.
    async fn execute(&self, input: &Value, ctx: &ToolContext) -> Result<Value, ToolError>;
}

/// Error half of the result envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub code: ErrorCode,
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

/// Result of a tool execution
///
/// Serializes to `{"ok": bool, "data": {...}?, "error": {...}?}`. This is the
/// only shape ever sent back to the model as a tool outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorPayload>,
}

impl ToolResult {
    /// Create a successful result
    pub fn success(data: Value) -> Self {
        debug!("ToolResult::success: called");
        Self {
            ok: true,
            data: Some(data),
            error: None,
        }
    }

    /// Create an error result
    pub fn error(code: ErrorCode, message: impl Into<String>, suggestions: Vec<String>) -> Self {
        debug!(%code, "ToolResult::error: called");
        Self {
            ok: false,
            data: None,
            error: Some(ErrorPayload {
                code,
                message: message.into(),
                suggestions,
            }),
        }
    }

    pub fn is_error(&self) -> bool {
        !self.ok
    }

    /// Serialized wire form handed to the model
    pub fn to_wire(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            format!(
                r#"{{"ok":false,"error":{{"code":"io_error","message":"failed to encode tool result: {}"}}}}"#,
                e
            )
        })
    }
}

impl From<ToolError> for ToolResult {
    fn from(err: ToolError) -> Self {
        ToolResult::error(err.code(), err.to_string(), err.suggestions().to_vec())
    }
}
