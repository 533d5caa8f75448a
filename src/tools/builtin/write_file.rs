//! write_file tool - create or overwrite a file

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::sandbox::AccessKind;
use crate::tools::args::string_arg;
use crate::tools::{Tool, ToolContext, ToolError};

/// Write content to a file
pub struct WriteFileTool;

#[async_trait]
impl Tool for WriteFileTool {
    fn name(&self) -> &'static str {
        "write_file"
    }

    fn description(&self) -> &'static str {
        "Write content to a file, creating or overwriting it. Workspace-relative path under the project root."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "Workspace-relative path under the project root."
                },
                "content": {
                    "type": "string",
                    "description": "Content to write to the file."
                }
            },
            "required": ["path", "content"]
        })
    }

    async fn execute(&self, input: &Value, ctx: &ToolContext) -> Result<Value, ToolError> {
        let path = string_arg(input, "path")?;
        let content = string_arg(input, "content")?;
        debug!(%path, content_len = content.len(), "WriteFileTool::execute: arguments validated");

        let full_path = ctx.resolve(path, AccessKind::Write)?;
        debug!(?full_path, "WriteFileTool::execute: path validated");

        tokio::fs::write(&full_path, content)
            .await
            .map_err(|e| ToolError::io("failed to write file", e))?;

        debug!(bytes = content.len(), "WriteFileTool::execute: file written successfully");
        Ok(serde_json::json!({
            "message": format!("wrote {} bytes to {}", content.len(), path)
        }))
    }
}
