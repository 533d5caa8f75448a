//! read_file tool - read file contents

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::sandbox::AccessKind;
use crate::tools::args::string_arg;
use crate::tools::{Tool, ToolContext, ToolError};

/// Read a file's contents as text
pub struct ReadFileTool;

#[async_trait]
impl Tool for ReadFileTool {
    fn name(&self) -> &'static str {
        "read_file"
    }

    fn description(&self) -> &'static str {
        "Read the contents of a file. Workspace-relative path under the project root."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "Workspace-relative path under the project root."
                }
            },
            "required": ["path"]
        })
    }

    async fn execute(&self, input: &Value, ctx: &ToolContext) -> Result<Value, ToolError> {
        let path = string_arg(input, "path")?;
        let full_path = ctx.resolve(path, AccessKind::Read)?;
        debug!(?full_path, "ReadFileTool::execute: path validated");

        let content = tokio::fs::read_to_string(&full_path)
            .await
            .map_err(|e| ToolError::io("failed to read file", e))?;

        debug!(bytes = content.len(), "ReadFileTool::execute: file read");
        Ok(serde_json::json!({ "content": content }))
    }
}
