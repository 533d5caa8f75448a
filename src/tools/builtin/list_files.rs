//! list_files tool - list files and directories

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::sandbox::AccessKind;
use crate::tools::args::string_arg;
use crate::tools::{Tool, ToolContext, ToolError};

/// List files and directories in a path
pub struct ListFilesTool;

#[async_trait]
impl Tool for ListFilesTool {
    fn name(&self) -> &'static str {
        "list_files"
    }

    fn description(&self) -> &'static str {
        "List files in a directory. Use '.' for the project root."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "Directory under the project root (use '.' for root)."
                }
            },
            "required": ["path"]
        })
    }

    async fn execute(&self, input: &Value, ctx: &ToolContext) -> Result<Value, ToolError> {
        let path = string_arg(input, "path")?;
        let full_path = ctx.resolve(path, AccessKind::List)?;
        debug!(?full_path, "ListFilesTool::execute: path validated");

        let mut dir = tokio::fs::read_dir(&full_path)
            .await
            .map_err(|e| ToolError::io("failed to list directory", e))?;

        let mut entries = Vec::new();
        while let Some(entry) = dir
            .next_entry()
            .await
            .map_err(|e| ToolError::io("failed to list directory", e))?
        {
            let name = entry.file_name().to_string_lossy().to_string();
            // Follows symlinks; dangling links are listed as plain entries
            let is_dir = match tokio::fs::metadata(entry.path()).await {
                Ok(m) => m.is_dir(),
                Err(_) => {
                    debug!(%name, "ListFilesTool::execute: failed to get metadata");
                    false
                }
            };

            entries.push(if is_dir { format!("{}/", name) } else { name });
        }

        entries.sort();
        debug!(entries_count = entries.len(), "ListFilesTool::execute: entries collected");
        Ok(serde_json::json!({ "files": entries }))
    }
}
