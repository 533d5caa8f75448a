//! ToolExecutor - dispatch over the closed set of tools

use tracing::debug;

use crate::llm::{ToolCall, ToolDefinition};

use super::builtin::{FetchUrlTool, ListFilesTool, ReadFileTool, WriteFileTool};
use super::{Tool, ToolContext, ToolError, ToolResult};

/// Every tool the agent knows about
///
/// Adding a tool means adding a variant here; dispatch is an exhaustive
/// match, so there is no silent default case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    ReadFile,
    WriteFile,
    ListFiles,
    FetchUrl,
}

impl ToolKind {
    pub const ALL: [ToolKind; 4] = [
        ToolKind::ReadFile,
        ToolKind::WriteFile,
        ToolKind::ListFiles,
        ToolKind::FetchUrl,
    ];

    /// The implementation behind this kind
    pub fn tool(&self) -> &'static dyn Tool {
        match self {
            ToolKind::ReadFile => &ReadFileTool,
            ToolKind::WriteFile => &WriteFileTool,
            ToolKind::ListFiles => &ListFilesTool,
            ToolKind::FetchUrl => &FetchUrlTool,
        }
    }

    /// Wire name the model calls the tool by
    pub fn name(&self) -> &'static str {
        self.tool().name()
    }

    /// Look up a kind by wire name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Declaration sent to the model
    pub fn definition(&self) -> ToolDefinition {
        let tool = self.tool();
        ToolDefinition::new(tool.name(), tool.description(), tool.input_schema())
    }
}

/// Executes tool calls against a fixed set of enabled tools
pub struct ToolExecutor {
    enabled: Vec<ToolKind>,
}

impl ToolExecutor {
    /// Executor with every tool enabled
    pub fn standard() -> Self {
        Self::with_tools(ToolKind::ALL.to_vec())
    }

    /// Executor with only the filesystem tools
    pub fn filesystem_only() -> Self {
        Self::with_tools(vec![ToolKind::ReadFile, ToolKind::WriteFile, ToolKind::ListFiles])
    }

    /// Executor exposing exactly `enabled`
    pub fn with_tools(enabled: Vec<ToolKind>) -> Self {
        debug!(?enabled, "ToolExecutor::with_tools: called");
        Self { enabled }
    }

    /// Tool definitions for the LLM, in declaration order
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.enabled.iter().map(ToolKind::definition).collect()
    }

    /// Enabled tool names
    pub fn tool_names(&self) -> Vec<&'static str> {
        self.enabled.iter().map(ToolKind::name).collect()
    }

    fn lookup(&self, name: &str) -> Option<ToolKind> {
        ToolKind::from_name(name).filter(|kind| self.enabled.contains(kind))
    }

    /// Execute a tool call
    ///
    /// Never fails: unknown tools, bad arguments, sandbox rejections and
    /// storage errors all come back as `ok: false` results.
    pub async fn execute(&self, tool_call: &ToolCall, ctx: &ToolContext) -> ToolResult {
        debug!(tool = %tool_call.name, args = %tool_call.input, "ToolExecutor::execute: tool call");

        let outcome = match self.lookup(&tool_call.name) {
            Some(kind) => kind.tool().execute(&tool_call.input, ctx).await,
            None => Err(ToolError::UnknownTool {
                name: tool_call.name.clone(),
            }),
        };

        let result = match outcome {
            Ok(data) => ToolResult::success(data),
            Err(e) => ToolResult::from(e),
        };

        debug!(tool = %tool_call.name, result = %result.to_wire(), "ToolExecutor::execute: tool response");
        result
    }

    /// Execute calls sequentially; the i-th result belongs to the i-th call
    pub async fn execute_all(&self, tool_calls: &[ToolCall], ctx: &ToolContext) -> Vec<ToolResult> {
        let mut results = Vec::with_capacity(tool_calls.len());

        for call in tool_calls {
            results.push(self.execute(call, ctx).await);
        }

        results
    }
}

impl Default for ToolExecutor {
    fn default() -> Self {
        Self::standard()
    }
}
