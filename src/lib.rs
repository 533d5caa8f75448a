//! editagent - terminal code-editing agent
//!
//! A language model converses with the user and edits files through a small
//! set of tools. Every filesystem tool goes through a [`sandbox::PathSandbox`]
//! that keeps resolved paths inside one project root, symlinks included.
//!
//! # Modules
//!
//! - [`sandbox`] - Path resolution confined to the project root
//! - [`tools`] - Tool dispatch and the result envelope sent to the model
//! - [`llm`] - Streaming model transport (Anthropic)
//! - [`agent`] - Turn orchestration over an append-only history
//! - [`repl`] - Interactive terminal loop
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod agent;
pub mod cli;
pub mod config;
pub mod llm;
pub mod repl;
pub mod sandbox;
pub mod tools;

// Re-export commonly used types
pub use agent::{Agent, AgentError, History, TranscriptSink, TurnOutcome};
pub use config::{Config, LlmConfig};
pub use llm::{AnthropicClient, CompletionRequest, LlmClient, LlmError, StreamChunk};
pub use sandbox::{AccessKind, ErrorCode, PathSandbox, SandboxError};
pub use tools::{Tool, ToolContext, ToolError, ToolExecutor, ToolKind, ToolResult};
