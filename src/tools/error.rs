//! Tool error types

use thiserror::Error;

use crate::sandbox::{ErrorCode, SandboxError};

/// Errors that can occur during tool execution
///
/// Each variant maps to exactly one wire [`ErrorCode`]; the executor turns
/// these into [`ToolResult`](super::ToolResult) envelopes before anything
/// reaches the model.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("missing argument: {key}")]
    MissingArgument { key: &'static str },

    #[error("argument {key} must be a {expected}")]
    WrongArgumentType { key: &'static str, expected: &'static str },

    #[error("unknown tool: {name}")]
    UnknownTool { name: String },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Sandbox(#[from] SandboxError),

    #[error("{context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Network(String),

    #[error("{0}")]
    Parse(String),
}

impl ToolError {
    /// Wrap a storage failure with what was being attempted
    pub fn io(context: &'static str, source: std::io::Error) -> Self {
        Self::Io { context, source }
    }

    /// Wire error code for this failure
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::MissingArgument { .. }
            | Self::WrongArgumentType { .. }
            | Self::UnknownTool { .. }
            | Self::InvalidArgument(_) => ErrorCode::InvalidArgument,
            Self::Sandbox(e) => e.code,
            Self::Io { .. } => ErrorCode::IoError,
            Self::Network(_) => ErrorCode::NetworkError,
            Self::Parse(_) => ErrorCode::ParseError,
        }
    }

    /// Suggestions carried through from the sandbox, if any
    pub fn suggestions(&self) -> &[String] {
        match self {
            Self::Sandbox(e) => &e.suggestions,
            _ => &[],
        }
    }
}
