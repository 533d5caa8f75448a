//! Sandbox rejection types

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error codes shared by sandbox rejections and tool failures
///
/// These strings are part of the tool result wire shape and must stay stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidArgument,
    NotFound,
    PermissionDenied,
    IoError,
    NetworkError,
    ParseError,
}

impl ErrorCode {
    /// Wire representation of the code
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidArgument => "invalid_argument",
            Self::NotFound => "not_found",
            Self::PermissionDenied => "permission_denied",
            Self::IoError => "io_error",
            Self::NetworkError => "network_error",
            Self::ParseError => "parse_error",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured rejection from the path sandbox
///
/// Carries a code, a human-readable message, and zero or more suggestions
/// the model can act on. Never wraps a raw filesystem error string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct SandboxError {
    pub code: ErrorCode,
    pub message: String,
    pub suggestions: Vec<String>,
}

impl SandboxError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::InvalidArgument,
            message: message.into(),
            suggestions: Vec::new(),
        }
    }

    pub fn not_found(message: impl Into<String>, suggestions: Vec<String>) -> Self {
        Self {
            code: ErrorCode::NotFound,
            message: message.into(),
            suggestions,
        }
    }

    /// Containment violation; the only hint offered is to stay under the root
    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::PermissionDenied,
            message: message.into(),
            suggestions: vec!["Use a relative path under the project root (e.g., './subdir/file.txt')".to_string()],
        }
    }
}
