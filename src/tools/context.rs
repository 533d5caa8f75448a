//! ToolContext - execution context for tools

use std::path::{Path, PathBuf};

use tracing::debug;

use super::ToolError;
use crate::sandbox::{AccessKind, PathSandbox};

/// Execution context shared by every tool call in a session
///
/// Holds the path sandbox; filesystem tools must go through
/// [`ToolContext::resolve`] before touching storage.
#[derive(Debug, Clone)]
pub struct ToolContext {
    sandbox: PathSandbox,
}

impl ToolContext {
    /// Create a new tool context
    pub fn new(sandbox: PathSandbox) -> Self {
        debug!(root = ?sandbox.root(), "ToolContext::new: called");
        Self { sandbox }
    }

    /// Sandbox root
    pub fn root(&self) -> &Path {
        self.sandbox.root()
    }

    /// Resolve a model-supplied path through the sandbox
    pub fn resolve(&self, path: &str, access: AccessKind) -> Result<PathBuf, ToolError> {
        Ok(self.sandbox.resolve(path, access)?)
    }
}
