//! Path sandbox
//!
//! Maps a user- or model-supplied path string to a concrete location that is
//! guaranteed to sit inside a fixed root directory. Symlinks are resolved
//! *after* the root-relative candidate is formed, so a link inside the root
//! that points elsewhere cannot be used to escape it. Writes to new files
//! resolve the parent directory instead, which closes the same hole for
//! symlinked parent directories.
//!
//! Resolution is never cached: each call re-reads the filesystem because
//! symlink targets may change between calls.

mod error;
mod path;
mod suggest;

pub use error::{ErrorCode, SandboxError};
pub use path::{clean_path, is_within};
pub use suggest::{MAX_SUGGESTIONS, did_you_mean, rank_candidates};

use std::ffi::OsStr;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

/// Kind of access a path is being resolved for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessKind {
    /// Target must exist
    Read,
    /// Target may be new; its parent directory must exist
    Write,
    /// Target must exist
    List,
}

/// Enforces filesystem access within a root directory
#[derive(Debug, Clone)]
pub struct PathSandbox {
    /// Absolute, symlink-resolved root
    root: PathBuf,
}

impl PathSandbox {
    /// Create a sandbox rooted at `root`.
    ///
    /// The root is made absolute and symlink-resolved once, and must be a
    /// directory.
    pub fn new(root: impl AsRef<Path>) -> io::Result<Self> {
        let root = root.as_ref();
        debug!(?root, "PathSandbox::new: called");
        let root = root.canonicalize()?;
        if !root.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("sandbox root is not a directory: {}", root.display()),
            ));
        }
        debug!(?root, "PathSandbox::new: root resolved");
        Ok(Self { root })
    }

    /// The resolved root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Validate and resolve `user_path` for the given access kind.
    ///
    /// Returns the fully resolved absolute path, contained in or equal to the
    /// root, or a structured rejection.
    pub fn resolve(&self, user_path: &str, access: AccessKind) -> Result<PathBuf, SandboxError> {
        debug!(%user_path, ?access, "PathSandbox::resolve: called");
        match self.resolve_inner(user_path, access) {
            Ok(real) => {
                debug!(?real, "PathSandbox::resolve: resolved");
                Ok(real)
            }
            Err(e) => {
                debug!(code = %e.code, message = %e.message, suggestions = ?e.suggestions, "PathSandbox::resolve: rejected");
                Err(e)
            }
        }
    }

    fn resolve_inner(&self, user_path: &str, access: AccessKind) -> Result<PathBuf, SandboxError> {
        if user_path.trim().is_empty() {
            return Err(SandboxError::invalid_argument("path cannot be empty"));
        }

        let clean = clean_path(Path::new(user_path));
        let candidate = if clean.is_absolute() {
            // May reach the root through a symlinked alias; only the resolved
            // path is checked
            clean
        } else {
            let candidate = clean_path(&self.root.join(&clean));
            // Root is canonical, so a lexical escape here is a real one and is
            // rejected before anything on disk is consulted
            if !is_within(&self.root, &candidate) {
                return Err(escapes_root(user_path));
            }
            candidate
        };

        let real = match access {
            AccessKind::Read | AccessKind::List => match candidate.canonicalize() {
                Ok(real) => real,
                Err(e) => {
                    debug!(?candidate, %e, "PathSandbox::resolve_inner: candidate not resolvable");
                    return Err(SandboxError::not_found(
                        format!("path not found: {}", user_path),
                        self.suggestions_for(&candidate),
                    ));
                }
            },
            AccessKind::Write => self.resolve_write_target(user_path, &candidate)?,
        };

        if is_within(&self.root, &real) {
            Ok(real)
        } else {
            debug!(?real, root = ?self.root, "PathSandbox::resolve_inner: resolved path outside root");
            Err(escapes_root(user_path))
        }
    }

    /// Existing targets resolve fully; new targets resolve their parent and
    /// re-attach the final segment.
    fn resolve_write_target(&self, user_path: &str, candidate: &Path) -> Result<PathBuf, SandboxError> {
        if let Ok(real) = candidate.canonicalize() {
            return Ok(real);
        }

        // Something is there but cannot be followed: a dangling or looping link.
        // Writing would follow it to an unchecked location.
        if candidate.symlink_metadata().is_ok() {
            return Err(SandboxError::permission_denied(format!(
                "path exists but cannot be resolved (dangling symbolic link?): {}",
                user_path
            )));
        }

        let (parent, file_name) = match (candidate.parent(), candidate.file_name()) {
            (Some(parent), Some(file_name)) => (parent, file_name),
            _ => {
                return Err(SandboxError::invalid_argument(format!(
                    "path does not name a file: {}",
                    user_path
                )));
            }
        };

        let parent_real = parent.canonicalize().map_err(|e| {
            debug!(?parent, %e, "PathSandbox::resolve_write_target: parent not resolvable");
            let shown = Path::new(user_path)
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            SandboxError::not_found(
                format!("parent directory not found: {}", shown.display()),
                self.suggestions_for(parent),
            )
        })?;

        Ok(parent_real.join(file_name))
    }

    /// Suggestions for a missing path, drawn from its parent directory.
    ///
    /// Nothing is listed unless that directory resolves inside the root.
    fn suggestions_for(&self, missing: &Path) -> Vec<String> {
        let (Some(parent), Some(name)) = (missing.parent(), missing.file_name().and_then(OsStr::to_str)) else {
            return Vec::new();
        };

        match parent.canonicalize() {
            Ok(parent_real) if is_within(&self.root, &parent_real) => suggest::suggest_siblings(&parent_real, name),
            _ => Vec::new(),
        }
    }
}

fn escapes_root(user_path: &str) -> SandboxError {
    SandboxError::permission_denied(format!("path escapes project root: {}", user_path))
}
