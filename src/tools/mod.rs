//! Tool system
//!
//! Tools give the model read, write, and list access to the project root,
//! plus one network fetch. Filesystem tools resolve every path through the
//! [`PathSandbox`](crate::sandbox::PathSandbox) held by [`ToolContext`]
//! before any I/O, and every outcome is reported as a [`ToolResult`]
//! envelope.

mod args;
mod context;
mod error;
mod executor;
mod traits;

pub mod builtin;

pub use args::string_arg;
pub use context::ToolContext;
pub use error::ToolError;
pub use executor::{ToolExecutor, ToolKind};
pub use traits::{ErrorPayload, Tool, ToolResult};
