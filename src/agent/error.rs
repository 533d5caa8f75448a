//! Turn-level errors

use thiserror::Error;

use crate::llm::LlmError;

/// A failure that aborts the current turn
///
/// Tool failures never surface here; they travel back to the model as
/// `ok: false` results.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("model transport failed: {0}")]
    Transport(#[from] LlmError),
}
