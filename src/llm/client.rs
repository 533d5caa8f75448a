//! LlmClient trait definition

use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;

use super::{CompletionRequest, LlmError, ModelInfo, StreamChunk};

/// A lazy, finite, non-restartable sequence of response fragments
///
/// Fragments arrive in the order the provider produced them. An `Err` item
/// ends the invocation.
pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<StreamChunk, LlmError>> + Send>>;

/// Model transport
///
/// Each call is independent: the caller sends the full conversation every
/// time and owns all history.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Start one streaming model invocation
    async fn stream(&self, request: CompletionRequest) -> Result<ChunkStream, LlmError>;

    /// Models available from the provider
    async fn list_models(&self) -> Result<Vec<ModelInfo>, LlmError>;
}
