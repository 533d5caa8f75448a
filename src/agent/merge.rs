//! Folding streamed fragments into one model entry

use tracing::debug;

use crate::llm::{ContentBlock, Message, StopReason, StreamChunk, TokenUsage};

/// Accumulates the fragments of one model invocation
///
/// Adjacent text pieces are coalesced; tool calls keep their position
/// relative to the surrounding text.
#[derive(Debug, Default)]
pub struct ResponseBuilder {
    blocks: Vec<ContentBlock>,
    stop_reason: Option<StopReason>,
    usage: Option<TokenUsage>,
}

/// The merged result of one model invocation
#[derive(Debug, Clone)]
pub struct MergedResponse {
    pub message: Message,
    pub stop_reason: Option<StopReason>,
    pub usage: Option<TokenUsage>,
}

impl ResponseBuilder {
    pub fn push(&mut self, chunk: StreamChunk) {
        for block in chunk.blocks {
            if let ContentBlock::Text { text } = &block {
                if text.is_empty() {
                    continue;
                }
                if let Some(ContentBlock::Text { text: acc }) = self.blocks.last_mut() {
                    acc.push_str(text);
                    continue;
                }
            }
            self.blocks.push(block);
        }
        if chunk.stop_reason.is_some() {
            self.stop_reason = chunk.stop_reason;
        }
        if chunk.usage.is_some() {
            self.usage = chunk.usage;
        }
    }

    pub fn finish(self) -> MergedResponse {
        debug!(block_count = %self.blocks.len(), ?self.stop_reason, "ResponseBuilder::finish: called");
        MergedResponse {
            message: Message::model_blocks(self.blocks),
            stop_reason: self.stop_reason,
            usage: self.usage,
        }
    }
}
