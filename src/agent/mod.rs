//! Turn orchestration
//!
//! One call to [`Agent::run_turn`] drives a whole conversational turn:
//!
//! ```text
//! AwaitingInput -> Streaming -> (ExecutingTools -> Streaming)* -> TurnComplete
//! ```
//!
//! Entries produced during the turn are staged and only committed to the
//! [`History`] once the turn completes, so a transport failure leaves the
//! history exactly as it was before the turn started.

mod error;
mod history;
mod merge;
mod transcript;

pub use error::AgentError;
pub use history::History;
pub use merge::{MergedResponse, ResponseBuilder};
pub use transcript::{NullTranscript, TranscriptSink};

use std::sync::Arc;

use futures::StreamExt;
use tracing::{debug, info, warn};

use crate::llm::{CompletionRequest, ContentBlock, LlmClient, Message, StopReason, TokenUsage};
use crate::tools::{ToolContext, ToolExecutor};

/// Built-in system prompt
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a coding assistant working inside a single project directory.

You can use these tools:
- read_file: read a text file
- write_file: create or overwrite a file (the parent directory must exist)
- list_files: list a directory; directories end with '/'
- fetch_url: fetch a web page or JSON document over http(s)

All paths are relative to the project root. Paths that leave the project root are refused.
Tool results are JSON objects {\"ok\": bool, \"data\": ..., \"error\": {\"code\", \"message\", \"suggestions\"}}.
When a tool fails, read the error and its suggestions before trying again.
Be concise.";

const DEFAULT_MAX_TOKENS: u32 = 8192;

/// What a completed turn did
#[derive(Debug, Clone, PartialEq)]
pub struct TurnOutcome {
    /// Number of tool-call rounds executed
    pub tool_rounds: usize,

    /// Entries committed to the history
    pub entries_appended: usize,

    /// Why the final model invocation stopped
    pub stop_reason: Option<StopReason>,
}

/// Conversation owner and turn driver
pub struct Agent {
    llm: Arc<dyn LlmClient>,
    executor: ToolExecutor,
    context: ToolContext,
    model: String,
    system_prompt: String,
    max_tokens: u32,
    history: History,
    usage: TokenUsage,
}

impl Agent {
    pub fn new(llm: Arc<dyn LlmClient>, context: ToolContext, model: impl Into<String>) -> Self {
        let model = model.into();
        debug!(%model, root = %context.root().display(), "Agent::new: called");
        Self {
            llm,
            executor: ToolExecutor::standard(),
            context,
            model,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            history: History::new(),
            usage: TokenUsage::default(),
        }
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = system_prompt.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_executor(mut self, executor: ToolExecutor) -> Self {
        self.executor = executor;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Tokens consumed so far in this session, including failed turns
    pub fn usage(&self) -> &TokenUsage {
        &self.usage
    }

    pub fn executor(&self) -> &ToolExecutor {
        &self.executor
    }

    pub fn context(&self) -> &ToolContext {
        &self.context
    }

    /// Run one conversational turn for a line of user input
    pub async fn run_turn(&mut self, input: &str, sink: &mut dyn TranscriptSink) -> Result<TurnOutcome, AgentError> {
        debug!(input_len = %input.len(), history_len = %self.history.len(), "Agent::run_turn: called");
        let mut staged = vec![Message::user(input)];
        let mut tool_rounds = 0;

        loop {
            let response = self.stream_response(&staged, sink).await?;
            let calls = response.message.tool_calls();
            let stop_reason = response.stop_reason;
            staged.push(response.message);

            if calls.is_empty() {
                let entries_appended = staged.len();
                self.history.commit(staged);
                info!(%tool_rounds, %entries_appended, "Agent::run_turn: turn complete");
                return Ok(TurnOutcome {
                    tool_rounds,
                    entries_appended,
                    stop_reason,
                });
            }

            if stop_reason == Some(StopReason::MaxTokens) {
                warn!(call_count = %calls.len(), "Agent::run_turn: tool calls in a truncated response");
            }

            for call in &calls {
                sink.tool_call(&call.name);
            }
            let results = self.executor.execute_all(&calls, &self.context).await;
            let blocks = calls
                .iter()
                .zip(&results)
                .map(|(call, result)| ContentBlock::tool_result(&call.id, result.to_wire(), result.is_error()))
                .collect();
            staged.push(Message::user_blocks(blocks));
            tool_rounds += 1;
        }
    }

    /// Issue one model invocation over committed history plus staged entries
    async fn stream_response(
        &mut self,
        staged: &[Message],
        sink: &mut dyn TranscriptSink,
    ) -> Result<MergedResponse, AgentError> {
        let request = CompletionRequest {
            model: self.model.clone(),
            system_prompt: self.system_prompt.clone(),
            messages: self.history.entries().iter().chain(staged).cloned().collect(),
            tools: self.executor.definitions(),
            max_tokens: self.max_tokens,
        };
        debug!(message_count = %request.messages.len(), "Agent::stream_response: called");

        let mut stream = self.llm.stream(request).await?;
        let mut builder = ResponseBuilder::default();

        while let Some(chunk) = stream.next().await {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(e) => {
                    sink.response_end();
                    warn!(error = %e, "Agent::stream_response: stream failed");
                    return Err(e.into());
                }
            };
            for block in &chunk.blocks {
                if let ContentBlock::Text { text } = block
                    && !text.is_empty()
                {
                    sink.text(text);
                }
            }
            if let Some(usage) = &chunk.usage {
                self.usage.add(usage);
            }
            builder.push(chunk);
        }
        sink.response_end();

        Ok(builder.finish())
    }
}
