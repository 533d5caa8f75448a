//! Anthropic Claude API client implementation
//!
//! Implements the LlmClient trait for Anthropic's Messages API. Responses are
//! streamed over server-sent events and surfaced as a lazy `ChunkStream`.

use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use reqwest_eventsource::{Event, EventSource, retry::Never};
use serde::Deserialize;
use tracing::{debug, warn};

use super::{
    ChunkStream, CompletionRequest, ContentBlock, LlmClient, LlmError, Message, ModelInfo, Role, StopReason,
    StreamChunk, TokenUsage,
};
use crate::config::LlmConfig;

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Sent in place of an empty model entry; the API rejects empty content
const EMPTY_CONTENT_PLACEHOLDER: &str = "(no content)";

/// Anthropic Claude API client
pub struct AnthropicClient {
    api_key: String,
    base_url: String,
    http: Client,
    max_tokens: u32,
}

impl AnthropicClient {
    /// Create a new client from configuration
    ///
    /// Reads the API key from the environment variable named in config.
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        debug!(?config, "AnthropicClient::from_config: called");
        let api_key = config.get_api_key()?;

        let http = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(LlmError::Network)?;

        Ok(Self {
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
            max_tokens: config.max_tokens,
        })
    }

    /// Build the request body for the Anthropic API
    fn build_request_body(&self, request: &CompletionRequest) -> serde_json::Value {
        debug!(%request.model, %request.max_tokens, "AnthropicClient::build_request_body: called");
        let mut body = serde_json::json!({
            "model": request.model,
            "max_tokens": request.max_tokens.min(self.max_tokens),
            "system": request.system_prompt,
            "messages": convert_messages(&request.messages),
            "stream": true,
        });

        if !request.tools.is_empty() {
            body["tools"] = serde_json::json!(
                request
                    .tools
                    .iter()
                    .map(|t| t.to_anthropic_schema())
                    .collect::<Vec<_>>()
            );
        }

        body
    }

    fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.http
            .post(format!("{}{}", self.base_url, path))
            .header("x-api-key", self.api_key.clone())
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
    }
}

/// Convert conversation entries to Anthropic API format
fn convert_messages(messages: &[Message]) -> Vec<serde_json::Value> {
    debug!(message_count = %messages.len(), "convert_messages: called");
    messages
        .iter()
        .map(|msg| {
            let role = match msg.role {
                Role::User => "user",
                Role::Model => "assistant",
            };

            let mut content: Vec<serde_json::Value> = msg
                .content
                .iter()
                .filter(|block| !matches!(block, ContentBlock::Text { text } if text.is_empty()))
                .map(convert_content_block)
                .collect();

            if content.is_empty() {
                debug!(%role, "convert_messages: empty entry, using placeholder");
                content.push(serde_json::json!({"type": "text", "text": EMPTY_CONTENT_PLACEHOLDER}));
            }

            serde_json::json!({
                "role": role,
                "content": content,
            })
        })
        .collect()
}

/// Convert a ContentBlock to Anthropic API format
fn convert_content_block(block: &ContentBlock) -> serde_json::Value {
    match block {
        ContentBlock::Text { text } => serde_json::json!({
            "type": "text",
            "text": text,
        }),
        ContentBlock::ToolUse { id, name, input } => serde_json::json!({
            "type": "tool_use",
            "id": id,
            "name": name,
            "input": input,
        }),
        ContentBlock::ToolResult {
            tool_use_id,
            content,
            is_error,
        } => serde_json::json!({
            "type": "tool_result",
            "tool_use_id": tool_use_id,
            "content": content,
            "is_error": is_error,
        }),
    }
}

/// What a single SSE payload means for the stream
#[derive(Debug, PartialEq)]
enum Decoded {
    Chunk(StreamChunk),
    Skip,
    Done,
}

/// Per-invocation SSE decoding state
///
/// Text deltas pass straight through. Tool input arrives as partial JSON and
/// is only emitted once its content block closes. A response is complete
/// only once `message_stop` has been seen.
#[derive(Debug, Default)]
struct SseDecoder {
    current_tool: Option<(String, String, String)>, // (id, name, json_acc)
    usage: TokenUsage,
    saw_stop: bool,
}

impl SseDecoder {
    fn decode(&mut self, data: &str) -> Result<Decoded, LlmError> {
        let data: serde_json::Value = serde_json::from_str(data)?;

        match data["type"].as_str() {
            Some("message_start") => {
                if let Some(u) = data["message"].get("usage") {
                    self.usage.input_tokens = u["input_tokens"].as_u64().unwrap_or(0);
                    self.usage.cache_read_tokens = u["cache_read_input_tokens"].as_u64().unwrap_or(0);
                    self.usage.cache_creation_tokens = u["cache_creation_input_tokens"].as_u64().unwrap_or(0);
                }
                Ok(Decoded::Skip)
            }
            Some("content_block_start") => {
                if let Some(block) = data.get("content_block")
                    && block["type"] == "tool_use"
                {
                    let id = block["id"].as_str().unwrap_or("").to_string();
                    let name = block["name"].as_str().unwrap_or("").to_string();
                    debug!(%id, %name, "SseDecoder::decode: tool_use start");
                    self.current_tool = Some((id, name, String::new()));
                }
                Ok(Decoded::Skip)
            }
            Some("content_block_delta") => {
                let delta = &data["delta"];
                if let Some(text) = delta["text"].as_str() {
                    return Ok(Decoded::Chunk(StreamChunk::text(text)));
                }
                if let Some(json) = delta["partial_json"].as_str()
                    && let Some((_, _, ref mut acc)) = self.current_tool
                {
                    acc.push_str(json);
                }
                Ok(Decoded::Skip)
            }
            Some("content_block_stop") => match self.current_tool.take() {
                Some((id, name, json)) => {
                    let input = if json.trim().is_empty() {
                        serde_json::json!({})
                    } else {
                        serde_json::from_str(&json).unwrap_or_else(|e| {
                            warn!(%id, %name, error = %e, "SseDecoder::decode: invalid tool input JSON");
                            serde_json::json!({})
                        })
                    };
                    Ok(Decoded::Chunk(StreamChunk::tool_use(id, name, input)))
                }
                None => Ok(Decoded::Skip),
            },
            Some("message_delta") => {
                if let Some(u) = data.get("usage") {
                    self.usage.output_tokens = u["output_tokens"].as_u64().unwrap_or(0);
                }
                match data["delta"]["stop_reason"].as_str() {
                    Some(sr) => Ok(Decoded::Chunk(StreamChunk::done(
                        StopReason::from_anthropic(sr),
                        self.usage.clone(),
                    ))),
                    None => Ok(Decoded::Skip),
                }
            }
            Some("message_stop") => {
                self.saw_stop = true;
                Ok(Decoded::Done)
            }
            Some("error") => {
                let message = data["error"]["message"].as_str().unwrap_or("unknown error").to_string();
                Err(LlmError::Stream(message))
            }
            _ => Ok(Decoded::Skip),
        }
    }

    /// Check the event stream may end here
    fn finish(&self) -> Result<(), LlmError> {
        if self.saw_stop {
            return Ok(());
        }
        match &self.current_tool {
            Some((id, name, _)) => Err(LlmError::Stream(format!(
                "stream ended inside tool call {} ({}) before message_stop",
                name, id
            ))),
            None => Err(LlmError::Stream("stream ended before message_stop".to_string())),
        }
    }
}

struct SseState {
    es: EventSource,
    decoder: SseDecoder,
    finished: bool,
}

impl SseState {
    fn fail(mut self, err: LlmError) -> Option<(Result<StreamChunk, LlmError>, Self)> {
        self.es.close();
        self.finished = true;
        Some((Err(err), self))
    }
}

#[async_trait]
impl LlmClient for AnthropicClient {
    async fn stream(&self, request: CompletionRequest) -> Result<ChunkStream, LlmError> {
        debug!(%request.model, message_count = %request.messages.len(), "AnthropicClient::stream: called");
        let body = self.build_request_body(&request);

        let mut es = EventSource::new(self.post("/v1/messages").json(&body))
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;
        es.set_retry_policy(Box::new(Never));

        let state = SseState {
            es,
            decoder: SseDecoder::default(),
            finished: false,
        };

        let stream = futures::stream::unfold(state, |mut state| async move {
            if state.finished {
                return None;
            }
            loop {
                match state.es.next().await {
                    None | Some(Err(reqwest_eventsource::Error::StreamEnded)) => {
                        debug!("AnthropicClient::stream: event stream ended");
                        return match state.decoder.finish() {
                            Ok(()) => None,
                            Err(e) => {
                                warn!(error = %e, "AnthropicClient::stream: truncated response");
                                state.fail(e)
                            }
                        };
                    }
                    Some(Ok(Event::Open)) => continue,
                    Some(Ok(Event::Message(msg))) => match state.decoder.decode(&msg.data) {
                        Ok(Decoded::Chunk(chunk)) => return Some((Ok(chunk), state)),
                        Ok(Decoded::Skip) => continue,
                        Ok(Decoded::Done) => {
                            debug!("AnthropicClient::stream: message_stop");
                            state.es.close();
                            return None;
                        }
                        Err(e) => return state.fail(e),
                    },
                    Some(Err(reqwest_eventsource::Error::InvalidStatusCode(status, response))) => {
                        let retry_after = response
                            .headers()
                            .get("retry-after")
                            .and_then(|v| v.to_str().ok())
                            .map(str::to_string);
                        let text = response.text().await.unwrap_or_default();
                        debug!(%status, "AnthropicClient::stream: API error");
                        return state.fail(LlmError::from_status(status.as_u16(), retry_after.as_deref(), text));
                    }
                    Some(Err(e)) => {
                        debug!(error = %e, "AnthropicClient::stream: transport error");
                        return state.fail(LlmError::Stream(e.to_string()));
                    }
                }
            }
        });

        Ok(Box::pin(stream))
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>, LlmError> {
        debug!("AnthropicClient::list_models: called");
        let response = self
            .http
            .get(format!("{}/v1/models", self.base_url))
            .header("x-api-key", self.api_key.clone())
            .header("anthropic-version", ANTHROPIC_VERSION)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            let text = response.text().await.unwrap_or_default();
            return Err(LlmError::from_status(status.as_u16(), retry_after.as_deref(), text));
        }

        let page: ModelsPage = response.json().await?;
        debug!(count = %page.data.len(), "AnthropicClient::list_models: success");
        Ok(page.data)
    }
}

#[derive(Debug, Deserialize)]
struct ModelsPage {
    data: Vec<ModelInfo>,
}
