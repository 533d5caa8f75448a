//! fetch_url tool - fetch and decode content from a URL
//!
//! The only tool that does not go through the path sandbox: it performs
//! network I/O and never touches the filesystem.

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::tools::args::string_arg;
use crate::tools::{Tool, ToolContext, ToolError};

/// Largest response body accepted
const MAX_BODY_BYTES: usize = 1_000_000;

/// Text bodies are cut to this many characters
const MAX_TEXT_CHARS: usize = 50_000;

/// Fetch content from a URL; JSON is decoded, HTML converted to markdown
pub struct FetchUrlTool;

#[async_trait]
impl Tool for FetchUrlTool {
    fn name(&self) -> &'static str {
        "fetch_url"
    }

    fn description(&self) -> &'static str {
        "Fetch content from an http(s) URL. JSON responses are decoded, HTML is converted to markdown."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "url": {
                    "type": "string",
                    "description": "URL to fetch (http:// or https://)."
                }
            },
            "required": ["url"]
        })
    }

    async fn execute(&self, input: &Value, _ctx: &ToolContext) -> Result<Value, ToolError> {
        let url = string_arg(input, "url")?;

        if !url.starts_with("http://") && !url.starts_with("https://") {
            debug!(%url, "FetchUrlTool::execute: invalid URL protocol");
            return Err(ToolError::InvalidArgument("URL must start with http:// or https://".to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .user_agent("editagent/0.1 (fetch tool)")
            .build()
            .unwrap_or_default();

        debug!(%url, "FetchUrlTool::execute: sending HTTP request");
        let response = client
            .get(url)
            .send()
            .await
            .map_err(|e| ToolError::Network(format!("failed to fetch URL: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            debug!(%status, "FetchUrlTool::execute: HTTP error status");
            return Err(ToolError::Network(format!("HTTP error: {}", status)));
        }

        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        let body = response
            .text()
            .await
            .map_err(|e| ToolError::Network(format!("failed to read response: {}", e)))?;

        if body.len() > MAX_BODY_BYTES {
            debug!(body_len = body.len(), "FetchUrlTool::execute: response too large");
            return Err(ToolError::Network("response too large (> 1MB)".to_string()));
        }

        let decoded = decode_body(&content_type, body)?;
        Ok(serde_json::json!({
            "url": url,
            "status": status.as_u16(),
            "content_type": content_type,
            "body": decoded,
        }))
    }
}

/// Decode a response body according to its content type
fn decode_body(content_type: &str, body: String) -> Result<Value, ToolError> {
    debug!(%content_type, body_len = body.len(), "decode_body: called");
    if content_type.contains("application/json") || content_type.contains("+json") {
        return serde_json::from_str(&body)
            .map_err(|e| ToolError::Parse(format!("failed to parse JSON response: {}", e)));
    }

    let text = if content_type.contains("text/html") || content_type.contains("application/xhtml") {
        html2md::rewrite_html(&body, false)
    } else {
        body
    };
    Ok(Value::String(truncate_chars(text, MAX_TEXT_CHARS)))
}

/// Cut `text` to at most `max` characters, noting the original length
fn truncate_chars(text: String, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...\n\n[truncated, {} chars total]", &text[..cut], text.chars().count()),
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sandbox::{ErrorCode, PathSandbox};
    use tempfile::tempdir;

    fn context(root: &std::path::Path) -> ToolContext {
        ToolContext::new(PathSandbox::new(root).unwrap())
    }

    #[test]
    fn test_decode_json_body() {
        let value = decode_body("application/json; charset=utf-8", r#"{"temp": 21.5}"#.to_string()).unwrap();
        assert_eq!(value["temp"], 21.5);
    }

    #[test]
    fn test_decode_malformed_json_is_parse_error() {
        let err = decode_body("application/json", "{not json".to_string()).unwrap_err();
        assert_eq!(err.code(), ErrorCode::ParseError);
    }

    #[test]
    fn test_decode_html_to_markdown() {
        let html = "<html><body><h1>Hello World</h1><p>This is a paragraph.</p></body></html>";
        let value = decode_body("text/html", html.to_string()).unwrap();
        let text = value.as_str().unwrap();
        assert!(text.contains("Hello World"));
        assert!(text.contains("This is a paragraph"));
    }

    #[test]
    fn test_decode_plain_text_passthrough() {
        let value = decode_body("text/plain", "just text".to_string()).unwrap();
        assert_eq!(value, Value::String("just text".to_string()));
    }

    #[test]
    fn test_truncate_chars_respects_char_boundaries() {
        let text = "héllo wörld".to_string();
        let cut = truncate_chars(text, 3);
        assert!(cut.starts_with("hél..."));
        assert!(cut.contains("11 chars total"));

        assert_eq!(truncate_chars("short".to_string(), 10), "short");
    }

    #[tokio::test]
    async fn test_fetch_invalid_url() {
        let temp = tempdir().unwrap();
        let err = FetchUrlTool
            .execute(&serde_json::json!({"url": "not-a-url"}), &context(temp.path()))
            .await
            .unwrap_err();

        assert_eq!(err.code(), ErrorCode::InvalidArgument);
        assert!(err.to_string().contains("http"));
    }

    #[tokio::test]
    async fn test_fetch_missing_url() {
        let temp = tempdir().unwrap();
        let err = FetchUrlTool
            .execute(&serde_json::json!({}), &context(temp.path()))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "missing argument: url");
    }
}
