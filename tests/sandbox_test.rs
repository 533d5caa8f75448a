//! Integration tests for sandboxed tool execution
//!
//! Drive the public tool executor against a real temporary project root and
//! check the envelopes the model would see.

use std::fs;

use editagent::llm::ToolCall;
use editagent::sandbox::{AccessKind, ErrorCode, PathSandbox};
use editagent::tools::{ToolContext, ToolExecutor, ToolResult};
use proptest::prelude::*;
use serde_json::{Value, json};
use tempfile::TempDir;

fn workspace() -> (TempDir, ToolContext) {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let ws = temp.path().join("ws");
    fs::create_dir(&ws).unwrap();
    let ctx = ToolContext::new(PathSandbox::new(&ws).unwrap());
    (temp, ctx)
}

async fn run(ctx: &ToolContext, name: &str, input: Value) -> ToolResult {
    let call = ToolCall {
        id: "call".to_string(),
        name: name.to_string(),
        input,
    };
    ToolExecutor::standard().execute(&call, ctx).await
}

fn wire(result: &ToolResult) -> Value {
    serde_json::from_str(&result.to_wire()).unwrap()
}

// =============================================================================
// Escapes and suggestions
// =============================================================================

#[tokio::test]
async fn test_parent_traversal_is_permission_denied() {
    let (temp, ctx) = workspace();
    fs::write(temp.path().join("secret.txt"), "top secret").unwrap();

    let result = run(&ctx, "read_file", json!({"path": "../secret.txt"})).await;
    let envelope = wire(&result);

    assert_eq!(envelope["ok"], false);
    assert_eq!(envelope["error"]["code"], "permission_denied");
    assert!(envelope.get("data").is_none());
    assert!(!result.to_wire().contains("top secret"));
}

#[tokio::test]
async fn test_parent_traversal_to_missing_file_is_permission_denied() {
    let (_temp, ctx) = workspace();

    let result = run(&ctx, "read_file", json!({"path": "../does-not-exist.txt"})).await;

    assert_eq!(wire(&result)["error"]["code"], "permission_denied");
}

#[tokio::test]
async fn test_absolute_path_outside_root_is_rejected() {
    let (_temp, ctx) = workspace();

    let result = run(&ctx, "read_file", json!({"path": "/etc/passwd"})).await;
    let envelope = wire(&result);

    assert_eq!(envelope["ok"], false);
    let code = envelope["error"]["code"].as_str().unwrap();
    assert!(code == "permission_denied" || code == "not_found");
    assert!(envelope.get("data").is_none());
}

#[tokio::test]
async fn test_absolute_path_inside_root_is_allowed() {
    let (_temp, ctx) = workspace();
    fs::write(ctx.root().join("inside.txt"), "hello").unwrap();
    let absolute = ctx.root().join("inside.txt");

    let result = run(&ctx, "read_file", json!({"path": absolute.to_str().unwrap()})).await;

    assert_eq!(wire(&result), json!({"ok": true, "data": {"content": "hello"}}));
}

#[tokio::test]
async fn test_missing_file_suggests_similar_sibling() {
    let (_temp, ctx) = workspace();
    fs::write(ctx.root().join("present.txt"), "here").unwrap();

    let result = run(&ctx, "read_file", json!({"path": "present"})).await;
    let envelope = wire(&result);

    assert_eq!(envelope["error"]["code"], "not_found");
    assert_eq!(envelope["error"]["suggestions"], json!(["did you mean 'present.txt'?"]));
}

#[tokio::test]
async fn test_missing_file_without_similar_sibling_has_no_suggestions() {
    let (_temp, ctx) = workspace();
    fs::write(ctx.root().join("present.txt"), "here").unwrap();

    let result = run(&ctx, "read_file", json!({"path": "missing.txt"})).await;
    let envelope = wire(&result);

    assert_eq!(envelope["error"]["code"], "not_found");
    assert!(result.error.as_ref().unwrap().suggestions.is_empty());
    assert!(envelope["error"].get("suggestions").is_none());
}

#[tokio::test]
async fn test_suggestions_capped_at_three() {
    let (_temp, ctx) = workspace();
    for name in ["notes1.md", "notes2.md", "notes3.md", "notes4.md"] {
        fs::write(ctx.root().join(name), "").unwrap();
    }

    let result = run(&ctx, "read_file", json!({"path": "notes"})).await;

    assert_eq!(result.error.unwrap().suggestions.len(), 3);
}

// =============================================================================
// Write / list round trip
// =============================================================================

#[tokio::test]
async fn test_write_then_read_then_list() {
    let (_temp, ctx) = workspace();
    fs::create_dir(ctx.root().join("src")).unwrap();

    let write = run(&ctx, "write_file", json!({"path": "src/main.rs", "content": "fn main() {}"})).await;
    assert_eq!(wire(&write)["data"]["message"], "wrote 12 bytes to src/main.rs");

    let read = run(&ctx, "read_file", json!({"path": "./src/../src/main.rs"})).await;
    assert_eq!(wire(&read)["data"]["content"], "fn main() {}");

    fs::write(ctx.root().join("README.md"), "").unwrap();
    let list = run(&ctx, "list_files", json!({"path": "."})).await;
    assert_eq!(wire(&list)["data"]["files"], json!(["README.md", "src/"]));
}

#[tokio::test]
async fn test_write_into_missing_directory_is_not_found() {
    let (_temp, ctx) = workspace();

    let result = run(&ctx, "write_file", json!({"path": "nope/file.txt", "content": "x"})).await;

    assert_eq!(wire(&result)["error"]["code"], "not_found");
    assert!(!ctx.root().join("nope").exists());
}

#[tokio::test]
async fn test_missing_argument_names_key() {
    let (_temp, ctx) = workspace();

    let result = run(&ctx, "write_file", json!({"path": "a.txt"})).await;
    let envelope = wire(&result);

    assert_eq!(envelope["error"]["code"], "invalid_argument");
    assert!(envelope["error"]["message"].as_str().unwrap().contains("content"));
    assert!(!ctx.root().join("a.txt").exists());
}

// =============================================================================
// Symlinks
// =============================================================================

#[cfg(unix)]
mod symlinks {
    use super::*;
    use std::os::unix::fs::symlink;

    #[tokio::test]
    async fn test_link_to_outside_file_is_not_readable() {
        let (temp, ctx) = workspace();
        fs::write(temp.path().join("secret.txt"), "top secret").unwrap();
        symlink(temp.path().join("secret.txt"), ctx.root().join("innocent.txt")).unwrap();

        let result = run(&ctx, "read_file", json!({"path": "innocent.txt"})).await;

        assert!(result.is_error());
        let code = result.error.as_ref().unwrap().code;
        assert!(code == ErrorCode::PermissionDenied || code == ErrorCode::NotFound);
        assert!(!result.to_wire().contains("top secret"));
    }

    #[tokio::test]
    async fn test_link_to_outside_dir_is_not_listable() {
        let (temp, ctx) = workspace();
        fs::create_dir(temp.path().join("outside")).unwrap();
        fs::write(temp.path().join("outside/private.key"), "").unwrap();
        symlink(temp.path().join("outside"), ctx.root().join("docs")).unwrap();

        let result = run(&ctx, "list_files", json!({"path": "docs"})).await;

        assert!(result.is_error());
        assert!(!result.to_wire().contains("private.key"));
    }

    #[tokio::test]
    async fn test_write_through_symlinked_parent_is_rejected() {
        let (temp, ctx) = workspace();
        fs::create_dir(temp.path().join("outside")).unwrap();
        symlink(temp.path().join("outside"), ctx.root().join("out")).unwrap();

        let result = run(&ctx, "write_file", json!({"path": "out/new.txt", "content": "pwned"})).await;

        assert_eq!(result.error.unwrap().code, ErrorCode::PermissionDenied);
        assert!(!temp.path().join("outside/new.txt").exists());
    }

    #[tokio::test]
    async fn test_write_through_dangling_link_is_rejected() {
        let (temp, ctx) = workspace();
        symlink(temp.path().join("created-later.txt"), ctx.root().join("trap.txt")).unwrap();

        let result = run(&ctx, "write_file", json!({"path": "trap.txt", "content": "pwned"})).await;

        assert_eq!(result.error.unwrap().code, ErrorCode::PermissionDenied);
        assert!(!temp.path().join("created-later.txt").exists());
    }

    #[tokio::test]
    async fn test_link_inside_root_is_followed() {
        let (_temp, ctx) = workspace();
        fs::write(ctx.root().join("real.txt"), "real").unwrap();
        symlink(ctx.root().join("real.txt"), ctx.root().join("alias.txt")).unwrap();

        let result = run(&ctx, "read_file", json!({"path": "alias.txt"})).await;

        assert_eq!(wire(&result)["data"]["content"], "real");
    }
}

// =============================================================================
// Properties
// =============================================================================

fn segment() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => "[a-z]{1,6}".prop_map(String::from),
        2 => Just("..".to_string()),
        1 => Just(".".to_string()),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]

    #[test]
    fn proptest_resolved_paths_stay_inside_root(segments in prop::collection::vec(segment(), 1..8)) {
        let (_temp, ctx) = workspace();
        fs::create_dir_all(ctx.root().join("a/b")).unwrap();
        fs::write(ctx.root().join("a/b/c"), "").unwrap();
        let sandbox = PathSandbox::new(ctx.root()).unwrap();
        let user_path = segments.join("/");

        for access in [AccessKind::Read, AccessKind::Write, AccessKind::List] {
            match sandbox.resolve(&user_path, access) {
                Ok(resolved) => prop_assert!(resolved.starts_with(sandbox.root())),
                Err(e) => prop_assert!(matches!(
                    e.code,
                    ErrorCode::PermissionDenied | ErrorCode::NotFound | ErrorCode::InvalidArgument
                )),
            }
        }
    }

    #[test]
    fn proptest_leading_escape_is_permission_denied(
        depth in 1usize..4,
        tail in prop::collection::vec("[a-z]{1,6}", 0..3),
    ) {
        let (_temp, ctx) = workspace();
        let sandbox = PathSandbox::new(ctx.root()).unwrap();
        // Root is <tmp>/ws, so going up once more than the tail goes down escapes
        let mut parts: Vec<String> = vec!["..".to_string(); depth + tail.len()];
        parts.extend(tail);
        let user_path = parts.join("/");

        let err = sandbox.resolve(&user_path, AccessKind::Read).unwrap_err();
        prop_assert_eq!(err.code, ErrorCode::PermissionDenied);
    }

    #[test]
    fn proptest_resolve_is_idempotent(segments in prop::collection::vec(segment(), 1..6)) {
        let (_temp, ctx) = workspace();
        fs::create_dir_all(ctx.root().join("a/b")).unwrap();
        let sandbox = PathSandbox::new(ctx.root()).unwrap();
        let user_path = segments.join("/");

        for access in [AccessKind::Read, AccessKind::Write, AccessKind::List] {
            prop_assert_eq!(sandbox.resolve(&user_path, access), sandbox.resolve(&user_path, access));
        }
    }
}
