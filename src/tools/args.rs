//! Uniform argument extraction for tool inputs

use serde_json::Value;

use super::ToolError;

/// Fetch a required string argument.
///
/// Missing keys and non-string values are reported as distinct
/// `invalid_argument` failures naming the key.
pub fn string_arg<'a>(input: &'a Value, key: &'static str) -> Result<&'a str, ToolError> {
    match input.get(key) {
        None => Err(ToolError::MissingArgument { key }),
        Some(Value::String(s)) => Ok(s),
        Some(_) => Err(ToolError::WrongArgumentType {
            key,
            expected: "string",
        }),
    }
}
