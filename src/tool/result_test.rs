// ABOUTME: Tests for ToolResult - constructors, metadata, error tagging.
// ABOUTME: Verifies the result envelope works correctly.

use super::*;
use crate::error::DispatchError;

#[test]
fn test_text_result() {
    let result = ToolResult::text("Hello, world!");
    assert_eq!(result.content, "Hello, world!");
    assert!(!result.is_error);
    assert!(result.metadata.is_empty());
}

#[test]
fn test_error_result() {
    let result = ToolResult::error("Something went wrong");
    assert_eq!(result.content, "Something went wrong");
    assert!(result.is_error);
}

#[test]
fn test_with_metadata() {
    let result = ToolResult::text("output")
        .with_metadata("model", "gemini-2.5-pro")
        .with_metadata("output_tokens", 12);

    assert_eq!(result.metadata["model"], "gemini-2.5-pro");
    assert_eq!(result.metadata["output_tokens"], 12);
}

#[test]
fn test_from_unknown_tool_error() {
    let err = DispatchError::UnknownTool("gemini_unknown".to_string());
    let result = ToolResult::from_error(&err);

    assert!(result.is_error);
    assert_eq!(result.content, "Unknown tool: gemini_unknown");
    assert_eq!(result.metadata["error_kind"], "unknown_tool");
}
