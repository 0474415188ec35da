// ABOUTME: Defines the ToolResult type - the uniform envelope for tool
// ABOUTME: call outcomes with content, error state, and metadata.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::DispatchError;

/// Result of a tool call.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolResult {
    /// The output text, or the error description.
    pub content: String,

    /// Whether this result represents a failed call.
    pub is_error: bool,

    /// Optional metadata about the call.
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl ToolResult {
    /// Create a successful text result.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_error: false,
            metadata: BTreeMap::new(),
        }
    }

    /// Create an error result.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            content: message.into(),
            is_error: true,
            metadata: BTreeMap::new(),
        }
    }

    /// Create an error result from a dispatch failure, tagged with its kind.
    pub fn from_error(err: &DispatchError) -> Self {
        Self::error(err.to_string()).with_metadata("error_kind", err.kind())
    }

    /// Add metadata to the result.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        if let Ok(v) = serde_json::to_value(value) {
            self.metadata.insert(key.into(), v);
        }
        self
    }
}
