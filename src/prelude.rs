// ABOUTME: Prelude module - convenient imports for common use cases.
// ABOUTME: Use `use gemini_mcp::prelude::*;` to get started quickly.

pub use crate::config::ServerConfig;
pub use crate::dispatch::{Dispatcher, NO_RESPONSE_TEXT, NO_SEARCH_RESULTS_TEXT};
pub use crate::error::{
    ConfigError, DispatchError, GeminiMcpError, LlmError, RegistryError, ServerError,
};
pub use crate::llm::{
    GeminiClient, Generation, GenerationParameters, GroundingSource, LlmClient, Model, Usage,
};
pub use crate::mcp::{McpContentBlock, McpRequest, McpResponse, McpServer, McpToolResult};
pub use crate::tool::{ParamKind, ParamSpec, Registry, ToolDescriptor, ToolKind, ToolResult};
