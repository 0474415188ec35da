// ABOUTME: Defines all error types for gemini-mcp using thiserror.
// ABOUTME: Each submodule has its own error enum, unified under GeminiMcpError.

/// Top-level error type for the gemini-mcp library.
#[derive(Debug, thiserror::Error)]
pub enum GeminiMcpError {
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Dispatch error: {0}")]
    Dispatch(#[from] DispatchError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("Server error: {0}")]
    Server(#[from] ServerError),
}

/// Errors from LLM client operations.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Deserialization error: {0}")]
    Deserialize(#[from] serde_json::Error),
}

/// Errors from routing and executing a single tool call.
///
/// Every variant is recoverable: the dispatcher turns it into a failed
/// [`ToolResult`](crate::tool::ToolResult) and the server keeps serving.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid arguments for tool '{tool}': {message}")]
    InvalidArguments { tool: String, message: String },

    #[error("Tool '{tool}' execution failed: {source}")]
    Provider {
        tool: String,
        #[source]
        source: LlmError,
    },
}

impl DispatchError {
    /// Short machine-readable tag for the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            DispatchError::UnknownTool(_) => "unknown_tool",
            DispatchError::InvalidArguments { .. } => "invalid_arguments",
            DispatchError::Provider { .. } => "provider_error",
        }
    }
}

/// Violations of the tool catalog invariants.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Duplicate tool name: {0}")]
    DuplicateName(String),

    #[error("Tool '{tool}': required parameter '{param}' declares a default")]
    RequiredWithDefault { tool: String, param: String },

    #[error("Tool '{tool}': default for '{param}' does not satisfy its own schema")]
    InvalidDefault { tool: String, param: String },
}

/// Errors raised while building the startup configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("GEMINI_API_KEY or GOOGLE_API_KEY environment variable not set")]
    MissingCredential,

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Errors from the MCP server loop.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Uncaught fault: {0}")]
    UncaughtFault(String),
}
