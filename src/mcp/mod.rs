// ABOUTME: MCP module - Model Context Protocol server implementation.
// ABOUTME: Serves the tool catalog over JSON-RPC on stdio or any byte stream.

mod server;
mod types;

pub use server::McpServer;
pub use types::*;
