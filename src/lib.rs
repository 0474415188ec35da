// ABOUTME: Root module for gemini-mcp - an MCP tool server backed by Gemini.
// ABOUTME: Re-exports all public types from submodules.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod llm;
pub mod mcp;
pub mod prelude;
pub mod tool;

pub use error::GeminiMcpError;
