// ABOUTME: Defines the LlmClient trait - the seam between tool handlers
// ABOUTME: and the remote completion provider (Gemini, or a fake in tests).

use async_trait::async_trait;

use super::{Generation, GenerationParameters};
use crate::error::LlmError;

/// Trait for completion provider implementations.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Run one non-streaming completion.
    async fn generate(&self, params: &GenerationParameters) -> Result<Generation, LlmError>;
}
