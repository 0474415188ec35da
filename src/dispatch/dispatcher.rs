// ABOUTME: Implements the Dispatcher - routes a tool call by name to its handler,
// ABOUTME: calls the provider once, and normalizes the outcome into a ToolResult.

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::Instrument;

use super::{ToolHandler, handler};
use crate::error::DispatchError;
use crate::llm::{GenerationParameters, LlmClient};
use crate::tool::{Registry, ToolDescriptor, ToolResult};

/// Routes tool calls to the completion provider.
///
/// Holds only read-only shared state, so clones are cheap and calls may run
/// concurrently without coordination.
#[derive(Clone)]
pub struct Dispatcher {
    registry: Registry,
    client: Arc<dyn LlmClient>,
}

impl Dispatcher {
    /// Create a dispatcher over the given registry and provider client.
    pub fn new(registry: Registry, client: Arc<dyn LlmClient>) -> Self {
        Self { registry, client }
    }

    /// Create a dispatcher over the builtin registry.
    pub fn with_client<C: LlmClient + 'static>(client: C) -> Self {
        Self::new(Registry::builtin(), Arc::new(client))
    }

    /// The registry this dispatcher routes against.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// List every tool, in stable order.
    pub fn list_tools(&self) -> &[ToolDescriptor] {
        self.registry.list()
    }

    /// Resolve a call into its handler and the parameters for the provider.
    pub fn prepare(
        &self,
        tool_name: &str,
        arguments: Value,
    ) -> Result<(ToolHandler, GenerationParameters), DispatchError> {
        let descriptor = self
            .registry
            .get(tool_name)
            .ok_or_else(|| DispatchError::UnknownTool(tool_name.to_string()))?;

        let args = match arguments {
            Value::Null => Map::new(),
            Value::Object(map) => map,
            other => {
                return Err(DispatchError::InvalidArguments {
                    tool: tool_name.to_string(),
                    message: format!("expected an object, got {}", other),
                });
            }
        };

        let handler = handler(descriptor.kind);
        let resolved = descriptor.resolve_arguments(args);
        let params = (handler.prepare)(resolved).map_err(|e| DispatchError::InvalidArguments {
            tool: tool_name.to_string(),
            message: e.to_string(),
        })?;

        Ok((handler, params))
    }

    /// Execute a tool call, returning typed errors.
    pub async fn try_call_tool(
        &self,
        tool_name: &str,
        arguments: Value,
    ) -> Result<ToolResult, DispatchError> {
        let (handler, params) = self.prepare(tool_name, arguments)?;

        tracing::debug!(
            model = %params.model,
            grounding = params.grounding_enabled,
            temperature = ?params.temperature,
            max_output_tokens = ?params.max_output_tokens,
            "calling provider"
        );

        let generation = self
            .client
            .generate(&params)
            .await
            .map_err(|source| DispatchError::Provider {
                tool: tool_name.to_string(),
                source,
            })?;

        let text = match generation.non_empty_text() {
            Some(text) => text.to_string(),
            None => {
                tracing::warn!(
                    finish_reason = ?generation.finish_reason,
                    "provider returned no text, using placeholder"
                );
                handler.empty_text.to_string()
            }
        };

        let mut result = ToolResult::text(text).with_metadata("model", params.model.as_str());
        if !generation.sources.is_empty() {
            result = result.with_metadata("sources", &generation.sources);
        }
        Ok(result)
    }

    /// Execute a tool call. Every failure becomes a failed [`ToolResult`].
    pub async fn call_tool(&self, tool_name: &str, arguments: Value) -> ToolResult {
        let call_id = uuid::Uuid::new_v4();
        let span = tracing::info_span!("tool_call", %call_id, tool = %tool_name);

        async {
            match self.try_call_tool(tool_name, arguments).await {
                Ok(result) => {
                    tracing::info!("tool call succeeded");
                    result
                }
                Err(err) => {
                    tracing::warn!(error = %err, kind = err.kind(), "tool call failed");
                    ToolResult::from_error(&err)
                }
            }
        }
        .instrument(span)
        .await
    }
}
