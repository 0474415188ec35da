// ABOUTME: Tests for the Dispatcher - routing, default application, content
// ABOUTME: synthesis, placeholders, error wrapping, and concurrent calls.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;
use tokio::sync::Barrier;

use super::*;
use crate::error::{DispatchError, LlmError};
use crate::llm::{Generation, GenerationParameters, GroundingSource, LlmClient, Model};
use crate::tool::Registry;

enum Reply {
    Text(&'static str),
    Empty,
    Fail(&'static str),
}

/// A provider that records every call and answers with a fixed reply.
struct FakeClient {
    reply: Reply,
    calls: Mutex<Vec<GenerationParameters>>,
}

impl FakeClient {
    fn new(reply: Reply) -> Arc<Self> {
        Arc::new(Self {
            reply,
            calls: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> Vec<GenerationParameters> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmClient for FakeClient {
    async fn generate(&self, params: &GenerationParameters) -> Result<Generation, LlmError> {
        self.calls.lock().unwrap().push(params.clone());
        match &self.reply {
            Reply::Text(text) => Ok(Generation::text(*text)),
            Reply::Empty => Ok(Generation::empty()),
            Reply::Fail(message) => Err(LlmError::Api {
                status: 500,
                message: message.to_string(),
            }),
        }
    }
}

fn dispatcher(client: &Arc<FakeClient>) -> Dispatcher {
    Dispatcher::new(Registry::builtin(), client.clone())
}

#[test]
fn test_list_tools() {
    let client = FakeClient::new(Reply::Empty);
    let names: Vec<_> = dispatcher(&client)
        .list_tools()
        .iter()
        .map(|t| t.name.clone())
        .collect();
    assert_eq!(
        names,
        vec!["chat", "generate_content", "search", "search_with_context"]
    );
}

#[tokio::test]
async fn test_unknown_tool_is_failed_result() {
    let client = FakeClient::new(Reply::Text("unused"));
    let result = dispatcher(&client)
        .call_tool("gemini_unknown", json!({}))
        .await;

    assert!(result.is_error);
    assert!(result.content.contains("Unknown tool: gemini_unknown"));
    assert_eq!(result.metadata["error_kind"], "unknown_tool");
    assert!(client.calls().is_empty());
}

#[tokio::test]
async fn test_unknown_tool_typed_error() {
    let client = FakeClient::new(Reply::Text("unused"));
    let err = dispatcher(&client)
        .try_call_tool("gemini_unknown", json!({}))
        .await
        .unwrap_err();
    assert!(matches!(err, DispatchError::UnknownTool(name) if name == "gemini_unknown"));
}

#[tokio::test]
async fn test_chat_uses_message_and_default_model() {
    let client = FakeClient::new(Reply::Text("hi there"));
    let result = dispatcher(&client)
        .call_tool("chat", json!({"message": "hello"}))
        .await;

    assert!(!result.is_error);
    assert_eq!(result.content, "hi there");
    assert_eq!(result.metadata["model"], "gemini-2.5-pro");
    assert_eq!(
        client.calls(),
        vec![GenerationParameters::new(Model::Pro, "hello")]
    );
}

#[tokio::test]
async fn test_generate_content_applies_defaults() {
    let client = FakeClient::new(Reply::Text("pong"));
    let result = dispatcher(&client)
        .call_tool("generate_content", json!({"prompt": "ping"}))
        .await;

    assert_eq!(result.content, "pong");
    let calls = client.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].model, Model::Pro);
    assert_eq!(calls[0].content, "ping");
    assert_eq!(calls[0].temperature, Some(1.0));
    assert_eq!(calls[0].max_output_tokens, Some(2048));
    assert!(!calls[0].grounding_enabled);
}

#[tokio::test]
async fn test_generate_content_passes_caller_values() {
    let client = FakeClient::new(Reply::Text("ok"));
    dispatcher(&client)
        .call_tool(
            "generate_content",
            json!({
                "prompt": "write",
                "model": "gemini-2.5-flash",
                "temperature": 0.2,
                "maxOutputTokens": 64
            }),
        )
        .await;

    assert_eq!(
        client.calls(),
        vec![
            GenerationParameters::new(Model::Flash, "write")
                .temperature(0.2)
                .max_output_tokens(64)
        ]
    );
}

#[tokio::test]
async fn test_search_enables_grounding_with_fast_model() {
    let client = FakeClient::new(Reply::Text("results"));
    dispatcher(&client)
        .call_tool("search", json!({"query": "rust 2024 edition"}))
        .await;

    assert_eq!(
        client.calls(),
        vec![GenerationParameters::new(Model::Flash, "rust 2024 edition").grounded()]
    );
}

#[tokio::test]
async fn test_search_with_empty_context_sends_raw_query() {
    let client = FakeClient::new(Reply::Text("sunny"));
    dispatcher(&client)
        .call_tool(
            "search_with_context",
            json!({"query": "weather", "context": ""}),
        )
        .await;

    let calls = client.calls();
    assert_eq!(calls[0].content, "weather");
    assert_eq!(calls[0].temperature, Some(0.3));
    assert_eq!(calls[0].model, Model::Flash);
    assert!(calls[0].grounding_enabled);
    assert_eq!(calls[0].max_output_tokens, None);
}

#[tokio::test]
async fn test_search_with_context_prefixes_query() {
    let client = FakeClient::new(Reply::Text("sunny"));
    dispatcher(&client)
        .call_tool(
            "search_with_context",
            json!({"query": "weather", "context": "Tokyo"}),
        )
        .await;

    assert_eq!(client.calls()[0].content, "Context: Tokyo\n\nQuery: weather");
}

#[tokio::test]
async fn test_search_with_context_missing_context_defaults_to_empty() {
    let client = FakeClient::new(Reply::Text("sunny"));
    dispatcher(&client)
        .call_tool("search_with_context", json!({"query": "weather"}))
        .await;

    assert_eq!(client.calls()[0].content, "weather");
}

#[tokio::test]
async fn test_unknown_model_falls_back_to_tool_default() {
    let client = FakeClient::new(Reply::Text("ok"));
    dispatcher(&client)
        .call_tool("chat", json!({"message": "hi", "model": "gemini-1.0-ultra"}))
        .await;

    assert_eq!(client.calls()[0].model, Model::Pro);
}

#[tokio::test]
async fn test_empty_text_placeholders() {
    let client = FakeClient::new(Reply::Empty);
    let d = dispatcher(&client);

    let chat = d.call_tool("chat", json!({"message": "hi"})).await;
    assert!(!chat.is_error);
    assert_eq!(chat.content, NO_RESPONSE_TEXT);
    assert_eq!(chat.content, "No response generated");

    let generate = d.call_tool("generate_content", json!({"prompt": "hi"})).await;
    assert!(!generate.is_error);
    assert_eq!(generate.content, "No response generated");

    let search = d.call_tool("search", json!({"query": "hi"})).await;
    assert!(!search.is_error);
    assert_eq!(search.content, "No search results found");

    let contextual = d
        .call_tool("search_with_context", json!({"query": "hi"}))
        .await;
    assert!(!contextual.is_error);
    assert_eq!(contextual.content, NO_SEARCH_RESULTS_TEXT);
}

#[tokio::test]
async fn test_provider_error_names_tool_and_cause() {
    let client = FakeClient::new(Reply::Fail("quota exceeded"));
    let result = dispatcher(&client)
        .call_tool("search", json!({"query": "hi"}))
        .await;

    assert!(result.is_error);
    assert!(result.content.contains("search"));
    assert!(result.content.contains("quota exceeded"));
    assert_eq!(result.metadata["error_kind"], "provider_error");
    assert_eq!(client.calls().len(), 1);
}

#[tokio::test]
async fn test_provider_error_is_typed() {
    let client = FakeClient::new(Reply::Fail("boom"));
    let err = dispatcher(&client)
        .try_call_tool("chat", json!({"message": "hi"}))
        .await
        .unwrap_err();

    match err {
        DispatchError::Provider { tool, source } => {
            assert_eq!(tool, "chat");
            assert!(matches!(source, LlmError::Api { status: 500, .. }));
        }
        other => panic!("Expected DispatchError::Provider, got {:?}", other),
    }
}

#[tokio::test]
async fn test_missing_required_argument_is_invalid() {
    let client = FakeClient::new(Reply::Text("unused"));
    let result = dispatcher(&client).call_tool("chat", json!({})).await;

    assert!(result.is_error);
    assert!(result.content.contains("chat"));
    assert!(result.content.contains("message"));
    assert_eq!(result.metadata["error_kind"], "invalid_arguments");
    assert!(client.calls().is_empty());
}

#[tokio::test]
async fn test_null_arguments_are_empty_object() {
    let client = FakeClient::new(Reply::Text("unused"));
    let err = dispatcher(&client)
        .try_call_tool("search", serde_json::Value::Null)
        .await
        .unwrap_err();
    assert!(matches!(err, DispatchError::InvalidArguments { .. }));
}

#[tokio::test]
async fn test_non_object_arguments_rejected() {
    let client = FakeClient::new(Reply::Text("unused"));
    let err = dispatcher(&client)
        .try_call_tool("chat", json!(["hello"]))
        .await
        .unwrap_err();
    assert!(matches!(err, DispatchError::InvalidArguments { tool, .. } if tool == "chat"));
}

#[tokio::test]
async fn test_wrong_type_is_not_coerced() {
    let client = FakeClient::new(Reply::Text("unused"));
    let result = dispatcher(&client)
        .call_tool(
            "generate_content",
            json!({"prompt": "p", "temperature": "hot"}),
        )
        .await;

    assert!(result.is_error);
    assert!(client.calls().is_empty());
}

#[test]
fn test_prepare_does_not_clamp() {
    let client = FakeClient::new(Reply::Empty);
    let (handler, params) = dispatcher(&client)
        .prepare(
            "generate_content",
            json!({"prompt": "p", "temperature": 9.5, "maxOutputTokens": 100000}),
        )
        .unwrap();

    assert_eq!(handler.kind, crate::tool::ToolKind::GenerateContent);
    assert_eq!(params.temperature, Some(9.5));
    assert_eq!(params.max_output_tokens, Some(100000));
}

#[tokio::test]
async fn test_integral_float_token_count_is_accepted() {
    let client = FakeClient::new(Reply::Text("ok"));
    let result = dispatcher(&client)
        .call_tool(
            "generate_content",
            json!({"prompt": "p", "maxOutputTokens": 1024.0}),
        )
        .await;

    assert!(!result.is_error, "{}", result.content);
    assert_eq!(client.calls()[0].max_output_tokens, Some(1024));
}

#[tokio::test]
async fn test_fractional_token_count_is_invalid() {
    let client = FakeClient::new(Reply::Text("unused"));
    let err = dispatcher(&client)
        .try_call_tool(
            "generate_content",
            json!({"prompt": "p", "maxOutputTokens": 1024.5}),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, DispatchError::InvalidArguments { .. }));
    assert!(err.to_string().contains("generate_content"));
    assert!(client.calls().is_empty());
}

/// Provider that holds every call until two are in flight, then echoes content.
struct RendezvousClient {
    barrier: Barrier,
}

#[async_trait]
impl LlmClient for RendezvousClient {
    async fn generate(&self, params: &GenerationParameters) -> Result<Generation, LlmError> {
        self.barrier.wait().await;
        let mut generation = Generation::text(format!("{}:{}", params.model, params.content));
        if params.grounding_enabled {
            generation.sources.push(GroundingSource {
                title: params.content.clone(),
                uri: format!("https://search.example/{}", params.content),
            });
        }
        Ok(generation)
    }
}

#[tokio::test]
async fn test_concurrent_calls_do_not_interfere() {
    let d = Dispatcher::with_client(RendezvousClient {
        barrier: Barrier::new(2),
    });

    let (chat, search) = tokio::join!(
        d.call_tool("chat", json!({"message": "first"})),
        d.call_tool("search", json!({"query": "second"})),
    );

    assert_eq!(chat.content, "gemini-2.5-pro:first");
    assert!(!chat.metadata.contains_key("sources"));
    assert_eq!(search.content, "gemini-2.5-flash:second");
    assert_eq!(search.metadata["sources"][0]["title"], "second");
}

#[tokio::test]
async fn test_concurrent_calls_across_tasks() {
    let d = Dispatcher::with_client(RendezvousClient {
        barrier: Barrier::new(2),
    });

    let d1 = d.clone();
    let first = tokio::spawn(async move {
        d1.call_tool("generate_content", json!({"prompt": "alpha"}))
            .await
    });
    let d2 = d.clone();
    let second = tokio::spawn(async move {
        d2.call_tool("search_with_context", json!({"query": "beta", "context": "ctx"}))
            .await
    });

    let first = first.await.unwrap();
    let second = second.await.unwrap();
    assert_eq!(first.content, "gemini-2.5-pro:alpha");
    assert_eq!(second.content, "gemini-2.5-flash:Context: ctx\n\nQuery: beta");
}
