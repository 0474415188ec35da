// ABOUTME: Typed parameters and handler functions for each tool kind.
// ABOUTME: Turns resolved arguments into GenerationParameters for the provider.

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::llm::{GenerationParameters, Model};
use crate::tool::{ToolKind, integral_value};

/// Placeholder for completion tools when the provider returns no text.
pub const NO_RESPONSE_TEXT: &str = "No response generated";

/// Placeholder for search tools when the provider returns no text.
pub const NO_SEARCH_RESULTS_TEXT: &str = "No search results found";

/// Builds provider parameters from resolved arguments.
pub type PrepareFn = fn(Map<String, Value>) -> Result<GenerationParameters, serde_json::Error>;

/// Registration entry binding a tool kind to its handler.
#[derive(Clone, Copy)]
pub struct ToolHandler {
    pub kind: ToolKind,
    pub prepare: PrepareFn,
    /// Returned as a successful result when the provider yields no text.
    pub empty_text: &'static str,
}

impl std::fmt::Debug for ToolHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolHandler")
            .field("kind", &self.kind)
            .field("empty_text", &self.empty_text)
            .finish_non_exhaustive()
    }
}

/// The handler registered for a tool kind.
pub fn handler(kind: ToolKind) -> ToolHandler {
    match kind {
        ToolKind::Chat => ToolHandler {
            kind,
            prepare: prepare::<ChatArgs>,
            empty_text: NO_RESPONSE_TEXT,
        },
        ToolKind::GenerateContent => ToolHandler {
            kind,
            prepare: prepare::<GenerateContentArgs>,
            empty_text: NO_RESPONSE_TEXT,
        },
        ToolKind::Search => ToolHandler {
            kind,
            prepare: prepare::<SearchArgs>,
            empty_text: NO_SEARCH_RESULTS_TEXT,
        },
        ToolKind::SearchWithContext => ToolHandler {
            kind,
            prepare: prepare::<SearchWithContextArgs>,
            empty_text: NO_SEARCH_RESULTS_TEXT,
        },
    }
}

fn prepare<A>(args: Map<String, Value>) -> Result<GenerationParameters, serde_json::Error>
where
    A: DeserializeOwned + Into<GenerationParameters>,
{
    serde_json::from_value::<A>(Value::Object(args)).map(Into::into)
}

/// Arguments of `chat`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatArgs {
    pub message: String,
    pub model: Model,
}

impl From<ChatArgs> for GenerationParameters {
    fn from(args: ChatArgs) -> Self {
        GenerationParameters::new(args.model, args.message)
    }
}

/// Arguments of `generate_content`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentArgs {
    pub prompt: String,
    pub model: Model,
    pub temperature: f64,
    #[serde(deserialize_with = "deserialize_token_count")]
    pub max_output_tokens: u32,
}

/// Accept `maxOutputTokens` as any whole number, including `1024.0`.
fn deserialize_token_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match integral_value(&value).and_then(|n| u32::try_from(n).ok()) {
        Some(tokens) => Ok(tokens),
        None => Err(D::Error::custom(format!("{value} is not a whole number"))),
    }
}

impl From<GenerateContentArgs> for GenerationParameters {
    fn from(args: GenerateContentArgs) -> Self {
        GenerationParameters::new(args.model, args.prompt)
            .temperature(args.temperature)
            .max_output_tokens(args.max_output_tokens)
    }
}

/// Arguments of `search`.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchArgs {
    pub query: String,
    pub model: Model,
}

impl From<SearchArgs> for GenerationParameters {
    fn from(args: SearchArgs) -> Self {
        GenerationParameters::new(args.model, args.query).grounded()
    }
}

/// Arguments of `search_with_context`.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchWithContextArgs {
    pub query: String,
    pub context: String,
    pub model: Model,
    pub temperature: f64,
}

impl SearchWithContextArgs {
    /// The query, prefixed with the context when one is given.
    pub fn contextual_query(&self) -> String {
        if self.context.is_empty() {
            self.query.clone()
        } else {
            format!("Context: {}\n\nQuery: {}", self.context, self.query)
        }
    }
}

impl From<SearchWithContextArgs> for GenerationParameters {
    fn from(args: SearchWithContextArgs) -> Self {
        GenerationParameters::new(args.model, args.contextual_query())
            .temperature(args.temperature)
            .grounded()
    }
}
