// ABOUTME: The closed set of tools this server exposes and their descriptors.
// ABOUTME: Pure data - names, descriptions, parameters, defaults, bounds.

use super::{ParamKind, ParamSpec, ToolDescriptor};
use crate::llm::Model;

/// Temperature bounds accepted by the provider.
pub const TEMPERATURE_RANGE: (f64, f64) = (0.0, 2.0);

/// Output token bounds accepted by the provider.
pub const MAX_OUTPUT_TOKENS_RANGE: (u64, u64) = (1, 8192);

/// One of the tools exposed by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    Chat,
    GenerateContent,
    Search,
    SearchWithContext,
}

impl ToolKind {
    /// Every tool, in listing order.
    pub const ALL: [ToolKind; 4] = [
        ToolKind::Chat,
        ToolKind::GenerateContent,
        ToolKind::Search,
        ToolKind::SearchWithContext,
    ];

    /// The stable tool name used on the wire.
    pub fn name(self) -> &'static str {
        match self {
            ToolKind::Chat => "chat",
            ToolKind::GenerateContent => "generate_content",
            ToolKind::Search => "search",
            ToolKind::SearchWithContext => "search_with_context",
        }
    }

    /// Resolve a wire name to a tool.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }

    /// Whether the tool attaches Google Search grounding.
    pub fn is_search(self) -> bool {
        matches!(self, ToolKind::Search | ToolKind::SearchWithContext)
    }

    /// Model used when the caller does not pick one.
    pub fn default_model(self) -> Model {
        if self.is_search() {
            Model::Flash
        } else {
            Model::Pro
        }
    }

    /// Build the descriptor for this tool.
    pub fn descriptor(self) -> ToolDescriptor {
        let (description, params) = match self {
            ToolKind::Chat => (
                "Chat with Gemini 2.5 Pro model",
                vec![
                    ParamSpec::required(
                        "message",
                        "The message to send to Gemini",
                        ParamKind::String,
                    ),
                    model_param(self.default_model()),
                ],
            ),
            ToolKind::GenerateContent => (
                "Generate content with Gemini 2.5 Pro with custom parameters",
                vec![
                    ParamSpec::required(
                        "prompt",
                        "The prompt to generate content from",
                        ParamKind::String,
                    ),
                    model_param(self.default_model()),
                    temperature_param(1.0),
                    ParamSpec::optional(
                        "maxOutputTokens",
                        "Maximum number of output tokens",
                        ParamKind::Integer {
                            minimum: MAX_OUTPUT_TOKENS_RANGE.0,
                            maximum: MAX_OUTPUT_TOKENS_RANGE.1,
                        },
                        2048,
                    ),
                ],
            ),
            ToolKind::Search => (
                "Search the web using Google Search grounding with Gemini",
                vec![
                    ParamSpec::required(
                        "query",
                        "The search query or question to answer with real-time web information",
                        ParamKind::String,
                    ),
                    model_param(self.default_model()),
                ],
            ),
            ToolKind::SearchWithContext => (
                "Search the web with additional context using Google Search grounding",
                vec![
                    ParamSpec::required("query", "The search query or question", ParamKind::String),
                    ParamSpec::optional(
                        "context",
                        "Additional context to help with the search",
                        ParamKind::String,
                        "",
                    ),
                    model_param(self.default_model()),
                    temperature_param(0.3),
                ],
            ),
        };

        ToolDescriptor {
            kind: self,
            name: self.name().to_string(),
            description: description.to_string(),
            params,
        }
    }
}

impl std::fmt::Display for ToolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

fn model_param(default: Model) -> ParamSpec {
    ParamSpec::optional(
        "model",
        "Gemini model to use",
        ParamKind::Enum {
            values: Model::ALL.iter().map(|m| m.as_str().to_string()).collect(),
        },
        default.as_str(),
    )
}

fn temperature_param(default: f64) -> ParamSpec {
    ParamSpec::optional(
        "temperature",
        "Temperature for generation (0.0-2.0)",
        ParamKind::Number {
            minimum: TEMPERATURE_RANGE.0,
            maximum: TEMPERATURE_RANGE.1,
        },
        default,
    )
}
