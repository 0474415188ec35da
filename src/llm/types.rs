// ABOUTME: Core types for provider communication - models, generation
// ABOUTME: parameters derived from a tool call, and generation output.

use serde::{Deserialize, Serialize};

/// A Gemini model a tool may route to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Model {
    /// High-quality tier.
    #[serde(rename = "gemini-2.5-pro")]
    Pro,
    /// Fast tier.
    #[serde(rename = "gemini-2.5-flash")]
    Flash,
}

impl Model {
    /// Every model a tool may declare, in schema order.
    pub const ALL: [Model; 2] = [Model::Pro, Model::Flash];

    /// The model identifier used in API paths and schemas.
    pub fn as_str(self) -> &'static str {
        match self {
            Model::Pro => "gemini-2.5-pro",
            Model::Flash => "gemini-2.5-flash",
        }
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters for a single completion call, derived from tool arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationParameters {
    pub model: Model,
    pub content: String,
    pub temperature: Option<f64>,
    pub max_output_tokens: Option<u32>,
    pub grounding_enabled: bool,
}

impl GenerationParameters {
    /// Create parameters for the given model and content.
    pub fn new(model: Model, content: impl Into<String>) -> Self {
        Self {
            model,
            content: content.into(),
            temperature: None,
            max_output_tokens: None,
            grounding_enabled: false,
        }
    }

    /// Set temperature.
    pub fn temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set max output tokens.
    pub fn max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = Some(max_output_tokens);
        self
    }

    /// Attach Google Search grounding to the call.
    pub fn grounded(mut self) -> Self {
        self.grounding_enabled = true;
        self
    }
}

/// Token usage statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// A web source cited by grounding metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundingSource {
    pub title: String,
    pub uri: String,
}

/// Output of a completion call.
#[derive(Debug, Clone, Default)]
pub struct Generation {
    /// Generated text, `None` when the provider produced none.
    pub text: Option<String>,
    pub model: String,
    pub finish_reason: Option<String>,
    pub usage: Usage,
    pub sources: Vec<GroundingSource>,
}

impl Generation {
    /// Create a generation carrying the given text.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    /// Create a generation without any text.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The text, if present and non-empty.
    pub fn non_empty_text(&self) -> Option<&str> {
        self.text.as_deref().filter(|t| !t.is_empty())
    }
}
