// ABOUTME: Google Gemini API client implementation.
// ABOUTME: Implements LlmClient over the generateContent REST endpoint.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{Generation, GenerationParameters, GroundingSource, Usage};
use crate::config::{GEMINI_DEFAULT_BASE_URL, ServerConfig};
use crate::error::LlmError;

/// Gemini API request format.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiRequest {
    pub contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GeminiGenerationConfig>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<GeminiTool>,
}

/// Gemini content (message).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<GeminiPart>,
}

/// Gemini content part. Only text parts are produced or consumed here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Set on thinking-model reasoning parts, which are not part of the answer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thought: Option<bool>,
}

/// Gemini generation config.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

/// Gemini tool attachment. Serializes as `{"googleSearch": {}}`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiTool {
    pub google_search: GoogleSearch,
}

/// Empty marker enabling Google Search grounding.
#[derive(Debug, Default, Serialize)]
pub struct GoogleSearch {}

/// Gemini API response format.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiResponse {
    #[serde(default)]
    pub candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    pub usage_metadata: Option<GeminiUsageMetadata>,
    #[serde(default)]
    pub model_version: Option<String>,
}

/// Gemini response candidate.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiCandidate {
    #[serde(default)]
    pub content: Option<GeminiContent>,
    #[serde(default)]
    pub finish_reason: Option<String>,
    #[serde(default)]
    pub grounding_metadata: Option<GeminiGroundingMetadata>,
}

/// Grounding metadata attached to a search-grounded candidate.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiGroundingMetadata {
    #[serde(default)]
    pub grounding_chunks: Vec<GeminiGroundingChunk>,
}

#[derive(Debug, Deserialize)]
pub struct GeminiGroundingChunk {
    #[serde(default)]
    pub web: Option<GeminiWebSource>,
}

#[derive(Debug, Deserialize)]
pub struct GeminiWebSource {
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

/// Gemini usage metadata.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiUsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
}

/// Gemini API error response.
#[derive(Debug, Deserialize)]
pub struct GeminiError {
    pub error: GeminiErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct GeminiErrorDetail {
    pub message: String,
    /// Canonical status name such as `RESOURCE_EXHAUSTED`.
    #[serde(default)]
    pub status: String,
}

/// Client for the Google Gemini API.
#[derive(Clone)]
pub struct GeminiClient {
    api_key: String,
    base_url: String,
    http: reqwest::Client,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Create a new Gemini client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: GEMINI_DEFAULT_BASE_URL.to_string(),
            http: reqwest::Client::new(),
        }
    }

    /// Create a client from the startup configuration.
    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(config.api_key.clone()).with_base_url(config.base_url.clone())
    }

    /// Override the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Build the endpoint URL for a given model and method.
    fn endpoint(&self, model: &str, method: &str) -> String {
        format!("{}/models/{}:{}", self.base_url, model, method)
    }
}

impl From<&GenerationParameters> for GeminiRequest {
    fn from(params: &GenerationParameters) -> Self {
        let contents = vec![GeminiContent {
            role: Some("user".to_string()),
            parts: vec![GeminiPart {
                text: Some(params.content.clone()),
                thought: None,
            }],
        }];

        let configured = params.max_output_tokens.is_some() || params.temperature.is_some();
        let generation_config = configured.then(|| GeminiGenerationConfig {
            max_output_tokens: params.max_output_tokens,
            temperature: params.temperature,
        });

        let tools = if params.grounding_enabled {
            vec![GeminiTool {
                google_search: GoogleSearch::default(),
            }]
        } else {
            Vec::new()
        };

        GeminiRequest {
            contents,
            generation_config,
            tools,
        }
    }
}

fn extract_sources(metadata: Option<GeminiGroundingMetadata>) -> Vec<GroundingSource> {
    metadata
        .map(|m| m.grounding_chunks)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|chunk| chunk.web)
        .filter_map(|web| {
            let uri = web.uri?;
            Some(GroundingSource {
                title: web.title.unwrap_or_else(|| uri.clone()),
                uri,
            })
        })
        .collect()
}

pub(crate) fn convert_gemini_response(resp: GeminiResponse, model: &str) -> Generation {
    let candidate = resp.candidates.into_iter().next();

    let (text, finish_reason, sources) = match candidate {
        Some(c) => {
            let texts: Vec<String> = c
                .content
                .map(|content| content.parts)
                .unwrap_or_default()
                .into_iter()
                .filter(|part| part.thought != Some(true))
                .filter_map(|part| part.text)
                .collect();
            let text = if texts.is_empty() {
                None
            } else {
                Some(texts.concat())
            };
            (text, c.finish_reason, extract_sources(c.grounding_metadata))
        }
        None => (None, None, Vec::new()),
    };

    let usage = resp
        .usage_metadata
        .map(|u| Usage {
            input_tokens: u.prompt_token_count,
            output_tokens: u.candidates_token_count,
        })
        .unwrap_or_default();

    Generation {
        text,
        model: resp.model_version.unwrap_or_else(|| model.to_string()),
        finish_reason,
        usage,
        sources,
    }
}

/// Turn a non-success body into the API's own message, or the raw text.
pub(crate) fn api_error_message(body: &str) -> String {
    match serde_json::from_str::<GeminiError>(body) {
        Ok(GeminiError { error }) if error.status.is_empty() => error.message,
        Ok(GeminiError { error }) => format!("{}: {}", error.status, error.message),
        Err(_) if body.trim().is_empty() => "empty error response".to_string(),
        Err(_) => body.trim().to_string(),
    }
}

#[async_trait]
impl super::client::LlmClient for GeminiClient {
    async fn generate(&self, params: &GenerationParameters) -> Result<Generation, LlmError> {
        let gemini_req = GeminiRequest::from(params);
        let model = params.model.as_str();
        let url = format!(
            "{}?key={}",
            self.endpoint(model, "generateContent"),
            urlencoding::encode(&self.api_key)
        );

        tracing::debug!(
            model,
            grounding = params.grounding_enabled,
            "sending generateContent request"
        );

        let response = self
            .http
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&gemini_req)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: api_error_message(&body),
            });
        }

        let gemini_resp: GeminiResponse = serde_json::from_str(&body)?;
        let generation = convert_gemini_response(gemini_resp, model);
        tracing::debug!(
            model = %generation.model,
            finish_reason = ?generation.finish_reason,
            output_tokens = generation.usage.output_tokens,
            "generateContent completed"
        );
        Ok(generation)
    }
}
