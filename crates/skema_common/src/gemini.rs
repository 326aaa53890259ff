//! Generative Language API client.
//!
//! HTTP client for the Google Generative Language API.
//!
//! Endpoints used:
//! - POST /v1beta/models/{model}:generateContent - schema generation
//!   (structured output pinned by the response schema)
//! - GET /v1beta/models - model listing, used by the doctor check

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::config::SkemaConfig;
use crate::prompts;
use crate::schema::GenerationResponse;

/// Default API endpoint
pub const GEMINI_DEFAULT_URL: &str = "https://generativelanguage.googleapis.com";

/// Sampling temperature for the single-generation path
pub const SINGLE_SHOT_TEMPERATURE: f32 = 0.2;

/// Default timeout for generation (ms)
pub const GENERATE_TIMEOUT_MS: u64 = 60_000;

/// Default timeout for the model-list check (ms)
pub const LIST_TIMEOUT_MS: u64 = 5_000;

/// Client for schema-generation calls
#[derive(Debug, Clone)]
pub struct GeminiClient {
    base_url: String,
    model: String,
    api_key: String,
    timeout_ms: u64,
}

/// Error from generation API operations
#[derive(Debug, Error)]
pub enum GeminiError {
    /// API key env var unset or empty
    #[error("API key not set: export {0} before running")]
    MissingApiKey(String),

    /// Service not reachable
    #[error("Generation service not reachable: {0}")]
    NotAvailable(String),

    /// Request timeout
    #[error("Request timed out")]
    Timeout,

    /// Non-success API status
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Well-formed HTTP response that is not a usable generation payload
    #[error("Malformed model response: {0}")]
    Parse(String),

    /// Everything else HTTP
    #[error("HTTP error: {0}")]
    Http(String),
}

/// Request for :generateContent
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    response_mime_type: String,
    response_schema: Value,
}

/// Response from :generateContent
#[derive(Debug, Clone, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

/// Model info from GET /v1beta/models
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    pub name: String,
    #[serde(default)]
    pub display_name: String,
}

/// Response from GET /v1beta/models
#[derive(Debug, Clone, Deserialize)]
struct ModelsResponse {
    #[serde(default)]
    models: Vec<ModelInfo>,
}

impl GeminiClient {
    /// Create a client with the default endpoint and timeout
    pub fn new(model: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: GEMINI_DEFAULT_URL.to_string(),
            model: model.into(),
            api_key: api_key.into(),
            timeout_ms: GENERATE_TIMEOUT_MS,
        }
    }

    /// Create a client from the effective configuration; resolves the API
    /// key through the configured environment variable.
    pub fn from_config(config: &SkemaConfig) -> Result<Self, GeminiError> {
        Ok(Self {
            base_url: config.base_url.clone(),
            model: config.model.clone(),
            api_key: config.api_key()?,
            timeout_ms: config.timeout_secs.saturating_mul(1000),
        })
    }

    /// Override the endpoint
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set timeout in milliseconds
    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn http(&self, timeout_ms: u64) -> Result<reqwest::Client, GeminiError> {
        reqwest::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| GeminiError::Http(e.to_string()))
    }

    /// Generate a schema for the given requirements at one sampling
    /// temperature. The structured-output contract shapes the response;
    /// the candidate text is parsed into a [`GenerationResponse`].
    pub async fn generate_schema(
        &self,
        requirements: &str,
        temperature: f32,
    ) -> Result<GenerationResponse, GeminiError> {
        let client = self.http(self.timeout_ms)?;

        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompts::build_schema_prompt(requirements),
                }],
            }],
            generation_config: GenerationConfig {
                temperature,
                response_mime_type: "application/json".to_string(),
                response_schema: prompts::response_schema(),
            },
        };

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        debug!(model = %self.model, temperature, "requesting schema generation");

        let resp = client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(map_transport_error)?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(GeminiError::Api { status, message });
        }

        let body: GenerateContentResponse = resp
            .json()
            .await
            .map_err(|e| GeminiError::Parse(e.to_string()))?;

        extract_response(body)
    }

    /// List available models (doctor check)
    pub async fn list_models(&self) -> Result<Vec<ModelInfo>, GeminiError> {
        let client = self.http(LIST_TIMEOUT_MS)?;

        let url = format!("{}/v1beta/models", self.base_url);
        let resp = client
            .get(&url)
            .header("x-goog-api-key", &self.api_key)
            .send()
            .await
            .map_err(map_transport_error)?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(GeminiError::Api { status, message });
        }

        let models: ModelsResponse = resp
            .json()
            .await
            .map_err(|e| GeminiError::Parse(e.to_string()))?;

        Ok(models.models)
    }
}

fn map_transport_error(e: reqwest::Error) -> GeminiError {
    if e.is_timeout() {
        GeminiError::Timeout
    } else if e.is_connect() {
        GeminiError::NotAvailable(e.to_string())
    } else {
        GeminiError::Http(e.to_string())
    }
}

/// Pull the first candidate's text and parse it as a generation payload.
fn extract_response(body: GenerateContentResponse) -> Result<GenerationResponse, GeminiError> {
    let text = body
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts.into_iter().next())
        .map(|part| part.text)
        .ok_or_else(|| GeminiError::Parse("response carried no candidate text".to_string()))?;

    let payload = strip_code_fences(&text);
    serde_json::from_str(payload)
        .map_err(|e| GeminiError::Parse(format!("candidate text is not a schema payload: {}", e)))
}

/// Models occasionally wrap JSON output in a markdown fence even under a
/// JSON mime type; tolerate that.
fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let trimmed = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    trimmed.strip_suffix("```").unwrap_or(trimmed).trim()
}
