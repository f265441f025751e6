//! Text-generation client.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use petbook_common::config::AiConfig;
use petbook_common::{AppError, AppResult};
use serde::Deserialize;
use serde_json::{Value, json};

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// An inline document attached to a generation request.
#[derive(Debug, Clone)]
pub struct Attachment {
    /// Raw document bytes.
    pub data: Vec<u8>,
    /// MIME type, e.g. `application/pdf`.
    pub content_type: String,
}

/// One generation request.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// System instruction framing the model's role and output format.
    pub system_instruction: String,
    /// User prompt.
    pub prompt: String,
    /// Optional inline document.
    pub attachment: Option<Attachment>,
}

/// Text-generation backend trait.
#[async_trait::async_trait]
pub trait TextGenerator: Send + Sync {
    /// Run one generation and return the raw model text.
    async fn generate(&self, request: GenerationRequest) -> AppResult<String>;
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

/// Gemini REST client.
///
/// Models are asked for `application/json` output, but callers must still
/// tolerate raw text; the model does not always comply.
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
}

impl GeminiClient {
    /// Create a client for a model with an API key.
    #[must_use]
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            model,
        }
    }

    /// Build a client from configuration. Fails when no API key is set.
    pub fn from_config(config: &AiConfig) -> AppResult<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| AppError::Config("Gemini API key missing".to_string()))?;
        Ok(Self::new(api_key, config.model.clone()))
    }

    fn request_body(request: &GenerationRequest) -> Value {
        let mut parts = Vec::new();
        if let Some(attachment) = &request.attachment {
            parts.push(json!({
                "inline_data": {
                    "mime_type": attachment.content_type,
                    "data": STANDARD.encode(&attachment.data),
                }
            }));
        }
        parts.push(json!({ "text": request.prompt }));

        json!({
            "system_instruction": { "parts": [{ "text": request.system_instruction }] },
            "contents": [{ "parts": parts }],
            "generationConfig": { "response_mime_type": "application/json" },
        })
    }
}

#[async_trait::async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, request: GenerationRequest) -> AppResult<String> {
        let url = format!(
            "{GEMINI_BASE_URL}/models/{}:generateContent",
            self.model
        );

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&Self::request_body(&request))
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("Gemini request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalService(format!(
                "Gemini returned {status}: {body}"
            )));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| AppError::ExternalService(format!("Gemini response unreadable: {e}")))?;

        let text: String = parsed
            .candidates
            .first()
            .map(|candidate| {
                candidate
                    .content
                    .parts
                    .iter()
                    .map(|part| part.text.as_str())
                    .collect()
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(AppError::ExternalService(
                "Gemini returned no candidates".to_string(),
            ));
        }
        Ok(text)
    }
}

/// Strip a Markdown code fence the model sometimes wraps JSON output in.
#[must_use]
pub(crate) fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .map_or(trimmed, str::trim)
}
