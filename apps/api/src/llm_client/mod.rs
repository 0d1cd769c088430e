//! LLM Client — the single point of entry for all Gemini API calls.
//!
//! No other module talks to the model provider directly. Callers depend on the
//! [`ModelClient`] trait so tests can substitute a stub without network access.

use std::borrow::Cow;

use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::extraction::ExtractedContent;

pub const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com";
/// Text/vision-capable model used unless `GEMINI_MODEL` overrides it.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
const TEXT_MIME: &str = "text/plain";

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("authentication failed: GOOGLE_API_KEY is not configured")]
    MissingApiKey,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("prompt was blocked by the model: {0}")]
    Blocked(String),

    #[error("model returned empty content")]
    EmptyContent,
}

/// The generative-model capability used by the evaluation pipeline.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Sends the job description, resume content and instruction as one request and
    /// returns the generated text verbatim.
    async fn evaluate(
        &self,
        job_description: &str,
        content: &ExtractedContent,
        prompt: &str,
    ) -> Result<String, ModelError>;
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Text { text: &'a str },
    InlineData { inline_data: Blob<'a> },
}

#[derive(Debug, Serialize)]
struct Blob<'a> {
    mime_type: &'a str,
    data: Cow<'a, str>,
}

impl<'a> Part<'a> {
    fn from_content(content: &'a ExtractedContent) -> Self {
        let blob = match content {
            ExtractedContent::Image(image) => Blob {
                mime_type: &image.mime_type,
                data: Cow::Borrowed(&image.data),
            },
            ExtractedContent::Text(text) => Blob {
                mime_type: TEXT_MIME,
                data: Cow::Owned(general_purpose::STANDARD.encode(text)),
            },
        };
        Part::InlineData { inline_data: blob }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
}

impl GenerateContentResponse {
    /// Joins the text parts of the first candidate.
    fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        (!text.is_empty()).then_some(text)
    }
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

/// Gemini `generateContent` client. One request per call, no retries.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: Option<String>,
    endpoint: String,
}

impl GeminiClient {
    pub fn new(api_key: Option<String>, base_url: &str, model: &str) -> Self {
        Self {
            client: Client::new(),
            api_key,
            endpoint: format!(
                "{}/v1beta/models/{}:generateContent",
                base_url.trim_end_matches('/'),
                model
            ),
        }
    }
}

#[async_trait]
impl ModelClient for GeminiClient {
    async fn evaluate(
        &self,
        job_description: &str,
        content: &ExtractedContent,
        prompt: &str,
    ) -> Result<String, ModelError> {
        let api_key = self.api_key.as_deref().ok_or(ModelError::MissingApiKey)?;

        let request_body = GenerateContentRequest {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![
                    Part::Text {
                        text: job_description,
                    },
                    Part::from_content(content),
                    Part::Text { text: prompt },
                ],
            }],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<GeminiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(ModelError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body)?;

        if let Some(usage) = &parsed.usage_metadata {
            debug!(
                "Gemini call succeeded: prompt_tokens={}, candidate_tokens={}",
                usage.prompt_token_count, usage.candidates_token_count
            );
        }

        if parsed.candidates.is_empty() {
            if let Some(reason) = parsed
                .prompt_feedback
                .as_ref()
                .and_then(|f| f.block_reason.as_deref())
            {
                return Err(ModelError::Blocked(reason.to_string()));
            }
        }

        parsed.text().ok_or(ModelError::EmptyContent)
    }
}
