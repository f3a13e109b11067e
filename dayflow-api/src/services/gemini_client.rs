//! Google Gemini client
//!
//! `POST /v1beta/models/{model}:generateContent`. Serves both the "pro" text
//! parser and image parsing, so it implements [`TextModel`] and [`VisionModel`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::llm::{CompletionRequest, ImageInput, LlmError, TextModel, VisionModel};

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const USER_AGENT: &str = concat!("dayflow-api/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Text { text: &'a str },
    Image { inline_data: InlineData<'a> },
}

#[derive(Debug, Serialize)]
struct InlineData<'a> {
    mime_type: &'a str,
    data: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// Gemini API client bound to one model
pub struct GeminiClient {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
}

impl GeminiClient {
    pub fn new(api_key: String, model: String, temperature: f32) -> Result<Self, LlmError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| LlmError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: GEMINI_BASE_URL.to_string(),
            api_key,
            model,
            temperature,
        })
    }

    /// Point the client at a different endpoint (proxy or local mock)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn build_body<'a>(
        &self,
        request: &'a CompletionRequest,
        images: &'a [ImageInput],
    ) -> GenerateRequest<'a> {
        let mut parts = vec![Part::Text {
            text: &request.prompt,
        }];
        parts.extend(images.iter().map(|image| Part::Image {
            inline_data: InlineData {
                mime_type: &image.mime_type,
                data: &image.data,
            },
        }));

        GenerateRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part::Text {
                    text: &request.system,
                }],
            },
            contents: vec![Content {
                role: Some("user"),
                parts,
            }],
            generation_config: GenerationConfig {
                temperature: self.temperature,
                max_output_tokens: request.max_tokens,
                response_mime_type: request.json_object.then_some("application/json"),
            },
        }
    }

    async fn generate(
        &self,
        request: &CompletionRequest,
        images: &[ImageInput],
    ) -> Result<String, LlmError> {
        tracing::debug!(
            model = %self.model,
            images = images.len(),
            "Querying Gemini API"
        );

        let response = self
            .http_client
            .post(format!("{}/models/{}:generateContent", self.base_url, self.model))
            .header("x-goog-api-key", &self.api_key)
            .json(&self.build_body(request, images))
            .send()
            .await
            .map_err(|e| LlmError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(LlmError::Api(status.as_u16(), error_text));
        }

        let generated: GenerateResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Parse(e.to_string()))?;

        collect_text(generated).ok_or(LlmError::EmptyResponse)
    }
}

/// Concatenate the text parts of the first candidate
fn collect_text(response: GenerateResponse) -> Option<String> {
    let content = response.candidates.into_iter().next()?.content?;
    let text: String = content
        .parts
        .into_iter()
        .filter_map(|part| part.text)
        .collect::<Vec<_>>()
        .join("");
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

#[async_trait]
impl TextModel for GeminiClient {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        self.generate(request, &[]).await
    }
}

#[async_trait]
impl VisionModel for GeminiClient {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn complete_with_images(
        &self,
        request: &CompletionRequest,
        images: &[ImageInput],
    ) -> Result<String, LlmError> {
        self.generate(request, images).await
    }
}
