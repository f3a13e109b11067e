//! Language model abstractions
//!
//! Handlers never talk to a provider directly; they receive trait objects so
//! the Groq and Gemini clients can be swapped for stubs in tests.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use thiserror::Error;

use crate::error::ApiError;

/// Inference errors
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Model returned no content")]
    EmptyResponse,
}

impl From<LlmError> for ApiError {
    fn from(err: LlmError) -> Self {
        ApiError::Upstream(format!("inference failed: {}", err))
    }
}

/// One prompt for a single-turn completion
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// System instruction
    pub system: String,
    /// User message
    pub prompt: String,
    pub max_tokens: u32,
    /// Ask the provider for a JSON object response when it supports one
    pub json_object: bool,
}

impl CompletionRequest {
    pub fn new(system: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            prompt: prompt.into(),
            max_tokens: 1024,
            json_object: false,
        }
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn json_object(mut self) -> Self {
        self.json_object = true;
        self
    }
}

/// Text-only chat model
#[async_trait]
pub trait TextModel: Send + Sync {
    fn model_name(&self) -> &str;

    /// Run one completion and return the raw text
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError>;
}

/// Model that also accepts images
#[async_trait]
pub trait VisionModel: Send + Sync {
    fn model_name(&self) -> &str;

    async fn complete_with_images(
        &self,
        request: &CompletionRequest,
        images: &[ImageInput],
    ) -> Result<String, LlmError>;
}

/// Base64 image payload with its MIME type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInput {
    pub mime_type: String,
    /// Standard base64, no data-URL prefix
    pub data: String,
}

impl ImageInput {
    /// Parse a `data:<mime>;base64,<payload>` URL or bare base64 (JPEG assumed)
    ///
    /// The payload must decode, so malformed uploads fail with a 400 here
    /// instead of an opaque provider error later.
    pub fn parse(input: &str) -> Result<Self, String> {
        let input = input.trim();
        let (mime_type, data) = match input.strip_prefix("data:") {
            Some(rest) => {
                let (header, payload) = rest
                    .split_once(',')
                    .ok_or_else(|| "data URL is missing ',' separator".to_string())?;
                let mime = header
                    .strip_suffix(";base64")
                    .ok_or_else(|| "data URL must be base64 encoded".to_string())?;
                if !mime.starts_with("image/") {
                    return Err(format!("unsupported media type '{}'", mime));
                }
                (mime.to_string(), payload)
            }
            None => ("image/jpeg".to_string(), input),
        };

        let data: String = data.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        if data.is_empty() {
            return Err("image data is empty".to_string());
        }
        STANDARD
            .decode(data.as_bytes())
            .map_err(|e| format!("image data is not valid base64: {}", e))?;

        Ok(Self { mime_type, data })
    }
}

/// Drop a surrounding Markdown code fence, if any
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Skip the language tag line
    let rest = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest,
    };
    rest.trim_end().trim_end_matches("```").trim()
}

/// Slice from the first `open` to the last `close` delimiter
fn extract_delimited(text: &str, open: char, close: char) -> Option<&str> {
    let text = strip_code_fences(text);
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    (end > start).then(|| &text[start..=end])
}

/// Best-effort location of a JSON array inside model prose
pub fn extract_json_array(text: &str) -> Option<&str> {
    extract_delimited(text, '[', ']')
}

/// Best-effort location of a JSON object inside model prose
pub fn extract_json_object(text: &str) -> Option<&str> {
    extract_delimited(text, '{', '}')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("```json\n[\"a\"]\n```"), "[\"a\"]");
        assert_eq!(strip_code_fences("```\n{}\n```  "), "{}");
        assert_eq!(strip_code_fences("  plain  "), "plain");
    }

    #[test]
    fn test_extract_json_array_from_prose() {
        let text = "Here are your insights:\n[\"one\", \"two\"]\nHope this helps!";
        assert_eq!(extract_json_array(text), Some("[\"one\", \"two\"]"));
        assert_eq!(extract_json_array("no json here"), None);
        assert_eq!(extract_json_array("] backwards ["), None);
    }

    #[test]
    fn test_extract_json_object() {
        let text = "```json\n{\"events\": []}\n```";
        assert_eq!(extract_json_object(text), Some("{\"events\": []}"));
    }

    #[test]
    fn test_image_input_from_data_url() {
        let image = ImageInput::parse("data:image/png;base64,aGVsbG8=").unwrap();
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.data, "aGVsbG8=");
    }

    #[test]
    fn test_image_input_bare_base64_defaults_to_jpeg() {
        let image = ImageInput::parse("aGVs\nbG8=").unwrap();
        assert_eq!(image.mime_type, "image/jpeg");
        assert_eq!(image.data, "aGVsbG8=");
    }

    #[test]
    fn test_image_input_rejects_bad_payloads() {
        assert!(ImageInput::parse("").is_err());
        assert!(ImageInput::parse("data:image/png;base64,@@@").is_err());
        assert!(ImageInput::parse("data:text/plain;base64,aGVsbG8=").is_err());
        assert!(ImageInput::parse("data:image/png,aGVsbG8=").is_err());
    }

    #[test]
    fn test_completion_request_builder() {
        let request = CompletionRequest::new("sys", "user").max_tokens(200).json_object();
        assert_eq!(request.max_tokens, 200);
        assert!(request.json_object);
    }
}
