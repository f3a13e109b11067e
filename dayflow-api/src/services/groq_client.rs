//! Groq chat completions client
//!
//! OpenAI-compatible `POST /openai/v1/chat/completions` with a bearer key.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::llm::{CompletionRequest, LlmError, TextModel};

const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";
const USER_AGENT: &str = concat!("dayflow-api/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// Groq API client
pub struct GroqClient {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
}

impl GroqClient {
    pub fn new(api_key: String, model: String, temperature: f32) -> Result<Self, LlmError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| LlmError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: GROQ_BASE_URL.to_string(),
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

    fn build_body<'a>(&'a self, request: &'a CompletionRequest) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &request.system,
                },
                ChatMessage {
                    role: "user",
                    content: &request.prompt,
                },
            ],
            temperature: self.temperature,
            max_tokens: request.max_tokens,
            response_format: request
                .json_object
                .then_some(ResponseFormat { kind: "json_object" }),
        }
    }
}

#[async_trait]
impl TextModel for GroqClient {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        tracing::debug!(model = %self.model, max_tokens = request.max_tokens, "Querying Groq API");

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&self.build_body(request))
            .send()
            .await
            .map_err(|e| LlmError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(LlmError::Api(status.as_u16(), error_text));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Parse(e.to_string()))?;

        let content = chat
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or(LlmError::EmptyResponse)?;

        tracing::debug!(model = %self.model, chars = content.len(), "Groq completion received");
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client() -> GroqClient {
        GroqClient::new("gsk_test".to_string(), "llama-3.3-70b-versatile".to_string(), 0.3).unwrap()
    }

    #[test]
    fn test_request_body_shape() {
        let client = client();
        let request = CompletionRequest::new("be brief", "hello").max_tokens(64);
        let body = serde_json::to_value(client.build_body(&request)).unwrap();

        assert_eq!(body["model"], "llama-3.3-70b-versatile");
        assert_eq!(body["messages"][0], json!({"role": "system", "content": "be brief"}));
        assert_eq!(body["messages"][1], json!({"role": "user", "content": "hello"}));
        assert_eq!(body["max_tokens"], 64);
        assert!(body.get("response_format").is_none());
    }

    #[test]
    fn test_json_object_mode() {
        let client = client();
        let request = CompletionRequest::new("s", "p").json_object();
        let body = serde_json::to_value(client.build_body(&request)).unwrap();
        assert_eq!(body["response_format"], json!({"type": "json_object"}));
    }

    #[test]
    fn test_response_parsing() {
        let chat: ChatResponse = serde_json::from_value(json!({
            "id": "chatcmpl-1",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": " hi "}}]
        }))
        .unwrap();
        assert_eq!(chat.choices[0].message.content.as_deref(), Some(" hi "));
    }

    fn mock_client(server: &mockito::ServerGuard) -> GroqClient {
        client().with_base_url(format!("{}/", server.url()))
    }

    #[tokio::test]
    async fn test_complete_sends_bearer_and_trims_reply() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer gsk_test")
            .match_body(mockito::Matcher::PartialJson(json!({
                "model": "llama-3.3-70b-versatile",
                "response_format": {"type": "json_object"}
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices": [{"message": {"role": "assistant", "content": "  {\"events\": []}\n"}}]}"#)
            .create_async()
            .await;

        let client = mock_client(&server);
        let reply = client
            .complete(&CompletionRequest::new("s", "p").json_object())
            .await
            .unwrap();

        assert_eq!(reply, r#"{"events": []}"#);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_non_success_status_is_api_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(429)
            .with_body("rate limited")
            .create_async()
            .await;

        let err = mock_client(&server)
            .complete(&CompletionRequest::new("s", "p"))
            .await
            .unwrap_err();

        assert!(matches!(err, LlmError::Api(429, ref body) if body == "rate limited"));
    }

    #[tokio::test]
    async fn test_malformed_payload_is_parse_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body("<html>gateway</html>")
            .create_async()
            .await;

        let err = mock_client(&server)
            .complete(&CompletionRequest::new("s", "p"))
            .await
            .unwrap_err();

        assert!(matches!(err, LlmError::Parse(_)));
    }

    #[tokio::test]
    async fn test_blank_choice_is_empty_response() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(r#"{"choices": [{"message": {"content": "   "}}]}"#)
            .create_async()
            .await;

        let err = mock_client(&server)
            .complete(&CompletionRequest::new("s", "p"))
            .await
            .unwrap_err();

        assert!(matches!(err, LlmError::EmptyResponse));
    }
}
