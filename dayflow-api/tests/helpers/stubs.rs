//! Stub providers
//!
//! Stand-ins for Supabase auth and the language models, implementing the
//! same service traits the real clients do.

use async_trait::async_trait;
use dayflow_api::services::{
    AuthError, AuthProvider, AuthUser, CompletionRequest, ImageInput, LlmError, TextModel,
    VisionModel,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Fixed token → user table
pub struct StaticAuth {
    users: HashMap<String, AuthUser>,
}

impl StaticAuth {
    pub fn new(tokens: &[(&str, &str)]) -> Self {
        let users = tokens
            .iter()
            .map(|(token, user_id)| {
                (
                    token.to_string(),
                    AuthUser {
                        id: user_id.to_string(),
                        email: Some(format!("{}@example.com", user_id)),
                    },
                )
            })
            .collect();
        Self { users }
    }
}

#[async_trait]
impl AuthProvider for StaticAuth {
    async fn verify(&self, token: &str) -> Result<AuthUser, AuthError> {
        self.users.get(token).cloned().ok_or(AuthError::InvalidToken)
    }
}

enum Script {
    Reply(String),
    Fail,
    Panic,
}

/// Model that returns a fixed reply (or fails) and records its calls
pub struct ScriptedModel {
    script: Script,
    calls: AtomicUsize,
    last_images: Mutex<usize>,
}

impl ScriptedModel {
    fn with_script(script: Script) -> Arc<Self> {
        Arc::new(Self {
            script,
            calls: AtomicUsize::new(0),
            last_images: Mutex::new(0),
        })
    }

    pub fn replying(reply: impl Into<String>) -> Arc<Self> {
        Self::with_script(Script::Reply(reply.into()))
    }

    /// Every call fails with a provider error
    pub fn failing() -> Arc<Self> {
        Self::with_script(Script::Fail)
    }

    /// Every call panics inside the request handler
    pub fn panicking() -> Arc<Self> {
        Self::with_script(Script::Panic)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Image count of the most recent vision call
    pub fn last_image_count(&self) -> usize {
        *self.last_images.lock().unwrap()
    }

    fn respond(&self) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.script {
            Script::Reply(reply) => Ok(reply.clone()),
            Script::Fail => Err(LlmError::Api(503, "model overloaded".to_string())),
            Script::Panic => panic!("scripted model exploded"),
        }
    }
}

#[async_trait]
impl TextModel for ScriptedModel {
    fn model_name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, _request: &CompletionRequest) -> Result<String, LlmError> {
        self.respond()
    }
}

#[async_trait]
impl VisionModel for ScriptedModel {
    fn model_name(&self) -> &str {
        "scripted-vision"
    }

    async fn complete_with_images(
        &self,
        _request: &CompletionRequest,
        images: &[ImageInput],
    ) -> Result<String, LlmError> {
        *self.last_images.lock().unwrap() = images.len();
        self.respond()
    }
}
