//! Text-generation capability.
//!
//! The rest of the pipeline treats the model as a black box behind
//! [`CompletionClient`]: given a prompt (and optionally a JSON schema the
//! output must conform to), return text or fail. Callers own all recovery;
//! nothing in this module retries or falls back.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::config::LlmConfig;
use crate::error::LlmError;

/// A black-box completion capability.
///
/// Implementations must be cheap to share (`Arc<dyn CompletionClient>`); the
/// pipeline is constructed with one injected instance so tests can substitute
/// fakes.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Complete a prompt, constraining the output to the given JSON schema.
    /// Returns the raw completion text, which may still be malformed.
    async fn complete_json(
        &self,
        prompt: &str,
        schema: &serde_json::Value,
    ) -> Result<String, LlmError>;

    /// Complete a prompt with no output constraint.
    async fn complete_text(&self, prompt: &str) -> Result<String, LlmError>;
}

/// HTTP client against an OpenAI-compatible chat-completions endpoint.
pub struct HttpCompletionClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl HttpCompletionClient {
    pub fn new(config: &LlmConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.resolve_api_key(),
        }
    }

    async fn chat(&self, body: serde_json::Value) -> Result<String, LlmError> {
        let url = format!("{}/chat/completions", self.base_url);
        let mut request = self.http.post(&url).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let completion: ChatCompletion = response
            .json()
            .await
            .map_err(|e| LlmError::Malformed(e.to_string()))?;
        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();

        if content.trim().is_empty() {
            return Err(LlmError::EmptyCompletion);
        }
        Ok(content)
    }
}

#[async_trait]
impl CompletionClient for HttpCompletionClient {
    async fn complete_json(
        &self,
        prompt: &str,
        schema: &serde_json::Value,
    ) -> Result<String, LlmError> {
        let body = json!({
            "model": self.model,
            "messages": [{"role": "user", "content": prompt}],
            "response_format": {
                "type": "json_schema",
                "json_schema": {
                    "name": "structured_query",
                    "schema": schema,
                }
            },
        });
        self.chat(body).await
    }

    async fn complete_text(&self, prompt: &str) -> Result<String, LlmError> {
        let body = json!({
            "model": self.model,
            "messages": [{"role": "user", "content": prompt}],
        });
        self.chat(body).await
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

/// Canned completion client for unit tests across the crate.
#[cfg(test)]
pub(crate) struct MockCompletion {
    pub json_reply: std::result::Result<String, String>,
    pub text_reply: std::result::Result<String, String>,
}

#[cfg(test)]
impl MockCompletion {
    /// Mock that answers every call with the same text.
    pub fn replying(text: &str) -> Self {
        Self {
            json_reply: Ok(text.to_string()),
            text_reply: Ok(text.to_string()),
        }
    }

    /// Mock that fails every call.
    pub fn failing(message: &str) -> Self {
        Self {
            json_reply: Err(message.to_string()),
            text_reply: Err(message.to_string()),
        }
    }
}

#[cfg(test)]
#[async_trait]
impl CompletionClient for MockCompletion {
    async fn complete_json(
        &self,
        _prompt: &str,
        _schema: &serde_json::Value,
    ) -> Result<String, LlmError> {
        self.json_reply
            .clone()
            .map_err(|m| LlmError::Api { status: 500, message: m })
    }

    async fn complete_text(&self, _prompt: &str) -> Result<String, LlmError> {
        self.text_reply
            .clone()
            .map_err(|m| LlmError::Api { status: 500, message: m })
    }
}
