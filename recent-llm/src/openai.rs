use crate::traits::{LlmClient, LlmResponse};
use async_trait::async_trait;
use recent_common::{RecentError, Result};
use recent_http::{Auth, HttpClient, HttpError, RequestOpts};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Client for any OpenAI-compatible `chat/completions` endpoint (OpenRouter,
/// OpenAI, local gateways).
pub struct OpenAiClient {
    client: HttpClient,
    api_key: String,
    model: String,
    app_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".into(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".into(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
    #[serde(default)]
    pub usage: Option<ChatUsage>,
    /// OpenRouter reports some upstream failures inside a 200 body.
    #[serde(default)]
    pub error: Option<ChatApiError>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: ChoiceMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChatUsage {
    #[serde(default)]
    pub total_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct ChatApiError {
    #[serde(default)]
    pub message: String,
}

impl OpenAiClient {
    /// Create a client for the given endpoint, API key and model.
    pub fn new(base_url: &str, api_key: String, model: String) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(RecentError::Config("completion API key is empty".into()));
        }
        let client = HttpClient::new(base_url)
            .map_err(|e| RecentError::Config(format!("HttpClient init failed: {e}")))?;

        Ok(Self {
            client,
            api_key,
            model,
            app_name: None,
        })
    }

    /// Sent as `X-Title` so gateways can attribute traffic.
    pub fn with_app_name(mut self, name: &str) -> Self {
        self.app_name = Some(name.to_string());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = self.client.with_timeout(timeout);
        self
    }

    fn extra_headers(&self) -> Option<HeaderMap> {
        let name = self.app_name.as_deref()?;
        let value = HeaderValue::from_str(name).ok()?;
        let mut headers = HeaderMap::new();
        headers.insert(HeaderName::from_static("x-title"), value);
        Some(headers)
    }

    /// Send an ordered list of role-tagged messages and return the raw reply.
    pub async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse> {
        tracing::debug!(model = %request.model, messages = request.messages.len(), "llm.chat.start");

        let resp: ChatResponse = self
            .client
            .post_json_opts(
                "chat/completions",
                request,
                RequestOpts {
                    auth: Some(Auth::Bearer(&self.api_key)),
                    headers: self.extra_headers(),
                },
            )
            .await
            .map_err(http_to_recent)?;

        Ok(resp)
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn generate(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        max_tokens: Option<u32>,
        temperature: Option<f32>,
    ) -> Result<LlmResponse> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = system_prompt {
            messages.push(ChatMessage::system(system));
        }
        messages.push(ChatMessage::user(prompt));

        let req = ChatRequest {
            model: self.model.clone(),
            messages,
            temperature,
            max_tokens,
        };

        let resp = self.chat(&req).await?;

        if let Some(err) = resp.error {
            return Err(RecentError::Llm(err.message));
        }

        let choice = resp
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| RecentError::Llm("response contained no choices".into()))?;
        let text = choice
            .message
            .content
            .ok_or_else(|| RecentError::Llm("first choice has no content".into()))?;

        tracing::debug!(
            id = ?resp.id,
            finish_reason = ?choice.finish_reason,
            chars = text.len(),
            "llm.chat.done"
        );

        Ok(LlmResponse {
            text,
            model: resp.model,
            tokens_used: resp.usage.and_then(|u| u.total_tokens),
            finish_reason: choice.finish_reason,
        })
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

fn http_to_recent(e: HttpError) -> RecentError {
    RecentError::Llm(format!("{e}"))
}
