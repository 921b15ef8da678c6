use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::{GenerationOptions, ProviderConfig};
use crate::error::LlmError;
use crate::provider::{CompletionProvider, Message};
use crate::retry::send_with_retry;

/// Client for any endpoint speaking the OpenAI chat-completions dialect.
///
/// Groq, OpenRouter, Together and self-hosted gateways all accept the same
/// request shape, so one client covers them all; only the base URL, key and
/// model differ per [`ProviderConfig`].
#[derive(Clone)]
pub struct CompatibleProvider {
    config: ProviderConfig,
    options: GenerationOptions,
    client: reqwest::Client,
}

impl fmt::Debug for CompatibleProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompatibleProvider")
            .field("config", &self.config)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ApiMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ApiMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

fn role_str(message: &Message) -> &'static str {
    match message.role {
        crate::provider::Role::System => "system",
        crate::provider::Role::User => "user",
        crate::provider::Role::Assistant => "assistant",
    }
}

impl CompatibleProvider {
    #[must_use]
    pub fn new(config: ProviderConfig, options: GenerationOptions, client: reqwest::Client) -> Self {
        let mut config = config;
        while config.base_url.ends_with('/') {
            config.base_url.pop();
        }
        Self {
            config,
            options,
            client,
        }
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.config.model
    }

    async fn send_request(&self, messages: &[Message]) -> Result<String, LlmError> {
        let url = format!("{}/chat/completions", self.config.base_url);
        let body = ChatRequest {
            model: &self.config.model,
            messages: messages
                .iter()
                .map(|m| ApiMessage {
                    role: role_str(m),
                    content: &m.content,
                })
                .collect(),
            temperature: self.options.temperature,
            max_tokens: self.options.max_tokens,
        };

        let response = send_with_retry(&self.config.name, self.options.max_retries, || {
            self.client
                .post(&url)
                .bearer_auth(&self.config.api_key)
                .json(&body)
                .send()
        })
        .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LlmError::Server {
                status: status.as_u16(),
            });
        }

        let parsed: ChatResponse = response.json().await?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| LlmError::MalformedResponse {
                provider: self.config.name.clone(),
            })?;

        Ok(content.trim().to_string())
    }
}

impl CompletionProvider for CompatibleProvider {
    async fn complete(&self, messages: &[Message]) -> Result<String, LlmError> {
        self.send_request(messages).await
    }

    fn name(&self) -> &str {
        &self.config.name
    }
}
