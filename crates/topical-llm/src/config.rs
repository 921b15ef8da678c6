use std::fmt;

use serde::Deserialize;

/// Connection details for one OpenAI-compatible completion endpoint.
///
/// Built by the host and injected at construction; there is no global
/// configuration object and no key read from the environment by this crate.
#[derive(Clone, Deserialize)]
pub struct ProviderConfig {
    /// Short label used in logs and error messages (e.g. "groq").
    pub name: String,
    /// Base URL up to but excluding `/chat/completions`.
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("name", &self.name)
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .finish()
    }
}

impl ProviderConfig {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }
}

/// Sampling and client policy shared by all configured endpoints.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct GenerationOptions {
    /// Sampling temperature (0.0 - 1.0).
    pub temperature: f32,
    /// Maximum tokens in the completion.
    pub max_tokens: u32,
    /// Retry budget per endpoint for rate-limit and server errors.
    pub max_retries: u32,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            temperature: 0.1,
            max_tokens: 2500,
            max_retries: 3,
        }
    }
}

impl GenerationOptions {
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }
}
