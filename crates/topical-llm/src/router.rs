use crate::compatible::CompatibleProvider;
use crate::config::{GenerationOptions, ProviderConfig};
use crate::error::LlmError;
use crate::provider::{CompletionProvider, Message};

/// Ordered chain of endpoints tried front to back.
///
/// A request goes to the first endpoint; on any error the next one is tried
/// with the same messages. Only when every endpoint has failed does the
/// caller see an error, carrying the last failure. The order given at
/// construction is the priority order.
#[derive(Debug, Clone)]
pub struct FallbackProvider {
    providers: Vec<CompatibleProvider>,
}

impl FallbackProvider {
    #[must_use]
    pub fn new(providers: Vec<CompatibleProvider>) -> Self {
        Self { providers }
    }

    /// Build the chain from endpoint configs sharing one client and options.
    #[must_use]
    pub fn from_configs(
        configs: Vec<ProviderConfig>,
        options: GenerationOptions,
        client: &reqwest::Client,
    ) -> Self {
        let providers = configs
            .into_iter()
            .map(|config| CompatibleProvider::new(config, options, client.clone()))
            .collect();
        Self { providers }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.providers.len()
    }
}

impl CompletionProvider for FallbackProvider {
    async fn complete(&self, messages: &[Message]) -> Result<String, LlmError> {
        let mut last_error = LlmError::NoProviders;
        for provider in &self.providers {
            match provider.complete(messages).await {
                Ok(content) => return Ok(content),
                Err(e) => {
                    tracing::warn!(
                        provider = provider.name(),
                        error = %e,
                        "provider failed, falling back"
                    );
                    last_error = e;
                }
            }
        }
        Err(last_error)
    }

    fn name(&self) -> &str {
        "fallback"
    }
}
