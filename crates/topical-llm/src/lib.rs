//! Completion client: OpenAI-compatible endpoints with retry and ordered fallback.

pub mod compatible;
pub mod config;
pub mod error;
pub mod http;
#[cfg(feature = "mock")]
pub mod mock;
pub mod provider;
pub(crate) mod retry;
pub mod router;

pub use compatible::CompatibleProvider;
pub use config::{GenerationOptions, ProviderConfig};
pub use error::LlmError;
pub use provider::{CompletionProvider, Message, Role};
pub use router::FallbackProvider;
