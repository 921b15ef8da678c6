#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("rate limited")]
    RateLimited,

    #[error("server error (status {status})")]
    Server { status: u16 },

    #[error("malformed response from {provider}")]
    MalformedResponse { provider: String },

    #[error("no providers available")]
    NoProviders,
}
