//! HTTP client construction tuned for completion endpoints.

use std::time::Duration;

/// Create the client used for completion requests.
///
/// Config: 10s connect timeout so a dead endpoint fails over quickly, 120s
/// request timeout to leave room for large `max_tokens` completions,
/// rustls TLS, `topical/{version}` user-agent. Redirects are never
/// followed; a redirect would carry the bearer token to another host.
#[must_use]
pub fn default_client() -> reqwest::Client {
    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .timeout(Duration::from_secs(120))
        .user_agent(concat!("topical/", env!("CARGO_PKG_VERSION")))
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("default HTTP client construction must not fail")
}
