//! Scripted provider for exercising pipelines without network access.
//!
//! Only compiled with the `mock` feature, intended for dev-dependencies of
//! downstream crates.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio::sync::Mutex;

use crate::error::LlmError;
use crate::provider::{CompletionProvider, Message};

/// Provider answering from a fixed queue of responses, in order.
///
/// Each call pops the next scripted response (and optional per-call delay)
/// and bumps the call counter. Once the queue runs dry every further call
/// repeats the last response, so tests do not have to count prompts exactly.
#[derive(Clone)]
pub struct MockProvider {
    responses: Arc<Mutex<Vec<String>>>,
    delays: Arc<Mutex<Vec<Duration>>>,
    calls: Arc<AtomicUsize>,
    fail: bool,
}

impl MockProvider {
    #[must_use]
    pub fn new(responses: Vec<&str>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(
                responses.into_iter().map(String::from).collect(),
            )),
            delays: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(AtomicUsize::new(0)),
            fail: false,
        }
    }

    /// Provider whose every call fails with a server error.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            delays: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(AtomicUsize::new(0)),
            fail: true,
        }
    }

    /// Per-call sleeps applied before answering, matched by position with
    /// the response queue. Lets a test make an earlier prompt finish later.
    #[must_use]
    pub fn with_delays(self, delays: Vec<u64>) -> Self {
        {
            let mut guard = self
                .delays
                .try_lock()
                .expect("delays configured before any call");
            *guard = delays.into_iter().map(Duration::from_millis).collect();
        }
        self
    }

    /// Number of `complete` calls made so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl CompletionProvider for MockProvider {
    async fn complete(&self, _messages: &[Message]) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.fail {
            return Err(LlmError::Server { status: 500 });
        }

        let (response, delay) = {
            let mut responses = self.responses.lock().await;
            let mut delays = self.delays.lock().await;
            let response = if responses.len() > 1 {
                responses.remove(0)
            } else {
                responses
                    .first()
                    .cloned()
                    .ok_or(LlmError::NoProviders)?
            };
            let delay = if delays.is_empty() {
                Duration::ZERO
            } else {
                delays.remove(0)
            };
            (response, delay)
        };

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        Ok(response)
    }

    fn name(&self) -> &str {
        "mock"
    }
}
