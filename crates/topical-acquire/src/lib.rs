//! Raw text acquisition from PDF files and web pages.
//!
//! Acquisition never fails outright: every failure is captured as a sentinel
//! string starting with `[Error` so that a broken source flows through the
//! pipeline as visible content instead of aborting the whole extraction.

pub mod pdf;
pub mod source;
pub mod web;

pub use pdf::extract_pdf_text;
pub use source::{ERROR_SENTINEL_PREFIX, Source, is_error_sentinel};
pub use web::{WebPage, default_client, fetch_website};

/// Internal failure classification, surfaced only inside sentinel strings.
#[derive(Debug, thiserror::Error)]
pub enum AcquireError {
    #[error("{0}")]
    Pdf(String),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("invalid selector: {0}")]
    Selector(String),

    #[error("worker task failed: {0}")]
    Task(String),
}
