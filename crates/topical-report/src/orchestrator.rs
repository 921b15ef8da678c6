//! Fans the extraction pipeline out across all selected sources.

use std::sync::Mutex;

use topical_acquire::{Source, extract_pdf_text, fetch_website};
use topical_llm::CompletionProvider;

use crate::config::ExtractionConfig;
use crate::engine::{SourceReport, process_source};
use crate::structured::{StructuredTable, synthesize};

/// Which input lanes the user selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Pdf,
    Website,
    Both,
}

impl SourceKind {
    #[must_use]
    pub fn wants_files(self) -> bool {
        matches!(self, Self::Pdf | Self::Both)
    }

    #[must_use]
    pub fn wants_urls(self) -> bool {
        matches!(self, Self::Website | Self::Both)
    }
}

/// In-memory PDF upload.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// One user "extract" action.
#[derive(Debug, Clone)]
pub struct ExtractionRequest {
    pub kind: SourceKind,
    pub files: Vec<UploadedFile>,
    pub urls: Vec<String>,
    pub topic: String,
}

/// Progress event emitted as sources complete. Percentages are
/// monotonically non-decreasing.
#[derive(Debug, Clone)]
pub struct Progress {
    pub percent: u8,
    pub message: String,
}

pub type ProgressTx = tokio::sync::mpsc::UnboundedSender<Progress>;

/// Outcome of one extraction run. `success: false` only for validation or
/// total failure; partial source failures stay visible inline in `content`
/// with `success: true`.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    pub success: bool,
    pub content: String,
    pub images: Vec<String>,
    pub structured_data: StructuredTable,
    pub error: Option<String>,
}

impl ExtractionResult {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            content: String::new(),
            images: Vec::new(),
            structured_data: StructuredTable::new(),
            error: Some(message.into()),
        }
    }
}

/// Drives acquisition, per-source aggregation, and synthesis for a whole
/// request. Stateless across runs; every `extract` call is independent.
pub struct Extractor<P> {
    provider: P,
    config: ExtractionConfig,
    client: reqwest::Client,
}

impl<P: CompletionProvider> Extractor<P> {
    #[must_use]
    pub fn new(provider: P, config: ExtractionConfig) -> Self {
        Self {
            provider,
            config,
            client: topical_acquire::default_client(),
        }
    }

    /// Replace the HTTP client used for website acquisition.
    #[must_use]
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Run the full pipeline for one request.
    ///
    /// Validation happens before any network activity. All sources are
    /// processed concurrently; wall-clock time is bounded by the slowest
    /// source, not the sum. Progress events fire as each source finishes,
    /// plus a final 100% event.
    pub async fn extract(
        &self,
        request: ExtractionRequest,
        progress: Option<ProgressTx>,
    ) -> ExtractionResult {
        let topic = request.topic.trim();
        if topic.is_empty() {
            return ExtractionResult::failure("Please enter a topic");
        }

        let urls: Vec<&str> = request
            .urls
            .iter()
            .map(|u| u.trim())
            .filter(|u| !u.is_empty())
            .collect();

        let use_files = request.kind.wants_files() && !request.files.is_empty();
        let use_urls = request.kind.wants_urls() && !urls.is_empty();

        match request.kind {
            SourceKind::Pdf if !use_files => {
                return ExtractionResult::failure("Please select at least one PDF file");
            }
            SourceKind::Website if !use_urls => {
                return ExtractionResult::failure("Please enter at least one website URL");
            }
            SourceKind::Both if !use_files && !use_urls => {
                return ExtractionResult::failure(
                    "Please select PDF files or enter website URLs",
                );
            }
            _ => {}
        }

        let mut sources = Vec::new();
        if use_files {
            for file in request.files {
                sources.push(Source::file(file.name, file.bytes));
            }
        }
        if use_urls {
            for url in urls {
                sources.push(Source::website(url));
            }
        }

        let total = sources.len();
        let completed = Mutex::new(0usize);

        let tasks = sources.iter().map(|source| {
            let completed = &completed;
            let progress = progress.as_ref();
            async move {
                let (raw_text, images) = match source {
                    Source::File { name, bytes } => {
                        (extract_pdf_text(name, bytes.clone()).await, Vec::new())
                    }
                    Source::Website { url } => {
                        let page = fetch_website(&self.client, url).await;
                        (page.text, page.images)
                    }
                };

                let report =
                    process_source(&self.provider, &raw_text, &source.header(), topic, &self.config)
                        .await;

                if let Some(tx) = progress {
                    // Increment and send under one lock so percentages
                    // never go backwards across interleaved tasks.
                    let mut done = completed.lock().expect("progress counter lock");
                    *done += 1;
                    let percent = u8::try_from(*done * 100 / total).unwrap_or(100);
                    let _ = tx.send(Progress {
                        percent,
                        message: format!("Processed {}", source.label()),
                    });
                }

                (report, images)
            }
        });
        let outcomes = futures::future::join_all(tasks).await;

        let mut reports: Vec<SourceReport> = Vec::with_capacity(total);
        let mut images = Vec::new();
        for (report, mut source_images) in outcomes {
            reports.push(report);
            images.append(&mut source_images);
        }

        let meaningful: Vec<&SourceReport> = reports
            .iter()
            .filter(|r| r.is_meaningful(self.config.min_report_chars))
            .collect();

        let result = if meaningful.is_empty() {
            tracing::info!(topic, sources = total, "no meaningful findings");
            ExtractionResult {
                success: true,
                content: format!(
                    "No specific information about \"{topic}\" was found in the provided \
                     sources. Try a broader topic or add more sources."
                ),
                images,
                structured_data: StructuredTable::new(),
                error: None,
            }
        } else {
            let aggregated = meaningful
                .iter()
                .map(|r| r.content.as_str())
                .collect::<Vec<_>>()
                .join("\n\n");
            let structured_data =
                synthesize(&self.provider, &aggregated, topic, &self.config).await;

            let content = reports
                .iter()
                .map(|r| r.content.as_str())
                .collect::<Vec<_>>()
                .join("\n\n");

            ExtractionResult {
                success: true,
                content,
                images,
                structured_data,
                error: None,
            }
        };

        if let Some(tx) = &progress {
            let _ = tx.send(Progress {
                percent: 100,
                message: "Extraction complete!".to_owned(),
            });
        }

        result
    }
}
