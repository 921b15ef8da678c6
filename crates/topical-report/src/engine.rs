//! Chunking and aggregation engine: one source in, one report section out.

use topical_acquire::is_error_sentinel;
use topical_llm::{CompletionProvider, Message};

use crate::chunker::chunk_text;
use crate::config::ExtractionConfig;
use crate::prompt::{SENTINEL_PREFIX, SYSTEM_PROMPT, chunk_prompt};

/// How a source report came to be, deciding whether it counts as a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    /// At least one chunk produced relevant data.
    Extracted,
    /// All chunks came back empty or filtered out.
    Empty,
    /// Raw text was too short to be worth a model call.
    Insufficient,
    /// Acquisition produced an error sentinel instead of content.
    AcquisitionFailed,
}

/// Aggregated, filtered report text for one input source.
#[derive(Debug, Clone)]
pub struct SourceReport {
    pub header: String,
    pub content: String,
    pub kind: ReportKind,
}

impl SourceReport {
    /// Whether this report carries actual findings worth synthesizing.
    #[must_use]
    pub fn is_meaningful(&self, min_report_chars: usize) -> bool {
        self.kind == ReportKind::Extracted && self.content.chars().count() >= min_report_chars
    }
}

fn no_data_report(header: &str, topic: &str) -> String {
    format!("**{header}**\n\nNo specific data about \"{topic}\" found in this source.")
}

fn insufficient_report(header: &str, topic: &str) -> String {
    format!("**{header}**\n\nInsufficient content in this source to analyze for \"{topic}\".")
}

fn failed_report(header: &str, raw_text: &str) -> String {
    format!("**{header}**\n\n{raw_text}")
}

/// Chunk the raw text, prompt the provider once per chunk, filter the
/// replies, and join the survivors into one labeled report section.
///
/// Chunk completions run concurrently but the output keeps source order:
/// results are collected by chunk index, not arrival order. A failed chunk
/// is logged and dropped instead of sinking the rest of the source. The
/// returned content is never an empty string.
pub async fn process_source<P: CompletionProvider>(
    provider: &P,
    raw_text: &str,
    header: &str,
    topic: &str,
    config: &ExtractionConfig,
) -> SourceReport {
    if is_error_sentinel(raw_text) {
        return SourceReport {
            header: header.to_owned(),
            content: failed_report(header, raw_text),
            kind: ReportKind::AcquisitionFailed,
        };
    }

    if raw_text.chars().count() < config.min_source_chars {
        return SourceReport {
            header: header.to_owned(),
            content: insufficient_report(header, topic),
            kind: ReportKind::Insufficient,
        };
    }

    // A zero chunk size can arrive through host config; chunk_text needs
    // a positive bound.
    let chunks = chunk_text(raw_text, config.max_chunk_size.max(1));
    let total = chunks.len();

    let completions = chunks.iter().map(|chunk| {
        let messages = [
            Message::system(SYSTEM_PROMPT),
            Message::user(chunk_prompt(chunk, header, topic)),
        ];
        async move { provider.complete(&messages).await }
    });
    let replies = futures::future::join_all(completions).await;

    let mut pieces = Vec::new();
    for (i, reply) in replies.into_iter().enumerate() {
        let reply = match reply {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(
                    source = header,
                    chunk = i + 1,
                    error = %e,
                    "chunk completion failed, dropping chunk"
                );
                continue;
            }
        };

        if reply.contains(SENTINEL_PREFIX) || reply.chars().count() <= config.min_chunk_reply_chars
        {
            continue;
        }

        let label = if total == 1 {
            header.to_owned()
        } else {
            format!("{header} (Part {}/{total})", i + 1)
        };
        pieces.push(format!("**{label}**\n{reply}"));
    }

    if pieces.is_empty() {
        return SourceReport {
            header: header.to_owned(),
            content: no_data_report(header, topic),
            kind: ReportKind::Empty,
        };
    }

    SourceReport {
        header: header.to_owned(),
        content: pieces.join("\n\n---\n\n"),
        kind: ReportKind::Extracted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use topical_llm::mock::MockProvider;

    fn config() -> ExtractionConfig {
        ExtractionConfig::default()
    }

    fn long_text(chars: usize) -> String {
        "corporate spending data ".repeat(chars / 24 + 1)[..chars].to_owned()
    }

    #[tokio::test]
    async fn short_source_skips_model_entirely() {
        let mock = MockProvider::new(vec!["should not be called"]);
        let report = process_source(&mock, "tiny", "FILE: a.pdf", "Education", &config()).await;

        assert_eq!(report.kind, ReportKind::Insufficient);
        assert!(report.content.contains("Insufficient content"));
        assert!(report.content.contains("\"Education\""));
        assert_eq!(mock.calls(), 0);
    }

    #[tokio::test]
    async fn acquisition_sentinel_skips_model_entirely() {
        let mock = MockProvider::new(vec!["should not be called"]);
        let raw = "[Error reading PDF a.pdf]: file is encrypted";
        let report = process_source(&mock, raw, "FILE: a.pdf", "Education", &config()).await;

        assert_eq!(report.kind, ReportKind::AcquisitionFailed);
        assert!(report.content.contains("[Error reading PDF a.pdf]"));
        assert_eq!(mock.calls(), 0);
        assert!(!report.is_meaningful(10));
    }

    #[tokio::test]
    async fn single_chunk_labeled_without_part_suffix() {
        let reply = "\u{2022} CSR budget for 2023-24 was \u{20b9}45 Cr across two programs";
        let mock = MockProvider::new(vec![reply]);
        let report =
            process_source(&mock, &long_text(200), "FILE: a.pdf", "CSR", &config()).await;

        assert_eq!(report.kind, ReportKind::Extracted);
        assert!(report.content.starts_with("**FILE: a.pdf**\n"));
        assert!(!report.content.contains("Part"));
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test]
    async fn multi_chunk_labels_carry_part_numbers() {
        let reply_a = "\u{2022} Fact one with enough detail to pass the length filter easily";
        let reply_b = "\u{2022} Fact two with enough detail to pass the length filter easily";
        let mock = MockProvider::new(vec![reply_a, reply_b]);

        let mut config = config();
        config.max_chunk_size = 100;
        let report =
            process_source(&mock, &long_text(150), "FILE: a.pdf", "CSR", &config).await;

        assert_eq!(mock.calls(), 2);
        assert!(report.content.contains("**FILE: a.pdf (Part 1/2)**"));
        assert!(report.content.contains("**FILE: a.pdf (Part 2/2)**"));
        assert!(report.content.contains("\n\n---\n\n"));
    }

    #[tokio::test]
    async fn sentinel_replies_are_filtered_out() {
        let mock = MockProvider::new(vec!["No data found for CSR"]);
        let report =
            process_source(&mock, &long_text(200), "FILE: a.pdf", "CSR", &config()).await;

        assert_eq!(report.kind, ReportKind::Empty);
        assert_eq!(
            report.content,
            "**FILE: a.pdf**\n\nNo specific data about \"CSR\" found in this source."
        );
        assert!(!report.content.is_empty());
    }

    #[tokio::test]
    async fn short_replies_are_filtered_out() {
        let mock = MockProvider::new(vec!["too short"]);
        let report =
            process_source(&mock, &long_text(200), "FILE: a.pdf", "CSR", &config()).await;
        assert_eq!(report.kind, ReportKind::Empty);
    }

    #[tokio::test]
    async fn provider_failure_treated_as_empty_chunk() {
        let mock = MockProvider::failing();
        let report =
            process_source(&mock, &long_text(200), "FILE: a.pdf", "CSR", &config()).await;

        assert_eq!(report.kind, ReportKind::Empty);
        assert!(report.content.contains("No specific data"));
    }

    #[tokio::test]
    async fn slow_first_chunk_still_ordered_first() {
        let reply_a = "\u{2022} FIRST chunk findings padded well past the length threshold";
        let reply_b = "\u{2022} SECOND chunk findings padded well past the length threshold";
        let mock = MockProvider::new(vec![reply_a, reply_b]).with_delays(vec![50, 0]);

        let mut config = config();
        config.max_chunk_size = 100;
        let report =
            process_source(&mock, &long_text(150), "FILE: a.pdf", "CSR", &config).await;

        let first = report.content.find("FIRST").expect("first chunk present");
        let second = report.content.find("SECOND").expect("second chunk present");
        assert!(first < second, "chunk order must follow source order");
    }

    #[tokio::test]
    async fn zero_chunk_size_is_clamped_not_a_panic() {
        let mock = MockProvider::new(vec!["No data found for CSR"]);
        let mut config = config();
        config.max_chunk_size = 0;

        let text = long_text(60);
        let report = process_source(&mock, &text, "FILE: a.pdf", "CSR", &config).await;

        // Clamped to one character per chunk: one call per character
        assert_eq!(mock.calls(), 60);
        assert_eq!(report.kind, ReportKind::Empty);
    }

    #[tokio::test]
    async fn meaningful_requires_extraction_and_length() {
        let reply = "\u{2022} A single decently sized factual bullet about the topic at hand";
        let mock = MockProvider::new(vec![reply]);
        let report =
            process_source(&mock, &long_text(200), "FILE: a.pdf", "CSR", &config()).await;

        assert!(report.is_meaningful(10));
        assert!(!report.is_meaningful(10_000));
    }
}
