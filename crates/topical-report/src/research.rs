//! Standalone research-report surface: one analyst-style completion per
//! free-form question, parsed into headline and summary.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use topical_llm::{CompletionProvider, LlmError, Message};

use crate::orchestrator::{Progress, ProgressTx};
use crate::prompt::research_prompt;

static HEADLINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"HEADLINE:\s*(.+)").expect("headline pattern compiles"));

static SUMMARY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)SUMMARY:\s*(.+)").expect("summary pattern compiles"));

/// Parsed analyst report for one research question.
#[derive(Debug, Clone)]
pub struct ResearchReport {
    pub query: String,
    pub headline: String,
    pub summary: String,
    pub generated_at: DateTime<Utc>,
}

/// Ask the provider for an analyst report on `query`.
///
/// Unlike extraction, this surface has no heuristic fallback: a provider
/// failure propagates as an error. Missing HEADLINE/SUMMARY markers in the
/// reply degrade to defaults instead of failing.
///
/// # Errors
///
/// Returns the provider's error when the completion fails outright.
pub async fn research<P: CompletionProvider>(
    provider: &P,
    query: &str,
    progress: Option<&ProgressTx>,
) -> Result<ResearchReport, LlmError> {
    send_progress(progress, 10, "Analyzing your question...");

    let messages = [Message::user(research_prompt(query))];
    let reply = provider.complete(&messages).await?;

    send_progress(progress, 70, "Parsing analysis...");

    let headline = HEADLINE_RE
        .captures(&reply)
        .map_or_else(|| "Research Analysis Complete".to_owned(), |c| {
            c[1].trim().to_owned()
        });

    let summary = SUMMARY_RE
        .captures(&reply)
        .map_or_else(|| reply.clone(), |c| c[1].trim().to_owned());
    let summary = normalize_bullets(&summary);

    send_progress(progress, 100, "Research complete!");

    Ok(ResearchReport {
        query: query.to_owned(),
        headline,
        summary,
        generated_at: Utc::now(),
    })
}

/// Strip bold markers and rewrite asterisk bullets to arrows.
fn normalize_bullets(text: &str) -> String {
    text.replace("**", "").replace('*', "\u{2192}")
}

fn send_progress(progress: Option<&ProgressTx>, percent: u8, message: &str) {
    if let Some(tx) = progress {
        let _ = tx.send(Progress {
            percent,
            message: message.to_owned(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use topical_llm::mock::MockProvider;

    #[tokio::test]
    async fn parses_headline_and_summary() {
        let reply = "HEADLINE: Healthcare spending up 12% in 2024\n\
                     SUMMARY:\n\u{2192} Spending rose across all segments\n\u{2192} Growth led by devices";
        let mock = MockProvider::new(vec![reply]);

        let report = research(&mock, "healthcare spending", None).await.unwrap();
        assert_eq!(report.headline, "Healthcare spending up 12% in 2024");
        assert!(report.summary.starts_with("\u{2192} Spending rose"));
        assert_eq!(report.query, "healthcare spending");
    }

    #[tokio::test]
    async fn missing_markers_fall_back_to_defaults() {
        let mock = MockProvider::new(vec!["Just some freeform analysis text"]);
        let report = research(&mock, "q", None).await.unwrap();

        assert_eq!(report.headline, "Research Analysis Complete");
        assert_eq!(report.summary, "Just some freeform analysis text");
    }

    #[tokio::test]
    async fn asterisk_bullets_rewritten_to_arrows() {
        let reply = "HEADLINE: X\nSUMMARY:\n* first point\n* **second** point";
        let mock = MockProvider::new(vec![reply]);
        let report = research(&mock, "q", None).await.unwrap();

        assert!(!report.summary.contains('*'));
        assert!(report.summary.contains("\u{2192} first point"));
        assert!(report.summary.contains("\u{2192} second point"));
    }

    #[tokio::test]
    async fn provider_failure_propagates() {
        let mock = MockProvider::failing();
        let result = research(&mock, "q", None).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn progress_milestones_fire_in_order() {
        let mock = MockProvider::new(vec!["HEADLINE: X\nSUMMARY: y"]);
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

        research(&mock, "q", Some(&tx)).await.unwrap();
        drop(tx);

        let mut percents = Vec::new();
        while let Some(event) = rx.recv().await {
            percents.push(event.percent);
        }
        assert_eq!(percents, vec![10, 70, 100]);
    }
}
