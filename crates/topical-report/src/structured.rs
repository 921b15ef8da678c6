//! Structured-data synthesis: model-backed JSON table with a regex fallback.
//!
//! This stage never fails. The model path parses the first balanced JSON
//! array in the reply; anything malformed, empty, or erroring drops to the
//! pattern-matching heuristic, which itself bottoms out in a single
//! diagnostic row. Callers always get at least one row back.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};
use topical_llm::{CompletionProvider, Message};

use crate::config::ExtractionConfig;
use crate::prompt::{SYSTEM_PROMPT, structured_prompt};

/// One table row: column name to scalar value.
pub type StructuredRow = Map<String, Value>;

/// Ordered rows sharing a loosely consistent column set.
pub type StructuredTable = Vec<StructuredRow>;

static ORG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([A-Z][A-Za-z\s&]+(?:Ltd|Inc|Corp|Company|Industries|Group))")
        .expect("org pattern compiles")
});

static AMOUNT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)([\u{20b9}$\u{20ac}\u{a3}][\d,.]+\s*(?:crore|lakh|Cr|L|million|billion|M|B)?)")
        .expect("amount pattern compiles")
});

static YEAR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(20\d{2}-?\d{0,2})").expect("year pattern compiles")
});

/// Produce a structured table for `topic` from the aggregated report text.
///
/// Asks the provider for a JSON array first; on any failure falls back to
/// [`fallback_table`]. Returns at least one row.
pub async fn synthesize<P: CompletionProvider>(
    provider: &P,
    aggregated: &str,
    topic: &str,
    config: &ExtractionConfig,
) -> StructuredTable {
    let messages = [
        Message::system(SYSTEM_PROMPT),
        Message::user(structured_prompt(aggregated, topic)),
    ];

    match provider.complete(&messages).await {
        Ok(reply) => match parse_table(&reply) {
            Some(rows) => rows,
            None => {
                tracing::warn!(topic, "structured reply unusable, using regex fallback");
                fallback_table(aggregated, topic, config)
            }
        },
        Err(e) => {
            tracing::warn!(topic, error = %e, "structured completion failed, using regex fallback");
            fallback_table(aggregated, topic, config)
        }
    }
}

/// Parse the first balanced `[...]` substring of `reply` as a JSON array of
/// flat objects. `None` when no usable rows are found.
fn parse_table(reply: &str) -> Option<StructuredTable> {
    let json = balanced_array(reply)?;
    let value: Value = serde_json::from_str(json).ok()?;
    let items = value.as_array()?;

    let rows: StructuredTable = items
        .iter()
        .filter_map(|item| item.as_object().cloned())
        .collect();

    if rows.is_empty() { None } else { Some(rows) }
}

/// Locate the first balanced top-level `[...]` in `text`, honoring JSON
/// string literals and escapes so brackets inside values do not miscount.
fn balanced_array(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            '[' if !in_string => depth += 1,
            ']' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=start + offset]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Pattern-matching approximation used when the model path yields nothing.
///
/// Scans report lines for organization names, currency amounts, and fiscal
/// years, pairing whatever matched positionally; missing fields get
/// placeholder values. With no matches at all, emits one diagnostic row so
/// the table is never empty.
#[must_use]
pub fn fallback_table(aggregated: &str, topic: &str, config: &ExtractionConfig) -> StructuredTable {
    let lines: Vec<&str> = aggregated
        .lines()
        .map(str::trim)
        .filter(|line| line.chars().count() > 20)
        .collect();

    let mut rows = StructuredTable::new();
    for (i, line) in lines.iter().take(config.max_fallback_rows).enumerate() {
        let entity = ORG_RE
            .captures(line)
            .map_or_else(|| format!("Item {}", i + 1), |c| c[1].trim().to_owned());
        let amount = AMOUNT_RE
            .captures(line)
            .map_or_else(|| "Not specified".to_owned(), |c| c[1].to_owned());
        let year = YEAR_RE
            .captures(line)
            .map_or_else(|| "Recent".to_owned(), |c| c[1].to_owned());

        let mut row = StructuredRow::new();
        row.insert("S.No".to_owned(), Value::from(i + 1));
        row.insert("Entity".to_owned(), Value::from(entity));
        row.insert("Amount/Value".to_owned(), Value::from(amount));
        row.insert("Year/Period".to_owned(), Value::from(year));
        row.insert("Topic".to_owned(), Value::from(topic));
        row.insert("Description".to_owned(), Value::from(excerpt(line, 100)));
        row.insert("Source".to_owned(), Value::from("Extracted from content"));
        rows.push(row);
    }

    if rows.is_empty() {
        rows.push(diagnostic_row(aggregated, topic));
    }
    rows
}

fn excerpt(line: &str, max_chars: usize) -> String {
    if line.chars().count() <= max_chars {
        line.to_owned()
    } else {
        let cut: String = line.chars().take(max_chars).collect();
        format!("{cut}...")
    }
}

fn diagnostic_row(aggregated: &str, topic: &str) -> StructuredRow {
    let mut row = StructuredRow::new();
    row.insert("S.No".to_owned(), Value::from(1));
    row.insert("Topic".to_owned(), Value::from(topic));
    row.insert("Status".to_owned(), Value::from("Content analyzed"));
    row.insert(
        "Content Length".to_owned(),
        Value::from(format!("{} characters", aggregated.chars().count())),
    );
    row.insert(
        "Generated On".to_owned(),
        Value::from(chrono::Local::now().format("%d/%m/%Y").to_string()),
    );
    row.insert(
        "Note".to_owned(),
        Value::from("Please upload more specific content for detailed extraction"),
    );
    row
}
