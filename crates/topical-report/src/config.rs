use serde::Deserialize;

/// Pipeline thresholds. Defaults match the production tuning; hosts may
/// override any field through deserialization or struct update.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Maximum characters per chunk sent as one model request.
    pub max_chunk_size: usize,
    /// Sources shorter than this are reported as insufficient, no model call.
    pub min_source_chars: usize,
    /// Chunk replies at or below this length are discarded as noise.
    pub min_chunk_reply_chars: usize,
    /// A source report shorter than this is not considered meaningful.
    pub min_report_chars: usize,
    /// Row cap for the regex fallback table.
    pub max_fallback_rows: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            max_chunk_size: 6000,
            min_source_chars: 50,
            min_chunk_reply_chars: 30,
            min_report_chars: 100,
            max_fallback_rows: 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ExtractionConfig::default();
        assert_eq!(config.max_chunk_size, 6000);
        assert_eq!(config.min_source_chars, 50);
        assert_eq!(config.min_chunk_reply_chars, 30);
        assert_eq!(config.min_report_chars, 100);
        assert_eq!(config.max_fallback_rows, 5);
    }

    #[test]
    fn partial_deserialization_keeps_defaults() {
        let config: ExtractionConfig =
            serde_json::from_str("{\"max_chunk_size\": 8000}").unwrap();
        assert_eq!(config.max_chunk_size, 8000);
        assert_eq!(config.min_source_chars, 50);
    }
}
