/// One input to the extraction pipeline.
#[derive(Debug, Clone)]
pub enum Source {
    /// Uploaded PDF, held entirely in memory.
    File { name: String, bytes: Vec<u8> },
    /// Web page address to fetch.
    Website { url: String },
}

impl Source {
    #[must_use]
    pub fn file(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self::File {
            name: name.into(),
            bytes,
        }
    }

    #[must_use]
    pub fn website(url: impl Into<String>) -> Self {
        Self::Website { url: url.into() }
    }

    /// Section header identifying this source in the merged report.
    #[must_use]
    pub fn header(&self) -> String {
        match self {
            Self::File { name, .. } => format!("FILE: {name}"),
            Self::Website { url } => format!("WEBSITE: {url}"),
        }
    }

    /// Short label for logs.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::File { name, .. } => name,
            Self::Website { url } => url,
        }
    }
}

/// Prefix marking acquisition failures captured as text.
pub const ERROR_SENTINEL_PREFIX: &str = "[Error";

/// Whether raw text is an acquisition failure sentinel rather than content.
#[must_use]
pub fn is_error_sentinel(text: &str) -> bool {
    text.starts_with(ERROR_SENTINEL_PREFIX)
}
