//! Topic-driven extraction pipeline.
//!
//! Splits each source's raw text into bounded chunks, prompts a completion
//! provider per chunk, filters and aggregates the replies into per-source
//! report sections, and synthesizes a structured table from the merged
//! result. The orchestrator fans the whole thing out across sources.

pub mod chunker;
pub mod config;
pub mod engine;
pub mod orchestrator;
pub mod prompt;
pub mod research;
pub mod structured;

pub use config::ExtractionConfig;
pub use engine::{ReportKind, SourceReport, process_source};
pub use orchestrator::{
    ExtractionRequest, ExtractionResult, Extractor, Progress, ProgressTx, SourceKind, UploadedFile,
};
pub use research::{ResearchReport, research};
pub use structured::{StructuredRow, StructuredTable, synthesize};
