//! Filing Ingestion Pipeline
//!
//! This crate turns heterogeneous regulatory-filing documents (HTML-like
//! markup or page-based PDFs) into a normalized, section-aware, overlap-chunked
//! text representation suitable for retrieval indexing.
//!
//! # Features
//!
//! - Format-aware text extraction with lossy byte decoding
//! - Heuristic canonical-section detection with tiered regex patterns
//! - Section slicing with boundary capping and noise filtering
//! - Overlapping fixed-size chunking with global reindexing
//! - Content fingerprinting for idempotent ingestion
//! - A service layer driving the Evidence Store contract

pub mod chunking;
pub mod extractors;
pub mod fingerprint;
pub mod pipeline;
pub mod sections;
pub mod service;

// Re-exports
pub use chunking::{ChunkingConfig, TextChunk, TextChunker};
pub use extractors::{ExtractionResult, ExtractorRegistry, MarkupExtractor, PdfExtractor, TextExtractor};
pub use fingerprint::fingerprint;
pub use pipeline::{FilingPipeline, ParsedDocument, PipelineConfig};
pub use sections::{SectionConfig, SectionExtractor, SectionKey, SectionMap};
pub use service::{IngestOutcome, IngestionService};

/// Error types for ingestion operations
#[derive(Debug, thiserror::Error)]
pub enum IngestionError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Store error: {0}")]
    Store(#[from] evidence_core::StoreError),
}

pub type Result<T> = std::result::Result<T, IngestionError>;
