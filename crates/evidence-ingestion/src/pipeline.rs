//! Filing Transformation Pipeline
//!
//! Composes extraction, section detection, chunking, and fingerprinting into
//! the two entry operations of the core: parse raw filing bytes into a
//! [`ParsedDocument`], and split a parsed document into one globally ordered
//! chunk sequence.
//!
//! The transform is a pure function of its inputs: no I/O, no shared mutable
//! state, no suspension points. It degrades instead of failing — malformed
//! input produces a document with empty text, empty sections, and zero
//! chunks, never an error.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use evidence_core::IngestionSettings;

use crate::chunking::{ChunkingConfig, TextChunk, TextChunker};
use crate::extractors::ExtractorRegistry;
use crate::fingerprint::fingerprint;
use crate::sections::{SectionConfig, SectionExtractor, SectionMap};
use crate::Result;

/// A filing normalized into text, sections, and a content identity.
///
/// Created once per raw-byte input and never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedDocument {
    /// SHA-256 hex digest of `full_text`; the idempotency key
    pub content_hash: String,
    /// Normalized plain text of the whole filing
    pub full_text: String,
    /// Canonical section extents; absent or filtered sections are empty
    pub sections: SectionMap,
    /// Whitespace-delimited token count of `full_text`
    pub word_count: usize,
}

/// Pipeline configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub chunking: ChunkingConfig,
    pub sections: SectionConfig,
}

impl PipelineConfig {
    /// Build from the environment-driven ingestion settings.
    pub fn from_settings(settings: &IngestionSettings) -> Self {
        Self {
            chunking: ChunkingConfig::default()
                .with_chunk_size(settings.chunk_size_chars)
                .with_overlap(settings.overlap_chars),
            sections: SectionConfig::default()
                .with_min_section_chars(settings.min_section_chars)
                .with_max_section_chars(settings.max_section_chars),
        }
    }
}

/// The filing transformation pipeline.
pub struct FilingPipeline {
    registry: ExtractorRegistry,
    sections: SectionExtractor,
    chunker: TextChunker,
}

impl FilingPipeline {
    /// Construct a pipeline, rejecting invalid configuration eagerly.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        Ok(Self {
            registry: ExtractorRegistry::new(),
            sections: SectionExtractor::new(config.sections)?,
            chunker: TextChunker::new(config.chunking)?,
        })
    }

    /// Parse raw filing bytes into a [`ParsedDocument`].
    ///
    /// `file_hint` is a filename or path; only its suffix is consulted to
    /// pick the extraction path.
    pub fn parse_filing_bytes(&self, content: &[u8], file_hint: &str) -> ParsedDocument {
        let extraction = self.registry.extract(content, file_hint);
        for warning in &extraction.warnings {
            warn!(file_hint = %file_hint, warning = %warning, "Extraction degraded");
        }

        let full_text = extraction.text;
        let content_hash = fingerprint(&full_text);
        let word_count = full_text.split_whitespace().count();
        let sections = self.sections.extract_key_sections(&full_text);

        debug!(
            file_hint = %file_hint,
            content_hash = %content_hash,
            word_count = word_count,
            "Filing parsed"
        );

        ParsedDocument {
            content_hash,
            full_text,
            sections,
            word_count,
        }
    }

    /// Split a parsed document into one globally ordered chunk sequence.
    ///
    /// Sections are chunked in canonical key order and reindexed into a
    /// contiguous 0-based range. When no section survived filtering, the
    /// full text is chunked with no section label, so every document with
    /// non-empty text yields at least one chunk.
    pub fn chunk_document(&self, parsed: &ParsedDocument) -> Vec<TextChunk> {
        let mut chunks: Vec<TextChunk> = Vec::new();

        if parsed.sections.is_empty() {
            chunks = self.chunker.chunk(&parsed.full_text, None);
        } else {
            for (key, text) in parsed.sections.iter() {
                if text.is_empty() {
                    continue;
                }
                for chunk in self.chunker.chunk(text, Some(key)) {
                    let chunk_index = chunks.len();
                    chunks.push(TextChunk {
                        chunk_index,
                        ..chunk
                    });
                }
            }
        }

        debug!(
            content_hash = %parsed.content_hash,
            chunk_count = chunks.len(),
            "Document chunked"
        );

        chunks
    }
}

impl Default for FilingPipeline {
    fn default() -> Self {
        Self::new(PipelineConfig::default()).expect("Default config should be valid")
    }
}
