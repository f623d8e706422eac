//! Text Chunking Module
//!
//! Splits a text block into an ordered sequence of overlapping, bounded
//! chunks for retrieval indexing. Offsets are character positions into the
//! block that was chunked (a section extent, or the full text when section
//! detection found nothing).

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::sections::SectionKey;
use crate::{IngestionError, Result};

/// Configuration for fixed-size overlap chunking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Target chunk size in characters
    pub chunk_size_chars: usize,
    /// Overlap between adjacent chunks in characters
    pub overlap_chars: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size_chars: 4000,
            overlap_chars: 400,
        }
    }
}

impl ChunkingConfig {
    pub fn with_chunk_size(mut self, size: usize) -> Self {
        self.chunk_size_chars = size;
        self
    }

    pub fn with_overlap(mut self, overlap: usize) -> Self {
        self.overlap_chars = overlap;
        self
    }

    /// Reject configurations that cannot make forward progress.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size_chars == 0 {
            return Err(IngestionError::ValidationError(
                "Chunk size must be greater than 0".to_string(),
            ));
        }
        if self.overlap_chars >= self.chunk_size_chars {
            return Err(IngestionError::ValidationError(
                "Chunk overlap must be less than chunk size".to_string(),
            ));
        }
        Ok(())
    }
}

/// A bounded, offset-tagged slice of a text block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextChunk {
    /// Position in the document's global chunk sequence
    pub chunk_index: usize,
    /// Canonical section this chunk came from, if any
    pub section: Option<SectionKey>,
    /// Trimmed chunk text; never empty
    pub content: String,
    /// Character offset of the untrimmed span into the source block
    pub start_char: usize,
    /// Exclusive end character offset of the untrimmed span
    pub end_char: usize,
    /// Whitespace-delimited token count of `content`
    pub word_count: usize,
}

/// Text chunker for splitting section extents and full documents
pub struct TextChunker {
    config: ChunkingConfig,
}

impl TextChunker {
    pub fn new(config: ChunkingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Split `text` into overlapping chunks labeled with `section`.
    ///
    /// The cursor advances by `chunk_size_chars - overlap_chars` per emitted
    /// span, so adjacent non-final chunks overlap by exactly the configured
    /// amount before trimming. Whitespace-only spans are skipped without
    /// consuming an index.
    pub fn chunk(&self, text: &str, section: Option<SectionKey>) -> Vec<TextChunk> {
        let chars: Vec<char> = text.chars().collect();
        let total = chars.len();
        if total == 0 {
            return Vec::new();
        }

        let mut chunks = Vec::new();
        let mut start = 0;

        loop {
            let end = (start + self.config.chunk_size_chars).min(total);
            let slice: String = chars[start..end].iter().collect();
            let content = slice.trim();

            if !content.is_empty() {
                chunks.push(TextChunk {
                    chunk_index: chunks.len(),
                    section,
                    content: content.to_string(),
                    start_char: start,
                    end_char: end,
                    word_count: content.split_whitespace().count(),
                });
            }

            if end >= total {
                break;
            }
            start = end.saturating_sub(self.config.overlap_chars);
        }

        debug!(
            section = section.map(|s| s.as_str()),
            chunk_count = chunks.len(),
            chars = total,
            "Text chunked"
        );

        chunks
    }

    pub fn config(&self) -> &ChunkingConfig {
        &self.config
    }
}
