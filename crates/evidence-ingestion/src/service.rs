//! Ingestion Service
//!
//! Drives a parsed filing through the Evidence Store contract: fingerprint
//! dedup check, document insert, chunk bulk-insert, chunk count and status
//! updates. The transformation itself stays synchronous; only the store
//! boundary is async.

use tracing::{info, warn};

use evidence_core::{
    ChunkId, ChunkRow, DocumentId, DocumentRow, DocumentStatus, EvidenceStore, FilingMetadata,
};

use crate::pipeline::{FilingPipeline, ParsedDocument};
use crate::Result;

/// Outcome of ingesting one filing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestOutcome {
    /// The filing was new and is now persisted.
    Ingested {
        document_id: DocumentId,
        chunk_count: usize,
    },
    /// A document with the same content hash already exists; nothing was
    /// written. The check-then-insert pair is not atomic, so a concurrent
    /// ingestion of identical content can still slip through.
    Duplicate { content_hash: String },
}

/// Ingestion service over an Evidence Store backend.
pub struct IngestionService<S> {
    pipeline: FilingPipeline,
    store: S,
}

impl<S: EvidenceStore> IngestionService<S> {
    pub fn new(pipeline: FilingPipeline, store: S) -> Self {
        Self { pipeline, store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Ingest one filing supplied by the crawler collaborator.
    ///
    /// Identity is the content hash alone: the same bytes re-fetched under
    /// different filing metadata are reported as a duplicate.
    pub async fn ingest(
        &self,
        content: &[u8],
        file_hint: &str,
        filing: &FilingMetadata,
    ) -> Result<IngestOutcome> {
        let parsed = self.pipeline.parse_filing_bytes(content, file_hint);

        if self.store.exists_by_content_hash(&parsed.content_hash).await? {
            info!(
                ticker = %filing.ticker,
                content_hash = %parsed.content_hash,
                "Filing already ingested"
            );
            return Ok(IngestOutcome::Duplicate {
                content_hash: parsed.content_hash,
            });
        }

        let document_id = DocumentId::new();
        let row = DocumentRow::new(
            document_id,
            filing,
            parsed.content_hash.clone(),
            parsed.word_count,
        )
        .with_status(DocumentStatus::Parsed);
        self.store.insert_document(row).await?;

        let chunk_count = match self.persist_chunks(document_id, &parsed).await {
            Ok(count) => count,
            Err(err) => {
                // Best-effort failure bookkeeping; the original error wins.
                if let Err(status_err) = self
                    .store
                    .update_status(&document_id, DocumentStatus::Failed, Some(err.to_string()))
                    .await
                {
                    warn!(
                        document_id = %document_id,
                        error = %status_err,
                        "Could not record ingestion failure"
                    );
                }
                return Err(err);
            }
        };

        info!(
            ticker = %filing.ticker,
            filing_type = %filing.filing_type,
            document_id = %document_id,
            chunk_count = chunk_count,
            word_count = parsed.word_count,
            "Filing ingested"
        );

        Ok(IngestOutcome::Ingested {
            document_id,
            chunk_count,
        })
    }

    async fn persist_chunks(
        &self,
        document_id: DocumentId,
        parsed: &ParsedDocument,
    ) -> Result<usize> {
        let rows: Vec<ChunkRow> = self
            .pipeline
            .chunk_document(parsed)
            .into_iter()
            .map(|chunk| ChunkRow {
                id: ChunkId::new(),
                document_id,
                chunk_index: chunk.chunk_index,
                content: chunk.content,
                section: chunk.section.map(|s| s.as_str().to_string()),
                start_char: chunk.start_char,
                end_char: chunk.end_char,
                word_count: chunk.word_count,
            })
            .collect();

        let chunk_count = rows.len();
        self.store.insert_chunks(rows).await?;
        self.store
            .update_chunk_count(&document_id, chunk_count)
            .await?;
        self.store
            .update_status(&document_id, DocumentStatus::Chunked, None)
            .await?;

        Ok(chunk_count)
    }
}
