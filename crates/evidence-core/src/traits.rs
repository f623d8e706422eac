use async_trait::async_trait;

use crate::error::StoreError;
use crate::types::{ChunkRow, DocumentId, DocumentRow, DocumentStatus};

/// Contract for the persistence collaborator that owns durable document and
/// chunk records.
///
/// The ingestion pipeline only produces values in these shapes; all blocking
/// I/O lives behind this trait. The existence check and the subsequent insert
/// are not guaranteed atomic by this contract: two concurrent ingestions of
/// identical content may both pass the check. Backends wanting exactly-once
/// semantics should enforce a uniqueness constraint on `content_hash`.
#[async_trait]
pub trait EvidenceStore: Send + Sync {
    /// Whether a document with this content hash has already been ingested.
    async fn exists_by_content_hash(&self, content_hash: &str) -> Result<bool, StoreError>;

    /// Persist a new document record.
    async fn insert_document(&self, document: DocumentRow) -> Result<(), StoreError>;

    /// Bulk-persist chunk records for a document.
    async fn insert_chunks(&self, chunks: Vec<ChunkRow>) -> Result<(), StoreError>;

    /// Record the final chunk count on a document.
    async fn update_chunk_count(
        &self,
        document_id: &DocumentId,
        chunk_count: usize,
    ) -> Result<(), StoreError>;

    /// Advance a document's lifecycle status. A `Some` error message replaces
    /// the stored one; `None` leaves it untouched.
    async fn update_status(
        &self,
        document_id: &DocumentId,
        status: DocumentStatus,
        error_message: Option<String>,
    ) -> Result<(), StoreError>;

    /// Read back chunks for a document, ordered by chunk index.
    async fn list_chunks(
        &self,
        document_id: &DocumentId,
        limit: usize,
    ) -> Result<Vec<ChunkRow>, StoreError>;
}
