//! In-memory Evidence Store
//!
//! Reference implementation of the [`EvidenceStore`] contract backed by a
//! `tokio::sync::RwLock`. Used by tests and local pipeline runs; relational
//! backends live outside this workspace.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::traits::EvidenceStore;
use crate::types::{ChunkRow, DocumentId, DocumentRow, DocumentStatus};

#[derive(Default)]
struct Inner {
    documents: HashMap<DocumentId, DocumentRow>,
    chunks: HashMap<DocumentId, Vec<ChunkRow>>,
}

/// In-memory store keyed by document id.
#[derive(Default)]
pub struct MemoryEvidenceStore {
    inner: RwLock<Inner>,
}

impl MemoryEvidenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of persisted documents.
    pub async fn document_count(&self) -> usize {
        self.inner.read().await.documents.len()
    }

    /// Fetch a document record, if present.
    pub async fn document(&self, document_id: &DocumentId) -> Option<DocumentRow> {
        self.inner.read().await.documents.get(document_id).cloned()
    }
}

#[async_trait]
impl EvidenceStore for MemoryEvidenceStore {
    async fn exists_by_content_hash(&self, content_hash: &str) -> Result<bool, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .documents
            .values()
            .any(|doc| doc.content_hash == content_hash))
    }

    async fn insert_document(&self, document: DocumentRow) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        if inner.documents.contains_key(&document.id) {
            return Err(StoreError::Constraint(format!(
                "document {} already exists",
                document.id
            )));
        }
        inner.documents.insert(document.id, document);
        Ok(())
    }

    async fn insert_chunks(&self, chunks: Vec<ChunkRow>) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        for chunk in chunks {
            inner.chunks.entry(chunk.document_id).or_default().push(chunk);
        }
        Ok(())
    }

    async fn update_chunk_count(
        &self,
        document_id: &DocumentId,
        chunk_count: usize,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let doc = inner
            .documents
            .get_mut(document_id)
            .ok_or_else(|| StoreError::NotFound(document_id.to_string()))?;
        doc.chunk_count = chunk_count;
        Ok(())
    }

    async fn update_status(
        &self,
        document_id: &DocumentId,
        status: DocumentStatus,
        error_message: Option<String>,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let doc = inner
            .documents
            .get_mut(document_id)
            .ok_or_else(|| StoreError::NotFound(document_id.to_string()))?;
        doc.status = status;
        if error_message.is_some() {
            doc.error_message = error_message;
        }
        Ok(())
    }

    async fn list_chunks(
        &self,
        document_id: &DocumentId,
        limit: usize,
    ) -> Result<Vec<ChunkRow>, StoreError> {
        let inner = self.inner.read().await;
        let mut chunks = inner
            .chunks
            .get(document_id)
            .cloned()
            .unwrap_or_default();
        chunks.sort_by_key(|c| c.chunk_index);
        chunks.truncate(limit);
        Ok(chunks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ChunkId, FilingMetadata};
    use chrono::NaiveDate;

    fn sample_document() -> DocumentRow {
        let filing = FilingMetadata::new(
            "cik-0000315189",
            "DE",
            "10-K",
            NaiveDate::from_ymd_opt(2023, 12, 15).unwrap(),
        );
        DocumentRow::new(DocumentId::new(), &filing, "deadbeef", 42)
            .with_status(DocumentStatus::Parsed)
    }

    fn sample_chunk(document_id: DocumentId, index: usize) -> ChunkRow {
        ChunkRow {
            id: ChunkId::new(),
            document_id,
            chunk_index: index,
            content: format!("chunk {index}"),
            section: Some("Item 1".to_string()),
            start_char: index * 100,
            end_char: index * 100 + 100,
            word_count: 2,
        }
    }

    #[tokio::test]
    async fn test_exists_by_content_hash() {
        let store = MemoryEvidenceStore::new();
        let doc = sample_document();

        assert!(!store.exists_by_content_hash("deadbeef").await.unwrap());
        store.insert_document(doc).await.unwrap();
        assert!(store.exists_by_content_hash("deadbeef").await.unwrap());
        assert!(!store.exists_by_content_hash("cafebabe").await.unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_document_id_rejected() {
        let store = MemoryEvidenceStore::new();
        let doc = sample_document();

        store.insert_document(doc.clone()).await.unwrap();
        assert!(store.insert_document(doc).await.is_err());
    }

    #[tokio::test]
    async fn test_chunk_roundtrip_ordered() {
        let store = MemoryEvidenceStore::new();
        let doc = sample_document();
        let doc_id = doc.id;
        store.insert_document(doc).await.unwrap();

        // Insert out of order; list_chunks must come back sorted.
        store
            .insert_chunks(vec![sample_chunk(doc_id, 2), sample_chunk(doc_id, 0)])
            .await
            .unwrap();
        store
            .insert_chunks(vec![sample_chunk(doc_id, 1)])
            .await
            .unwrap();

        let chunks = store.list_chunks(&doc_id, 10).await.unwrap();
        let indices: Vec<usize> = chunks.iter().map(|c| c.chunk_index).collect();
        assert_eq!(indices, vec![0, 1, 2]);

        let limited = store.list_chunks(&doc_id, 2).await.unwrap();
        assert_eq!(limited.len(), 2);
    }

    #[tokio::test]
    async fn test_status_and_chunk_count_updates() {
        let store = MemoryEvidenceStore::new();
        let doc = sample_document();
        let doc_id = doc.id;
        store.insert_document(doc).await.unwrap();

        store.update_chunk_count(&doc_id, 7).await.unwrap();
        store
            .update_status(&doc_id, DocumentStatus::Chunked, None)
            .await
            .unwrap();

        let stored = store.document(&doc_id).await.unwrap();
        assert_eq!(stored.chunk_count, 7);
        assert_eq!(stored.status, DocumentStatus::Chunked);
        assert_eq!(stored.error_message, None);

        store
            .update_status(
                &doc_id,
                DocumentStatus::Failed,
                Some("index unavailable".to_string()),
            )
            .await
            .unwrap();
        let stored = store.document(&doc_id).await.unwrap();
        assert_eq!(stored.status, DocumentStatus::Failed);
        assert_eq!(stored.error_message.as_deref(), Some("index unavailable"));
    }

    #[tokio::test]
    async fn test_updates_on_missing_document() {
        let store = MemoryEvidenceStore::new();
        let missing = DocumentId::new();

        assert!(store.update_chunk_count(&missing, 1).await.is_err());
        assert!(store
            .update_status(&missing, DocumentStatus::Indexed, None)
            .await
            .is_err());
    }
}
