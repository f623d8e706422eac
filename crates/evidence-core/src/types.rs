use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Newtype wrappers for type safety

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentId(Uuid);

impl DocumentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkId(Uuid);

impl ChunkId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ChunkId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ChunkId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Durable lifecycle state of an ingested document.
///
/// Owned by the Evidence Store; the ingestion service only advances it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Pending,
    Downloaded,
    Parsed,
    Chunked,
    Indexed,
    Failed,
}

impl std::fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Downloaded => "downloaded",
            Self::Parsed => "parsed",
            Self::Chunked => "chunked",
            Self::Indexed => "indexed",
            Self::Failed => "failed",
        };
        write!(f, "{s}")
    }
}

/// Metadata describing where a filing came from.
///
/// Supplied by the crawler collaborator alongside the raw bytes. Ingestion
/// carries it opaquely; deduplication is keyed on content, never on this.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilingMetadata {
    pub company_id: String,
    pub ticker: String,
    pub filing_type: String,
    pub filing_date: NaiveDate,
    pub source_url: Option<String>,
    pub local_path: Option<String>,
}

impl FilingMetadata {
    pub fn new(
        company_id: impl Into<String>,
        ticker: impl Into<String>,
        filing_type: impl Into<String>,
        filing_date: NaiveDate,
    ) -> Self {
        Self {
            company_id: company_id.into(),
            ticker: ticker.into(),
            filing_type: filing_type.into(),
            filing_date,
            source_url: None,
            local_path: None,
        }
    }

    pub fn with_source_url(mut self, url: impl Into<String>) -> Self {
        self.source_url = Some(url.into());
        self
    }

    pub fn with_local_path(mut self, path: impl Into<String>) -> Self {
        self.local_path = Some(path.into());
        self
    }
}

/// A document record in the shape the Evidence Store persists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRow {
    pub id: DocumentId,
    pub company_id: String,
    pub ticker: String,
    pub filing_type: String,
    pub filing_date: NaiveDate,
    pub source_url: Option<String>,
    pub local_path: Option<String>,
    pub content_hash: String,
    pub word_count: usize,
    pub chunk_count: usize,
    pub status: DocumentStatus,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl DocumentRow {
    pub fn new(
        id: DocumentId,
        filing: &FilingMetadata,
        content_hash: impl Into<String>,
        word_count: usize,
    ) -> Self {
        Self {
            id,
            company_id: filing.company_id.clone(),
            ticker: filing.ticker.clone(),
            filing_type: filing.filing_type.clone(),
            filing_date: filing.filing_date,
            source_url: filing.source_url.clone(),
            local_path: filing.local_path.clone(),
            content_hash: content_hash.into(),
            word_count,
            chunk_count: 0,
            status: DocumentStatus::Pending,
            error_message: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_status(mut self, status: DocumentStatus) -> Self {
        self.status = status;
        self
    }
}

/// A chunk record in the shape the Evidence Store persists.
///
/// `start_char` and `end_char` are offsets into the text block the chunk was
/// cut from (a section extent, or the full text for fallback chunking).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkRow {
    pub id: ChunkId,
    pub document_id: DocumentId,
    pub chunk_index: usize,
    pub content: String,
    pub section: Option<String>,
    pub start_char: usize,
    pub end_char: usize,
    pub word_count: usize,
}
