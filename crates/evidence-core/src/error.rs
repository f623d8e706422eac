use thiserror::Error;

/// Errors surfaced by Evidence Store implementations.
///
/// The ingestion core never performs storage I/O itself; these errors cross
/// the collaborator boundary and are wrapped by the caller's error type.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store backend error: {0}")]
    Backend(String),

    #[error("Document not found: {0}")]
    NotFound(String),

    #[error("Constraint violation: {0}")]
    Constraint(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StoreError::NotFound("doc-42".to_string());
        assert!(err.to_string().contains("Document not found"));
    }
}
