//! Content Fingerprinting
//!
//! A document's identity for ingestion purposes is a digest of its
//! normalized text, never its filing metadata: the same bytes fetched twice
//! under different tickers or dates must collide here.

use sha2::{Digest, Sha256};

/// SHA-256 hex digest of the UTF-8 bytes of `text`.
///
/// Undecodable input byte sequences were already dropped during extraction,
/// so the digest is a pure function of the normalized text.
pub fn fingerprint(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}
