// src/utils/hash.rs

//! Content hashing for duplicate suppression.

use sha2::{Digest, Sha256};

/// SHA-256 digest of post text, hex-encoded.
///
/// The digest covers the text content only, so the same content re-issued
/// under a different post id or URL produces the same hash.
pub fn content_hash(text: &str) -> String {
    hex::encode(Sha256::digest(text.as_bytes()))
}
