//! Post data structures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::hash::content_hash;

/// A post as observed at the source, before any store interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidatePost {
    /// Platform-assigned post identifier
    pub id: String,

    /// Canonical permalink
    pub url: String,

    /// Post text content
    pub text: String,

    /// Publication time reported by the platform
    pub authored_at: Option<DateTime<Utc>>,
}

/// A post persisted in the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PostRecord {
    /// Store-assigned identifier, zero until inserted
    pub id: u64,

    /// Identifier of the owning account
    pub account_id: u64,

    /// Platform-assigned post identifier
    pub post_id: String,

    /// Post text content
    pub text: String,

    /// Canonical permalink
    pub url: String,

    /// Publication time reported by the platform
    pub authored_at: Option<DateTime<Utc>>,

    /// Whether a notification attempt has been recorded
    pub is_notified: bool,

    /// SHA-256 digest of the text, hex-encoded
    pub content_hash: String,
}

impl PostRecord {
    /// Build an unsaved record from a fetched candidate.
    ///
    /// The store assigns `id` on insert.
    pub fn from_candidate(account_id: u64, candidate: &CandidatePost) -> Self {
        Self {
            id: 0,
            account_id,
            post_id: candidate.id.clone(),
            text: candidate.text.clone(),
            url: candidate.url.clone(),
            authored_at: candidate.authored_at,
            is_notified: false,
            content_hash: content_hash(&candidate.text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_candidate() -> CandidatePost {
        CandidatePost {
            id: "123456789".to_string(),
            url: "https://twitter.com/alice/status/123456789".to_string(),
            text: "hello".to_string(),
            authored_at: None,
        }
    }

    #[test]
    fn test_from_candidate() {
        let record = PostRecord::from_candidate(7, &sample_candidate());
        assert_eq!(record.id, 0);
        assert_eq!(record.account_id, 7);
        assert_eq!(record.post_id, "123456789");
        assert!(!record.is_notified);
        assert_eq!(record.content_hash, content_hash("hello"));
    }

    #[test]
    fn test_same_text_same_hash() {
        let a = PostRecord::from_candidate(1, &sample_candidate());
        let mut other = sample_candidate();
        other.id = "987654321".to_string();
        other.url = "https://twitter.com/bob/status/987654321".to_string();
        let b = PostRecord::from_candidate(2, &other);
        assert_eq!(a.content_hash, b.content_hash);
    }
}
