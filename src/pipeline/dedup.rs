//! Two-tier deduplication for candidate posts.
//!
//! A candidate is checked against the store twice: first by platform
//! post id, then by a hash of its text. The hash check spans every
//! account, so the same text reposted elsewhere still counts as seen.

use std::sync::Arc;

use crate::error::Result;
use crate::models::CandidatePost;
use crate::storage::ScannerStore;
use crate::utils::hash::content_hash;

/// Classification of a candidate post against the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Novelty {
    /// Never seen before; safe to persist and announce
    New,
    /// The platform post id is already stored
    DuplicateById,
    /// Identical text is already stored, possibly under another account
    DuplicateByHash,
}

/// Decides whether a candidate post has been seen before.
///
/// Classification only reads from the store; persisting a `New`
/// candidate is the caller's job.
pub struct Deduplicator {
    store: Arc<dyn ScannerStore>,
}

impl Deduplicator {
    pub fn new(store: Arc<dyn ScannerStore>) -> Self {
        Self { store }
    }

    /// Classify a candidate against everything the store has seen.
    ///
    /// The id check runs first; a known id never reaches the hash check,
    /// so `DuplicateById` wins when both would match.
    pub async fn classify(&self, candidate: &CandidatePost) -> Result<Novelty> {
        if self.store.post_exists_by_id(&candidate.id).await? {
            return Ok(Novelty::DuplicateById);
        }
        if self
            .store
            .post_exists_by_hash(&content_hash(&candidate.text))
            .await?
        {
            return Ok(Novelty::DuplicateByHash);
        }
        Ok(Novelty::New)
    }
}
