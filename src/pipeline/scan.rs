//! Single-account scan.
//!
//! Fetches recent candidates for one account, persists the new ones, and
//! dispatches their notifications. The account's checkpoint advances only
//! when every step completed, so a failed scan is retried in full on the
//! next cycle.

use std::sync::Arc;

use chrono::Utc;

use crate::error::{AppError, Result};
use crate::models::{CandidatePost, MonitoredAccount, PostRecord};
use crate::notify::{NotificationSink, format_message};
use crate::pipeline::{Deduplicator, Novelty};
use crate::services::PostSource;
use crate::storage::ScannerStore;

/// Summary of one account's scan.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScanOutcome {
    pub new_posts: usize,
    pub duplicate_ids: usize,
    pub duplicate_hashes: usize,
    pub send_failures: usize,
}

/// Runs the fetch-classify-persist-notify sequence for one account.
pub struct AccountScanner {
    store: Arc<dyn ScannerStore>,
    source: Arc<dyn PostSource>,
    sink: Arc<dyn NotificationSink>,
    dedup: Deduplicator,
    max_posts: usize,
}

impl AccountScanner {
    pub fn new(
        store: Arc<dyn ScannerStore>,
        source: Arc<dyn PostSource>,
        sink: Arc<dyn NotificationSink>,
        max_posts: usize,
    ) -> Self {
        Self {
            dedup: Deduplicator::new(Arc::clone(&store)),
            store,
            source,
            sink,
            max_posts,
        }
    }

    /// Scan one account.
    ///
    /// Candidates are processed in the order the source presents them.
    /// A failed notification does not fail the scan; a store error does.
    pub async fn scan(&self, account: &MonitoredAccount) -> Result<ScanOutcome> {
        let candidates = self
            .source
            .fetch_recent(&account.handle, self.max_posts)
            .await
            .map_err(|e| AppError::source(&account.handle, e.to_string()))?;

        log::debug!(
            "Fetched {} candidate(s) for @{}",
            candidates.len(),
            account.handle
        );

        let mut outcome = ScanOutcome::default();
        for candidate in &candidates {
            match self.dedup.classify(candidate).await? {
                Novelty::DuplicateById => outcome.duplicate_ids += 1,
                Novelty::DuplicateByHash => outcome.duplicate_hashes += 1,
                Novelty::New => self.announce(account, candidate, &mut outcome).await?,
            }
        }

        self.store
            .update_last_checked(account.id, Utc::now())
            .await?;

        if outcome.new_posts > 0 {
            log::info!("@{}: {} new post(s)", account.handle, outcome.new_posts);
        }
        Ok(outcome)
    }

    /// Persist a new candidate and dispatch its notification.
    async fn announce(
        &self,
        account: &MonitoredAccount,
        candidate: &CandidatePost,
        outcome: &mut ScanOutcome,
    ) -> Result<()> {
        let record = PostRecord::from_candidate(account.id, candidate);
        let stored = match self.store.insert_post(record).await {
            Ok(stored) => stored,
            Err(AppError::DuplicateKey { key, .. }) => {
                // A concurrent scanner persisted it between the dedup
                // check and this insert.
                if key == "content_hash" {
                    outcome.duplicate_hashes += 1;
                } else {
                    outcome.duplicate_ids += 1;
                }
                return Ok(());
            }
            Err(e) => return Err(e),
        };
        outcome.new_posts += 1;

        let message = format_message(account, &stored, Utc::now());
        if !self.sink.send(&message).await {
            outcome.send_failures += 1;
            log::warn!(
                "Notification failed for @{} post {}",
                account.handle,
                stored.post_id
            );
        }

        // Marked regardless of delivery, so a post is never announced twice.
        self.store.mark_notified(&stored.post_id).await?;
        Ok(())
    }
}
