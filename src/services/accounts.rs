// src/services/accounts.rs

//! Account registration and administration.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::error::{AppError, Result};
use crate::models::{MonitoredAccount, PostRecord};
use crate::services::PostSource;
use crate::storage::ScannerStore;

/// Snapshot of scanner activity for status reporting.
#[derive(Debug, Clone)]
pub struct ScannerStatus {
    pub active_accounts: usize,
    pub total_accounts: usize,
    pub last_check_time: Option<DateTime<Utc>>,
    pub scan_interval_secs: u64,
}

/// Service for managing the set of monitored accounts.
pub struct AccountService {
    store: Arc<dyn ScannerStore>,
    source: Arc<dyn PostSource>,
}

impl AccountService {
    pub fn new(store: Arc<dyn ScannerStore>, source: Arc<dyn PostSource>) -> Self {
        Self { store, source }
    }

    /// Strip whitespace and any leading `@` from operator input.
    pub fn normalize_handle(raw: &str) -> String {
        raw.trim().trim_start_matches('@').to_string()
    }

    /// Register a handle for monitoring.
    ///
    /// The handle must not already be registered, and its profile must be
    /// reachable at the source.
    pub async fn register(&self, raw_handle: &str) -> Result<MonitoredAccount> {
        let handle = Self::normalize_handle(raw_handle);
        if handle.is_empty() {
            return Err(AppError::validation("handle is empty"));
        }
        if !handle
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(AppError::validation(
                "handle may only contain letters, digits, and underscore",
            ));
        }

        if let Some(existing) = self.store.account_by_handle(&handle).await? {
            return Err(AppError::duplicate("handle", existing.handle));
        }

        let profile = self
            .source
            .fetch_profile(&handle)
            .await?
            .ok_or_else(|| AppError::AccountNotFound(handle.clone()))?;

        let account = self.store.add_account(profile).await?;
        log::info!("Registered @{} (id {})", account.handle, account.id);
        Ok(account)
    }

    /// Remove an account. Its stored posts are kept so deduplication
    /// keeps seeing them.
    pub async fn remove(&self, raw_handle: &str) -> Result<MonitoredAccount> {
        let account = self.require_account(raw_handle).await?;
        match self.store.remove_account(account.id).await? {
            Some(removed) => {
                log::info!("Removed @{}", removed.handle);
                Ok(removed)
            }
            None => Err(AppError::AccountNotFound(account.handle)),
        }
    }

    /// Flip an account's active flag, returning the updated record.
    pub async fn toggle(&self, raw_handle: &str) -> Result<MonitoredAccount> {
        let account = self.require_account(raw_handle).await?;
        match self
            .store
            .set_active(account.id, !account.is_active)
            .await?
        {
            Some(updated) => {
                log::info!(
                    "@{} is now {}",
                    updated.handle,
                    if updated.is_active { "active" } else { "inactive" }
                );
                Ok(updated)
            }
            None => Err(AppError::AccountNotFound(account.handle)),
        }
    }

    /// Every registered account.
    pub async fn list(&self) -> Result<Vec<MonitoredAccount>> {
        self.store.all_accounts().await
    }

    /// Look up an account from operator input.
    pub async fn find(&self, raw_handle: &str) -> Result<Option<MonitoredAccount>> {
        let handle = Self::normalize_handle(raw_handle);
        self.store.account_by_handle(&handle).await
    }

    /// Look up an account, failing when it is not registered.
    pub async fn require_account(&self, raw_handle: &str) -> Result<MonitoredAccount> {
        let handle = Self::normalize_handle(raw_handle);
        self.store
            .account_by_handle(&handle)
            .await?
            .ok_or(AppError::AccountNotFound(handle))
    }

    /// Stored posts for an account, newest first.
    pub async fn recent_posts(&self, raw_handle: &str, limit: usize) -> Result<Vec<PostRecord>> {
        let account = self.require_account(raw_handle).await?;
        self.store.posts_for_account(account.id, limit).await
    }

    /// Summarize scanner activity across all accounts.
    pub async fn status(&self, interval: Duration) -> Result<ScannerStatus> {
        let accounts = self.store.all_accounts().await?;
        let active: Vec<_> = accounts.iter().filter(|a| a.is_active).collect();

        Ok(ScannerStatus {
            active_accounts: active.len(),
            total_accounts: accounts.len(),
            last_check_time: active.iter().map(|a| a.last_checked).max(),
            scan_interval_secs: interval.as_secs(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use crate::models::{AccountProfile, CandidatePost};
    use crate::storage::MemoryStore;

    /// Source that knows a fixed set of handles and has no posts.
    struct StubSource {
        known: Vec<&'static str>,
    }

    #[async_trait]
    impl PostSource for StubSource {
        async fn fetch_profile(&self, handle: &str) -> Result<Option<AccountProfile>> {
            if self.known.iter().any(|h| *h == handle) {
                Ok(Some(AccountProfile {
                    handle: handle.to_string(),
                    display_name: format!("User {handle}"),
                    profile_image_url: None,
                }))
            } else {
                Ok(None)
            }
        }

        async fn fetch_recent(
            &self,
            _handle: &str,
            _limit: usize,
        ) -> Result<Vec<CandidatePost>> {
            Ok(Vec::new())
        }
    }

    fn service(known: Vec<&'static str>) -> AccountService {
        AccountService::new(
            Arc::new(MemoryStore::new()),
            Arc::new(StubSource { known }),
        )
    }

    #[test]
    fn test_normalize_handle() {
        assert_eq!(AccountService::normalize_handle(" @alice "), "alice");
        assert_eq!(AccountService::normalize_handle("@@bob"), "bob");
        assert_eq!(AccountService::normalize_handle("carol"), "carol");
    }

    #[tokio::test]
    async fn test_register_normalizes_and_stores() {
        let service = service(vec!["alice"]);
        let account = service.register(" @alice ").await.unwrap();

        assert_eq!(account.handle, "alice");
        assert_eq!(account.display_name, "User alice");
        assert!(account.is_active);
    }

    #[tokio::test]
    async fn test_register_unknown_profile() {
        let service = service(vec![]);
        let err = service.register("ghost").await.unwrap_err();
        assert!(matches!(err, AppError::AccountNotFound(_)));
    }

    #[tokio::test]
    async fn test_register_duplicate() {
        let service = service(vec!["alice"]);
        service.register("alice").await.unwrap();
        let err = service.register("@alice").await.unwrap_err();
        assert!(err.is_duplicate());
    }

    #[tokio::test]
    async fn test_register_rejects_invalid_handle() {
        let service = service(vec![]);
        assert!(service.register("  ").await.is_err());
        assert!(service.register("has space").await.is_err());
    }

    #[tokio::test]
    async fn test_toggle_flips_active() {
        let service = service(vec!["alice"]);
        service.register("alice").await.unwrap();

        let updated = service.toggle("alice").await.unwrap();
        assert!(!updated.is_active);
        let updated = service.toggle("alice").await.unwrap();
        assert!(updated.is_active);
    }

    #[tokio::test]
    async fn test_remove_then_find() {
        let service = service(vec!["alice"]);
        service.register("alice").await.unwrap();
        service.remove("alice").await.unwrap();

        assert!(service.find("alice").await.unwrap().is_none());
        let err = service.remove("alice").await.unwrap_err();
        assert!(matches!(err, AppError::AccountNotFound(_)));
    }

    #[tokio::test]
    async fn test_status_counts() {
        let service = service(vec!["alice", "bob"]);
        service.register("alice").await.unwrap();
        service.register("bob").await.unwrap();
        service.toggle("bob").await.unwrap();

        let status = service.status(Duration::from_secs(300)).await.unwrap();
        assert_eq!(status.active_accounts, 1);
        assert_eq!(status.total_accounts, 2);
        assert_eq!(status.scan_interval_secs, 300);
        assert!(status.last_check_time.is_some());
    }
}
