//! In-memory storage implementation.
//!
//! Holds everything in process memory behind a read/write lock. State is
//! lost on exit, which is exactly what tests and dry runs want.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::error::Result;
use crate::models::{AccountProfile, MonitoredAccount, PostRecord};
use crate::storage::{ScannerStore, StoreState};

/// Volatile storage backend.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<StoreState>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ScannerStore for MemoryStore {
    async fn active_accounts(&self) -> Result<Vec<MonitoredAccount>> {
        Ok(self.state.read().await.active_accounts())
    }

    async fn all_accounts(&self) -> Result<Vec<MonitoredAccount>> {
        Ok(self.state.read().await.accounts.clone())
    }

    async fn account_by_handle(&self, handle: &str) -> Result<Option<MonitoredAccount>> {
        Ok(self.state.read().await.account_by_handle(handle))
    }

    async fn add_account(&self, profile: AccountProfile) -> Result<MonitoredAccount> {
        self.state.write().await.add_account(profile)
    }

    async fn remove_account(&self, id: u64) -> Result<Option<MonitoredAccount>> {
        Ok(self.state.write().await.remove_account(id))
    }

    async fn set_active(&self, id: u64, active: bool) -> Result<Option<MonitoredAccount>> {
        Ok(self.state.write().await.set_active(id, active))
    }

    async fn post_exists_by_id(&self, post_id: &str) -> Result<bool> {
        Ok(self.state.read().await.post_exists_by_id(post_id))
    }

    async fn post_exists_by_hash(&self, content_hash: &str) -> Result<bool> {
        Ok(self.state.read().await.post_exists_by_hash(content_hash))
    }

    async fn insert_post(&self, record: PostRecord) -> Result<PostRecord> {
        self.state.write().await.insert_post(record)
    }

    async fn mark_notified(&self, post_id: &str) -> Result<()> {
        if !self.state.write().await.mark_notified(post_id) {
            log::warn!("mark_notified: no post with id {post_id}");
        }
        Ok(())
    }

    async fn update_last_checked(&self, id: u64, at: DateTime<Utc>) -> Result<()> {
        if !self.state.write().await.update_last_checked(id, at) {
            log::warn!("update_last_checked: no account with id {id}");
        }
        Ok(())
    }

    async fn posts_for_account(&self, account_id: u64, limit: usize) -> Result<Vec<PostRecord>> {
        Ok(self.state.read().await.posts_for_account(account_id, limit))
    }
}
