//! Storage for monitored accounts and seen posts.
//!
//! Two backends implement the same contract:
//! - `LocalStore`: JSON files on disk, the operator-facing default
//! - `MemoryStore`: process-local state for tests and dry runs
//!
//! ## Directory Structure (LocalStore)
//!
//! ```text
//! data/
//! ├── accounts.json    # Registered accounts and scan checkpoints
//! └── posts.json       # Seen posts, keyed for deduplication
//! ```

pub mod local;
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::{AppError, Result};
use crate::models::{AccountProfile, MonitoredAccount, PostRecord, StorageConfig, StorageKind};

// Re-export for convenience
pub use local::LocalStore;
pub use memory::MemoryStore;

/// Trait for account and post storage backends.
#[async_trait]
pub trait ScannerStore: Send + Sync {
    /// Accounts eligible for scanning, in registration order.
    async fn active_accounts(&self) -> Result<Vec<MonitoredAccount>>;

    /// Every registered account, active or not.
    async fn all_accounts(&self) -> Result<Vec<MonitoredAccount>>;

    /// Look up an account by its exact handle.
    async fn account_by_handle(&self, handle: &str) -> Result<Option<MonitoredAccount>>;

    /// Register an account from fetched profile details.
    ///
    /// Fails with a duplicate error if the handle is already registered.
    async fn add_account(&self, profile: AccountProfile) -> Result<MonitoredAccount>;

    /// Remove an account, returning the removed record.
    ///
    /// The account's posts are kept so deduplication keeps seeing them.
    async fn remove_account(&self, id: u64) -> Result<Option<MonitoredAccount>>;

    /// Set the active flag, returning the updated record.
    async fn set_active(&self, id: u64, active: bool) -> Result<Option<MonitoredAccount>>;

    /// Whether any stored post carries this platform post id.
    async fn post_exists_by_id(&self, post_id: &str) -> Result<bool>;

    /// Whether any stored post carries this content hash, across all accounts.
    async fn post_exists_by_hash(&self, content_hash: &str) -> Result<bool>;

    /// Persist a post, assigning its store id.
    ///
    /// Fails with a duplicate error if the post id or content hash is
    /// already present. Concurrent scanners rely on this as the final
    /// authority on novelty.
    async fn insert_post(&self, record: PostRecord) -> Result<PostRecord>;

    /// Record that a notification attempt happened for a post.
    async fn mark_notified(&self, post_id: &str) -> Result<()>;

    /// Advance an account's scan checkpoint.
    async fn update_last_checked(&self, id: u64, at: DateTime<Utc>) -> Result<()>;

    /// Stored posts for an account, newest first.
    async fn posts_for_account(&self, account_id: u64, limit: usize) -> Result<Vec<PostRecord>>;
}

/// Build the storage backend selected by configuration.
pub async fn open_store(config: &StorageConfig) -> Result<Arc<dyn ScannerStore>> {
    match config.kind {
        StorageKind::Local => Ok(Arc::new(LocalStore::open(&config.root_dir).await?)),
        StorageKind::Memory => Ok(Arc::new(MemoryStore::new())),
    }
}

/// In-memory tables shared by both backends.
///
/// All mutation goes through these methods so uniqueness rules hold no
/// matter which backend is in front.
#[derive(Debug, Default)]
pub(crate) struct StoreState {
    pub(crate) accounts: Vec<MonitoredAccount>,
    pub(crate) posts: Vec<PostRecord>,
    pub(crate) last_account_id: u64,
    pub(crate) last_post_id: u64,
}

impl StoreState {
    pub(crate) fn active_accounts(&self) -> Vec<MonitoredAccount> {
        self.accounts.iter().filter(|a| a.is_active).cloned().collect()
    }

    pub(crate) fn account_by_handle(&self, handle: &str) -> Option<MonitoredAccount> {
        self.accounts.iter().find(|a| a.handle == handle).cloned()
    }

    pub(crate) fn add_account(&mut self, profile: AccountProfile) -> Result<MonitoredAccount> {
        if self.accounts.iter().any(|a| a.handle == profile.handle) {
            return Err(AppError::duplicate("handle", profile.handle));
        }

        let now = Utc::now();
        self.last_account_id += 1;
        let account = MonitoredAccount {
            id: self.last_account_id,
            handle: profile.handle,
            display_name: profile.display_name,
            profile_image_url: profile.profile_image_url,
            is_active: true,
            created_at: now,
            last_checked: now,
        };
        self.accounts.push(account.clone());
        Ok(account)
    }

    pub(crate) fn remove_account(&mut self, id: u64) -> Option<MonitoredAccount> {
        let idx = self.accounts.iter().position(|a| a.id == id)?;
        Some(self.accounts.remove(idx))
    }

    pub(crate) fn set_active(&mut self, id: u64, active: bool) -> Option<MonitoredAccount> {
        let account = self.accounts.iter_mut().find(|a| a.id == id)?;
        account.is_active = active;
        Some(account.clone())
    }

    pub(crate) fn post_exists_by_id(&self, post_id: &str) -> bool {
        self.posts.iter().any(|p| p.post_id == post_id)
    }

    pub(crate) fn post_exists_by_hash(&self, content_hash: &str) -> bool {
        self.posts.iter().any(|p| p.content_hash == content_hash)
    }

    pub(crate) fn insert_post(&mut self, mut record: PostRecord) -> Result<PostRecord> {
        if self.post_exists_by_id(&record.post_id) {
            return Err(AppError::duplicate("post_id", record.post_id));
        }
        if self.post_exists_by_hash(&record.content_hash) {
            return Err(AppError::duplicate("content_hash", record.content_hash));
        }

        self.last_post_id += 1;
        record.id = self.last_post_id;
        self.posts.push(record.clone());
        Ok(record)
    }

    pub(crate) fn mark_notified(&mut self, post_id: &str) -> bool {
        match self.posts.iter_mut().find(|p| p.post_id == post_id) {
            Some(post) => {
                post.is_notified = true;
                true
            }
            None => false,
        }
    }

    pub(crate) fn update_last_checked(&mut self, id: u64, at: DateTime<Utc>) -> bool {
        match self.accounts.iter_mut().find(|a| a.id == id) {
            Some(account) => {
                account.last_checked = at;
                true
            }
            None => false,
        }
    }

    pub(crate) fn posts_for_account(&self, account_id: u64, limit: usize) -> Vec<PostRecord> {
        let mut posts: Vec<PostRecord> = self
            .posts
            .iter()
            .filter(|p| p.account_id == account_id)
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.id.cmp(&a.id));
        posts.truncate(limit);
        posts
    }
}
