//! Local filesystem storage implementation.
//!
//! Keeps the full state in memory and writes a JSON snapshot of the
//! affected table after every mutation. Writes go to a temp file first
//! and are renamed into place, so a crash never leaves a half-written
//! table behind.
//!
//! ## Storage Layout
//!
//! ```text
//! {root}/
//! ├── accounts.json    # Registered accounts and scan checkpoints
//! └── posts.json       # Seen posts, keyed for deduplication
//! ```

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;

use crate::error::{AppError, Result};
use crate::models::{AccountProfile, MonitoredAccount, PostRecord};
use crate::storage::{ScannerStore, StoreState};

const ACCOUNTS_KEY: &str = "accounts.json";
const POSTS_KEY: &str = "posts.json";

/// On-disk wrapper for the account table.
#[derive(Debug, Serialize, Deserialize)]
struct AccountsFile {
    updated_at: DateTime<Utc>,
    last_id: u64,
    accounts: Vec<MonitoredAccount>,
}

/// On-disk wrapper for the post table.
#[derive(Debug, Serialize, Deserialize)]
struct PostsFile {
    updated_at: DateTime<Utc>,
    last_id: u64,
    posts: Vec<PostRecord>,
}

/// Local filesystem storage backend.
pub struct LocalStore {
    root_dir: PathBuf,
    state: RwLock<StoreState>,
}

impl LocalStore {
    /// Open a store rooted at the given directory, loading any existing
    /// state. The directory is created lazily on first write.
    pub async fn open(root_dir: impl Into<PathBuf>) -> Result<Self> {
        let store = Self {
            root_dir: root_dir.into(),
            state: RwLock::new(StoreState::default()),
        };
        store.hydrate().await?;
        Ok(store)
    }

    /// Load persisted tables into memory.
    async fn hydrate(&self) -> Result<()> {
        let accounts = self
            .read_json::<AccountsFile>(ACCOUNTS_KEY)
            .await
            .map_err(|e| AppError::store(format!("failed to load {ACCOUNTS_KEY}: {e}")))?;
        let posts = self
            .read_json::<PostsFile>(POSTS_KEY)
            .await
            .map_err(|e| AppError::store(format!("failed to load {POSTS_KEY}: {e}")))?;

        let mut state = self.state.write().await;
        if let Some(file) = accounts {
            state.last_account_id = file.last_id;
            state.accounts = file.accounts;
        }
        if let Some(file) = posts {
            state.last_post_id = file.last_id;
            state.posts = file.posts;
        }
        log::debug!(
            "Store hydrated with {} accounts and {} posts from {:?}",
            state.accounts.len(),
            state.posts.len(),
            self.root_dir
        );
        Ok(())
    }

    /// Get the full path for a relative key.
    fn path(&self, key: &str) -> PathBuf {
        self.root_dir.join(key)
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(&self, path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path(key);
        self.ensure_dir(&path).await?;

        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    /// Write JSON data.
    async fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(value)?;
        self.write_bytes(key, &bytes).await
    }

    /// Read bytes, returning None if the file doesn't exist.
    async fn read_bytes(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path(key);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    /// Read JSON data.
    async fn read_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.read_bytes(key).await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Snapshot the account table to disk. Callers hold the write lock,
    /// which keeps snapshots from interleaving.
    async fn persist_accounts(&self, state: &StoreState) -> Result<()> {
        let file = AccountsFile {
            updated_at: Utc::now(),
            last_id: state.last_account_id,
            accounts: state.accounts.clone(),
        };
        self.write_json(ACCOUNTS_KEY, &file).await
    }

    /// Snapshot the post table to disk.
    async fn persist_posts(&self, state: &StoreState) -> Result<()> {
        let file = PostsFile {
            updated_at: Utc::now(),
            last_id: state.last_post_id,
            posts: state.posts.clone(),
        };
        self.write_json(POSTS_KEY, &file).await
    }
}

#[async_trait]
impl ScannerStore for LocalStore {
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
        let mut state = self.state.write().await;
        let account = state.add_account(profile)?;
        self.persist_accounts(&state).await?;
        Ok(account)
    }

    async fn remove_account(&self, id: u64) -> Result<Option<MonitoredAccount>> {
        let mut state = self.state.write().await;
        match state.remove_account(id) {
            Some(account) => {
                self.persist_accounts(&state).await?;
                Ok(Some(account))
            }
            None => Ok(None),
        }
    }

    async fn set_active(&self, id: u64, active: bool) -> Result<Option<MonitoredAccount>> {
        let mut state = self.state.write().await;
        match state.set_active(id, active) {
            Some(account) => {
                self.persist_accounts(&state).await?;
                Ok(Some(account))
            }
            None => Ok(None),
        }
    }

    async fn post_exists_by_id(&self, post_id: &str) -> Result<bool> {
        Ok(self.state.read().await.post_exists_by_id(post_id))
    }

    async fn post_exists_by_hash(&self, content_hash: &str) -> Result<bool> {
        Ok(self.state.read().await.post_exists_by_hash(content_hash))
    }

    async fn insert_post(&self, record: PostRecord) -> Result<PostRecord> {
        let mut state = self.state.write().await;
        let stored = state.insert_post(record)?;
        self.persist_posts(&state).await?;
        Ok(stored)
    }

    async fn mark_notified(&self, post_id: &str) -> Result<()> {
        let mut state = self.state.write().await;
        if state.mark_notified(post_id) {
            self.persist_posts(&state).await?;
        } else {
            log::warn!("mark_notified: no post with id {post_id}");
        }
        Ok(())
    }

    async fn update_last_checked(&self, id: u64, at: DateTime<Utc>) -> Result<()> {
        let mut state = self.state.write().await;
        if state.update_last_checked(id, at) {
            self.persist_accounts(&state).await?;
        } else {
            log::warn!("update_last_checked: no account with id {id}");
        }
        Ok(())
    }

    async fn posts_for_account(&self, account_id: u64, limit: usize) -> Result<Vec<PostRecord>> {
        Ok(self.state.read().await.posts_for_account(account_id, limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CandidatePost;
    use tempfile::TempDir;

    fn profile(handle: &str) -> AccountProfile {
        AccountProfile {
            handle: handle.to_string(),
            display_name: handle.to_string(),
            profile_image_url: None,
        }
    }

    fn record(account_id: u64, post_id: &str, text: &str) -> PostRecord {
        PostRecord::from_candidate(
            account_id,
            &CandidatePost {
                id: post_id.to_string(),
                url: format!("https://twitter.com/x/status/{post_id}"),
                text: text.to_string(),
                authored_at: None,
            },
        )
    }

    #[tokio::test]
    async fn test_open_empty_dir_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStore::open(tmp.path()).await.unwrap();

        assert!(store.all_accounts().await.unwrap().is_empty());
        assert!(!tmp.path().join(ACCOUNTS_KEY).exists());
        assert!(!tmp.path().join(POSTS_KEY).exists());
    }

    #[tokio::test]
    async fn test_state_survives_reopen() {
        let tmp = TempDir::new().unwrap();

        let account = {
            let store = LocalStore::open(tmp.path()).await.unwrap();
            let account = store.add_account(profile("alice")).await.unwrap();
            store
                .insert_post(record(account.id, "p1", "hello"))
                .await
                .unwrap();
            account
        };

        let store = LocalStore::open(tmp.path()).await.unwrap();
        let reloaded = store.account_by_handle("alice").await.unwrap().unwrap();
        assert_eq!(reloaded.id, account.id);

        let posts = store.posts_for_account(account.id, 10).await.unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].post_id, "p1");
    }

    #[tokio::test]
    async fn test_ids_not_reused_across_reopen() {
        let tmp = TempDir::new().unwrap();

        {
            let store = LocalStore::open(tmp.path()).await.unwrap();
            let alice = store.add_account(profile("alice")).await.unwrap();
            store.add_account(profile("bob")).await.unwrap();
            store.remove_account(alice.id).await.unwrap();
        }

        let store = LocalStore::open(tmp.path()).await.unwrap();
        let carol = store.add_account(profile("carol")).await.unwrap();
        assert_eq!(carol.id, 3);
    }

    #[tokio::test]
    async fn test_duplicate_hash_caught_after_reopen() {
        let tmp = TempDir::new().unwrap();

        {
            let store = LocalStore::open(tmp.path()).await.unwrap();
            store.insert_post(record(1, "p1", "same text")).await.unwrap();
        }

        let store = LocalStore::open(tmp.path()).await.unwrap();
        let err = store
            .insert_post(record(2, "p2", "same text"))
            .await
            .unwrap_err();
        assert!(err.is_duplicate());
    }

    #[tokio::test]
    async fn test_mark_notified_persisted() {
        let tmp = TempDir::new().unwrap();

        {
            let store = LocalStore::open(tmp.path()).await.unwrap();
            store.insert_post(record(1, "p1", "hello")).await.unwrap();
            store.mark_notified("p1").await.unwrap();
        }

        let store = LocalStore::open(tmp.path()).await.unwrap();
        let posts = store.posts_for_account(1, 10).await.unwrap();
        assert!(posts[0].is_notified);
    }
}
