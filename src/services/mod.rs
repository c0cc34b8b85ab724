//! Service layer for the account monitor.
//!
//! This module contains the business logic for:
//! - Account registration and admin operations (`AccountService`)
//! - Fetching candidate posts from profile pages (`ScrapingSource`)
//! - Synthetic posts for local testing (`MockSource`)

pub mod accounts;
pub mod mock;
pub mod scrape;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{AccountProfile, CandidatePost, SourceConfig, SourceKind};

// Re-export for convenience
pub use accounts::{AccountService, ScannerStatus};
pub use mock::MockSource;
pub use scrape::ScrapingSource;

/// Trait for candidate post sources.
#[async_trait]
pub trait PostSource: Send + Sync {
    /// Profile details for a handle, or `None` when the profile does not
    /// exist at the source.
    async fn fetch_profile(&self, handle: &str) -> Result<Option<AccountProfile>>;

    /// Up to `limit` recent posts for a handle, in the order the source
    /// presents them.
    async fn fetch_recent(&self, handle: &str, limit: usize) -> Result<Vec<CandidatePost>>;
}

/// Build the post source selected by configuration.
pub fn build_source(config: &SourceConfig) -> Result<Arc<dyn PostSource>> {
    match config.kind {
        SourceKind::Scrape => Ok(Arc::new(ScrapingSource::new(config)?)),
        SourceKind::Mock => Ok(Arc::new(MockSource::new(&config.base_url))),
    }
}
