// src/services/mock.rs

//! Synthetic post source for local testing.
//!
//! Produces one fresh candidate per fetch without touching the network,
//! so the whole pipeline can be exercised end to end.

use async_trait::async_trait;
use chrono::Utc;

use crate::error::Result;
use crate::models::{AccountProfile, CandidatePost};
use crate::services::PostSource;
use crate::utils::url::status_url;

/// Post source that invents posts instead of fetching them.
pub struct MockSource {
    base_url: String,
}

impl MockSource {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
        }
    }
}

#[async_trait]
impl PostSource for MockSource {
    async fn fetch_profile(&self, handle: &str) -> Result<Option<AccountProfile>> {
        Ok(Some(AccountProfile {
            handle: handle.to_string(),
            display_name: format!("Mock {handle}"),
            profile_image_url: None,
        }))
    }

    async fn fetch_recent(&self, handle: &str, limit: usize) -> Result<Vec<CandidatePost>> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        // Minute resolution keeps rescans within the same minute from
        // producing a stream of hash-distinct posts.
        let now = Utc::now();
        let id = format!("mock_{}", now.timestamp());
        Ok(vec![CandidatePost {
            url: status_url(&self.base_url, handle, &id),
            text: format!("Mock post from @{handle} - {}", now.format("%Y-%m-%d %H:%M")),
            id,
            authored_at: Some(now),
        }])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_profile_always_exists() {
        let source = MockSource::new("https://twitter.com");
        let profile = source.fetch_profile("alice").await.unwrap().unwrap();
        assert_eq!(profile.handle, "alice");
        assert_eq!(profile.display_name, "Mock alice");
    }

    #[tokio::test]
    async fn test_fetch_recent_single_candidate() {
        let source = MockSource::new("https://twitter.com");
        let candidates = source.fetch_recent("alice", 5).await.unwrap();

        assert_eq!(candidates.len(), 1);
        assert!(candidates[0].id.starts_with("mock_"));
        assert!(candidates[0].text.contains("@alice"));
        assert!(candidates[0].url.contains("/alice/status/mock_"));
    }

    #[tokio::test]
    async fn test_fetch_recent_zero_limit() {
        let source = MockSource::new("https://twitter.com");
        assert!(source.fetch_recent("alice", 0).await.unwrap().is_empty());
    }
}
