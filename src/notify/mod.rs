//! Notification delivery.
//!
//! Sinks are best-effort: a failed delivery is logged and reported as
//! `false`, never raised as an error, so one bad send cannot stall a
//! scan cycle.

pub mod null;
pub mod telegram;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::{MonitoredAccount, NotifierConfig, NotifierKind, PostRecord};

// Re-export for convenience
pub use null::NullSink;
pub use telegram::TelegramSink;

/// Trait for notification delivery backends.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Deliver a message to the operator, returning whether delivery
    /// succeeded.
    async fn send(&self, message: &str) -> bool;

    /// Verify the sink is configured and reachable.
    async fn check(&self) -> Result<()>;
}

/// Build the notification sink selected by configuration.
pub fn build_sink(config: &NotifierConfig) -> Result<Arc<dyn NotificationSink>> {
    match config.kind {
        NotifierKind::Telegram => Ok(Arc::new(TelegramSink::new(config)?)),
        NotifierKind::Null => Ok(Arc::new(NullSink)),
    }
}

/// Render the operator-facing notification for a stored post.
pub fn format_message(
    account: &MonitoredAccount,
    post: &PostRecord,
    sent_at: DateTime<Utc>,
) -> String {
    format!(
        "New post from @{}\n\n{}\n\n{}\n\nSent {} UTC",
        account.handle,
        post.text,
        post.url,
        sent_at.format("%Y-%m-%d %H:%M:%S")
    )
}

/// Message used by the connectivity test command.
pub fn test_message(sent_at: DateTime<Utc>) -> String {
    format!(
        "Test notification sent {} UTC",
        sent_at.format("%Y-%m-%d %H:%M:%S")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use crate::models::CandidatePost;

    fn make_account(handle: &str) -> MonitoredAccount {
        let now = Utc::now();
        MonitoredAccount {
            id: 1,
            handle: handle.to_string(),
            display_name: handle.to_string(),
            profile_image_url: None,
            is_active: true,
            created_at: now,
            last_checked: now,
        }
    }

    #[test]
    fn test_format_message() {
        let account = make_account("alice");
        let post = PostRecord::from_candidate(
            account.id,
            &CandidatePost {
                id: "111".to_string(),
                url: "https://twitter.com/alice/status/111".to_string(),
                text: "hello".to_string(),
                authored_at: None,
            },
        );
        let sent_at = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();

        assert_eq!(
            format_message(&account, &post, sent_at),
            "New post from @alice\n\nhello\n\nhttps://twitter.com/alice/status/111\n\nSent 2026-01-02 03:04:05 UTC"
        );
    }

    #[test]
    fn test_test_message() {
        let sent_at = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(
            test_message(sent_at),
            "Test notification sent 2026-01-02 03:04:05 UTC"
        );
    }
}
