// src/notify/null.rs

//! Sink that logs instead of delivering.

use async_trait::async_trait;

use crate::error::Result;
use crate::notify::NotificationSink;
use crate::utils::text::preview;

/// Notification sink for dry runs. Every send succeeds.
pub struct NullSink;

#[async_trait]
impl NotificationSink for NullSink {
    async fn send(&self, message: &str) -> bool {
        log::info!("Notification (null sink): {}", preview(message, 120));
        true
    }

    async fn check(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_send_always_succeeds() {
        assert!(NullSink.send("hello").await);
        assert!(NullSink.check().await.is_ok());
    }
}
