// src/notify/telegram.rs

//! Telegram Bot API sink.
//!
//! Delivers notifications with `sendMessage` and verifies connectivity
//! with `getMe`. An unconfigured sink stays usable: every send logs a
//! warning and reports failure instead of erroring.

use async_trait::async_trait;
use reqwest::Client;

use crate::error::{AppError, Result};
use crate::models::NotifierConfig;
use crate::notify::NotificationSink;

const API_BASE: &str = "https://api.telegram.org";

/// Notification sink backed by the Telegram Bot API.
pub struct TelegramSink {
    credentials: Option<(String, String)>,
    client: Client,
}

impl TelegramSink {
    /// Create a sink from configuration. Credentials may also come from
    /// `TELEGRAM_BOT_TOKEN` and `TELEGRAM_CHAT_ID`.
    pub fn new(config: &NotifierConfig) -> Result<Self> {
        let credentials = config.credentials();
        if credentials.is_none() {
            log::warn!("Telegram credentials missing; notifications will be skipped");
        }

        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            credentials,
            client,
        })
    }

    fn endpoint(token: &str, method: &str) -> String {
        format!("{API_BASE}/bot{token}/{method}")
    }
}

#[async_trait]
impl NotificationSink for TelegramSink {
    async fn send(&self, message: &str) -> bool {
        let Some((token, chat_id)) = &self.credentials else {
            log::warn!("Telegram not configured, skipping notification");
            return false;
        };

        let result = self
            .client
            .post(Self::endpoint(token, "sendMessage"))
            .form(&[("chat_id", chat_id.as_str()), ("text", message)])
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => true,
            Ok(response) => {
                log::error!(
                    "Telegram rejected the notification: HTTP {}",
                    response.status()
                );
                false
            }
            Err(e) => {
                log::error!("Telegram request failed: {e}");
                false
            }
        }
    }

    async fn check(&self) -> Result<()> {
        let Some((token, _)) = &self.credentials else {
            return Err(AppError::config("Telegram credentials are not configured"));
        };

        self.client
            .get(Self::endpoint(token, "getMe"))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_format() {
        assert_eq!(
            TelegramSink::endpoint("123:abc", "sendMessage"),
            "https://api.telegram.org/bot123:abc/sendMessage"
        );
        assert_eq!(
            TelegramSink::endpoint("123:abc", "getMe"),
            "https://api.telegram.org/bot123:abc/getMe"
        );
    }

    #[test]
    fn test_new_without_credentials() {
        let config = NotifierConfig::default();
        assert!(TelegramSink::new(&config).is_ok());
    }
}
