//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Scan cadence and batching behavior
    #[serde(default)]
    pub scanner: ScannerConfig,

    /// Where candidate posts come from
    #[serde(default)]
    pub source: SourceConfig,

    /// Where notifications go
    #[serde(default)]
    pub notifier: NotifierConfig,

    /// Where accounts and posts are persisted
    #[serde(default)]
    pub storage: StorageConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return defaults if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.scanner.interval_secs == 0 {
            return Err(AppError::validation("scanner.interval_secs must be > 0"));
        }
        if self.scanner.max_posts == 0 {
            return Err(AppError::validation("scanner.max_posts must be > 0"));
        }
        if self.source.timeout_secs == 0 {
            return Err(AppError::validation("source.timeout_secs must be > 0"));
        }
        if self.source.user_agent.trim().is_empty() {
            return Err(AppError::validation("source.user_agent is empty"));
        }
        if url::Url::parse(&self.source.base_url).is_err() {
            return Err(AppError::validation("source.base_url is not a valid URL"));
        }
        if self.notifier.timeout_secs == 0 {
            return Err(AppError::validation("notifier.timeout_secs must be > 0"));
        }
        if self.storage.root_dir.as_os_str().is_empty() {
            return Err(AppError::validation("storage.root_dir is empty"));
        }
        Ok(())
    }
}

/// Scan cadence and batching behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScannerConfig {
    /// Seconds between scan cycles
    #[serde(default = "defaults::interval")]
    pub interval_secs: u64,

    /// Maximum candidate posts fetched per account
    #[serde(default = "defaults::max_posts")]
    pub max_posts: usize,

    /// Pause between accounts within a cycle, in milliseconds
    #[serde(default = "defaults::account_delay")]
    pub account_delay_ms: u64,
}

impl ScannerConfig {
    /// Interval between scan cycles.
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    /// Pause between accounts within a cycle.
    pub fn account_delay(&self) -> Duration {
        Duration::from_millis(self.account_delay_ms)
    }
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            interval_secs: defaults::interval(),
            max_posts: defaults::max_posts(),
            account_delay_ms: defaults::account_delay(),
        }
    }
}

/// Candidate post source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Source backend to use
    #[serde(default)]
    pub kind: SourceKind,

    /// Base URL for profile pages
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Fetch each candidate's permalink page for full text
    #[serde(default)]
    pub fetch_details: bool,

    /// CSS selector for post containers on a profile page
    #[serde(default = "defaults::post_selector")]
    pub post_selector: String,

    /// CSS selector for the text element within a post
    #[serde(default = "defaults::text_selector")]
    pub text_selector: String,

    /// CSS selector for the permalink element within a post
    #[serde(default = "defaults::link_selector")]
    pub link_selector: String,

    /// CSS selector for the timestamp element within a post
    #[serde(default = "defaults::time_selector")]
    pub time_selector: String,
}

impl SourceConfig {
    /// Request timeout for source fetches.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind: SourceKind::default(),
            base_url: defaults::base_url(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            fetch_details: false,
            post_selector: defaults::post_selector(),
            text_selector: defaults::text_selector(),
            link_selector: defaults::link_selector(),
            time_selector: defaults::time_selector(),
        }
    }
}

/// Notification delivery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifierConfig {
    /// Notification backend to use
    #[serde(default)]
    pub kind: NotifierKind,

    /// Telegram bot token; `TELEGRAM_BOT_TOKEN` fills in a blank value
    #[serde(default)]
    pub bot_token: String,

    /// Telegram chat id; `TELEGRAM_CHAT_ID` fills in a blank value
    #[serde(default)]
    pub chat_id: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl NotifierConfig {
    /// Request timeout for notification delivery.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Bot token and chat id, from the config file or the environment.
    pub fn credentials(&self) -> Option<(String, String)> {
        let token = non_empty(self.bot_token.clone())
            .or_else(|| std::env::var("TELEGRAM_BOT_TOKEN").ok().and_then(non_empty))?;
        let chat_id = non_empty(self.chat_id.clone())
            .or_else(|| std::env::var("TELEGRAM_CHAT_ID").ok().and_then(non_empty))?;
        Some((token, chat_id))
    }
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            kind: NotifierKind::default(),
            bot_token: String::new(),
            chat_id: String::new(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// Persistence settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Storage backend to use
    #[serde(default)]
    pub kind: StorageKind,

    /// Directory for JSON data files
    #[serde(default = "defaults::root_dir")]
    pub root_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            kind: StorageKind::default(),
            root_dir: defaults::root_dir(),
        }
    }
}

/// Post source backend selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Scrape profile pages over HTTP
    #[default]
    Scrape,
    /// Generate synthetic posts for local testing
    Mock,
}

/// Notification backend selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NotifierKind {
    /// Deliver via the Telegram Bot API
    #[default]
    Telegram,
    /// Log messages instead of delivering them
    Null,
}

/// Storage backend selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    /// JSON files on local disk
    #[default]
    Local,
    /// In-memory only, lost on exit
    Memory,
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() { None } else { Some(s) }
}

mod defaults {
    use std::path::PathBuf;

    // Scanner defaults
    pub fn interval() -> u64 {
        300
    }
    pub fn max_posts() -> usize {
        5
    }
    pub fn account_delay() -> u64 {
        2000
    }

    // Source defaults
    pub fn base_url() -> String {
        "https://twitter.com".into()
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; postwatch/0.1)".into()
    }
    pub fn timeout() -> u64 {
        10
    }
    pub fn post_selector() -> String {
        r#"article[data-testid="tweet"]"#.into()
    }
    pub fn text_selector() -> String {
        r#"div[data-testid="tweetText"]"#.into()
    }
    pub fn link_selector() -> String {
        r#"a[href*="/status/"]"#.into()
    }
    pub fn time_selector() -> String {
        "time".into()
    }

    // Storage defaults
    pub fn root_dir() -> PathBuf {
        PathBuf::from("data")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_interval() {
        let mut config = Config::default();
        config.scanner.interval_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_user_agent() {
        let mut config = Config::default();
        config.source.user_agent = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_base_url() {
        let mut config = Config::default();
        config.source.base_url = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_partial_toml() {
        let config: Config = toml::from_str(
            r#"
            [scanner]
            interval_secs = 60

            [source]
            kind = "mock"

            [storage]
            kind = "memory"
            "#,
        )
        .unwrap();

        assert_eq!(config.scanner.interval_secs, 60);
        assert_eq!(config.scanner.max_posts, 5);
        assert_eq!(config.source.kind, SourceKind::Mock);
        assert_eq!(config.storage.kind, StorageKind::Memory);
        assert_eq!(config.notifier.kind, NotifierKind::Telegram);
    }

    #[test]
    fn test_credentials_from_config() {
        let mut config = NotifierConfig::default();
        config.bot_token = "123:abc".to_string();
        config.chat_id = "42".to_string();
        assert_eq!(
            config.credentials(),
            Some(("123:abc".to_string(), "42".to_string()))
        );
    }
}
