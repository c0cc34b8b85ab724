//! Monitored account data structures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An account registered for monitoring.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MonitoredAccount {
    /// Store-assigned identifier
    pub id: u64,

    /// Platform handle without the leading `@`
    pub handle: String,

    /// Display name from the profile page
    pub display_name: String,

    /// Profile image URL, when the profile exposes one
    pub profile_image_url: Option<String>,

    /// Inactive accounts are skipped by scan cycles
    pub is_active: bool,

    /// When the account was registered
    pub created_at: DateTime<Utc>,

    /// When the account last completed a full scan
    pub last_checked: DateTime<Utc>,
}

/// Profile details fetched from the platform during registration.
#[derive(Debug, Clone)]
pub struct AccountProfile {
    pub handle: String,
    pub display_name: String,
    pub profile_image_url: Option<String>,
}
