// src/models/mod.rs

//! Domain models for the account monitor.
//!
//! Data structures shared by the scanning pipeline, the storage layer,
//! and the notification sinks.

mod account;
mod config;
mod post;

// Re-export all public types
pub use account::{AccountProfile, MonitoredAccount};
pub use config::{
    Config, NotifierConfig, NotifierKind, ScannerConfig, SourceConfig, SourceKind, StorageConfig,
    StorageKind,
};
pub use post::{CandidatePost, PostRecord};
