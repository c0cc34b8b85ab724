//! Pipeline entry points for scan operations.
//!
//! - `Deduplicator`: decides whether a candidate post is new
//! - `AccountScanner`: fetch, classify, persist, and notify for one account
//! - `Scheduler`: runs scan cycles over all active accounts on a timer

pub mod dedup;
pub mod scan;
pub mod scheduler;

pub use dedup::{Deduplicator, Novelty};
pub use scan::{AccountScanner, ScanOutcome};
pub use scheduler::{CycleOutcome, Scheduler};
