//! Scan cycle scheduling.
//!
//! Accounts are scanned strictly one at a time with a politeness pause
//! between them. One slow or broken account delays the others but never
//! stops them; per-post store uniqueness is what keeps overlapping
//! cycles from double-announcing.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;

use crate::error::Result;
use crate::pipeline::AccountScanner;
use crate::storage::ScannerStore;

/// Summary of one scan cycle across all active accounts.
#[derive(Debug, Default, Clone)]
pub struct CycleOutcome {
    pub scanned: usize,
    pub failed: usize,
    pub new_posts: usize,
    pub errors: Vec<String>,
}

/// Runs scan cycles over the active accounts.
pub struct Scheduler {
    store: Arc<dyn ScannerStore>,
    scanner: AccountScanner,
    interval: Duration,
    account_delay: Duration,
}

impl Scheduler {
    pub fn new(
        store: Arc<dyn ScannerStore>,
        scanner: AccountScanner,
        interval: Duration,
        account_delay: Duration,
    ) -> Self {
        Self {
            store,
            scanner,
            interval,
            account_delay,
        }
    }

    /// Run a single scan cycle, sequentially over the active accounts.
    ///
    /// A failing account is recorded and skipped; the cycle always
    /// reaches the remaining accounts. Fails only when the account list
    /// itself cannot be read.
    pub async fn run_once(&self) -> Result<CycleOutcome> {
        let accounts = self.store.active_accounts().await?;
        log::info!("Scan cycle starting for {} account(s)", accounts.len());

        let mut outcome = CycleOutcome::default();
        for (i, account) in accounts.iter().enumerate() {
            if i > 0 && !self.account_delay.is_zero() {
                tokio::time::sleep(self.account_delay).await;
            }

            match self.scanner.scan(account).await {
                Ok(scan) => {
                    outcome.scanned += 1;
                    outcome.new_posts += scan.new_posts;
                }
                Err(e) => {
                    outcome.failed += 1;
                    log::error!("Scan failed for @{}: {e}", account.handle);
                    outcome.errors.push(format!("@{}: {e}", account.handle));
                }
            }
        }

        log::info!(
            "Scan cycle finished: {} scanned, {} failed, {} new post(s)",
            outcome.scanned,
            outcome.failed,
            outcome.new_posts
        );
        Ok(outcome)
    }

    /// Run scan cycles on a timer until Ctrl+C.
    ///
    /// The first cycle starts immediately. A cycle that overruns the
    /// interval delays the next tick instead of bursting to catch up.
    pub async fn watch(&self) -> Result<()> {
        // tokio's interval panics on a zero period.
        let period = self.interval.max(Duration::from_secs(1));
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let shutdown = tokio::signal::ctrl_c();
        tokio::pin!(shutdown);

        log::info!("Scanning every {:?}; press Ctrl+C to stop", period);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = self.run_once().await {
                        log::error!("Scan cycle failed: {e}");
                    }
                }
                result = &mut shutdown => {
                    result?;
                    log::info!("Shutting down");
                    return Ok(());
                }
            }
        }
    }
}
