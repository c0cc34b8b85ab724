//! postwatch CLI
//!
//! Operator entry point for managing monitored accounts and running
//! scans, either one-shot or on a timer.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use clap::{Parser, Subcommand};
use postwatch::{
    error::Result,
    models::Config,
    notify::{NotificationSink, build_sink, test_message},
    pipeline::{AccountScanner, Scheduler},
    services::{AccountService, build_source},
    storage::open_store,
    utils::text::preview,
};

/// postwatch - account post monitor
#[derive(Parser, Debug)]
#[command(
    name = "postwatch",
    version,
    about = "Monitors social media accounts for new posts and dispatches notifications"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "postwatch.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scan all active accounts on a timer until interrupted
    Watch,

    /// Run a single scan cycle over all active accounts
    Scan,

    /// Scan a single account immediately
    Check {
        /// Account handle, with or without the leading @
        handle: String,
    },

    /// Register an account for monitoring
    Add { handle: String },

    /// Remove an account (its stored posts are kept)
    Remove { handle: String },

    /// Toggle an account between active and inactive
    Toggle { handle: String },

    /// List registered accounts
    List,

    /// Show stored posts for an account
    Posts {
        handle: String,

        /// Maximum number of posts to show
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },

    /// Show scanner status
    Status,

    /// Send a test notification through the configured sink
    TestNotify,

    /// Validate the configuration file
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load_or_default(&cli.config);

    let store = open_store(&config.storage).await?;
    let source = build_source(&config.source)?;
    let sink: Arc<dyn NotificationSink> = build_sink(&config.notifier)?;
    let accounts = AccountService::new(Arc::clone(&store), Arc::clone(&source));

    match cli.command {
        Command::Watch => {
            if let Err(e) = sink.check().await {
                log::warn!("Notification sink check failed: {e}");
            }

            let scanner = AccountScanner::new(
                Arc::clone(&store),
                Arc::clone(&source),
                Arc::clone(&sink),
                config.scanner.max_posts,
            );
            let scheduler = Scheduler::new(
                Arc::clone(&store),
                scanner,
                config.scanner.interval(),
                config.scanner.account_delay(),
            );
            scheduler.watch().await?;
        }

        Command::Scan => {
            let scanner = AccountScanner::new(
                Arc::clone(&store),
                Arc::clone(&source),
                Arc::clone(&sink),
                config.scanner.max_posts,
            );
            let scheduler = Scheduler::new(
                Arc::clone(&store),
                scanner,
                config.scanner.interval(),
                config.scanner.account_delay(),
            );
            scheduler.run_once().await?;
        }

        Command::Check { handle } => {
            let account = accounts.require_account(&handle).await?;
            let scanner = AccountScanner::new(
                Arc::clone(&store),
                Arc::clone(&source),
                Arc::clone(&sink),
                config.scanner.max_posts,
            );
            let outcome = scanner.scan(&account).await?;
            log::info!(
                "@{}: {} new, {} duplicate(s), {} send failure(s)",
                account.handle,
                outcome.new_posts,
                outcome.duplicate_ids + outcome.duplicate_hashes,
                outcome.send_failures
            );
        }

        Command::Add { handle } => {
            let account = accounts.register(&handle).await?;
            log::info!("Monitoring @{} ({})", account.handle, account.display_name);
        }

        Command::Remove { handle } => {
            accounts.remove(&handle).await?;
        }

        Command::Toggle { handle } => {
            accounts.toggle(&handle).await?;
        }

        Command::List => {
            let list = accounts.list().await?;
            if list.is_empty() {
                log::info!("No accounts registered yet");
            }
            for account in list {
                log::info!(
                    "@{} [{}] last checked {}",
                    account.handle,
                    if account.is_active { "active" } else { "inactive" },
                    account.last_checked.format("%Y-%m-%d %H:%M:%S")
                );
            }
        }

        Command::Posts { handle, limit } => {
            let posts = accounts.recent_posts(&handle, limit).await?;
            if posts.is_empty() {
                log::info!("No stored posts for @{}", AccountService::normalize_handle(&handle));
            }
            for post in posts {
                log::info!("[{}] {} {}", post.post_id, preview(&post.text, 80), post.url);
            }
        }

        Command::Status => {
            let status = accounts.status(config.scanner.interval()).await?;
            log::info!(
                "Accounts monitored: {} active / {} total",
                status.active_accounts,
                status.total_accounts
            );
            match status.last_check_time {
                Some(at) => log::info!("Last check: {} UTC", at.format("%Y-%m-%d %H:%M:%S")),
                None => log::info!("Last check: never"),
            }
            log::info!("Scan interval: {}s", status.scan_interval_secs);
        }

        Command::TestNotify => {
            sink.check().await?;
            if sink.send(&test_message(Utc::now())).await {
                log::info!("Test notification delivered");
            } else {
                return Err(postwatch::error::AppError::config(
                    "Test notification was not delivered",
                ));
            }
        }

        Command::Validate => {
            let strict = Config::load(&cli.config)?;
            strict.validate()?;
            log::info!("Config OK: {}", cli.config.display());
        }
    }

    Ok(())
}
