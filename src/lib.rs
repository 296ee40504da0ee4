//! casewatch -- USCIS case status watcher with SMS change notifications.
//!
//! One invocation checks the case-status page for the configured receipt
//! number, compares against the last known status in the local store, and
//! texts the recipient when it changed. Cadence is external (cron, systemd
//! timers); this crate runs exactly one check per call.

pub mod config;
pub mod error;
pub mod fetch;
pub mod html;
pub mod notify;
pub mod store;
pub mod watch;

use anyhow::Result;

use crate::config::WatchConfig;
use crate::fetch::StatusFetcher;
use crate::notify::TwilioNotifier;
use crate::store::StatusStore;
use crate::watch::Outcome;

/// Run the status-watch workflow once with the given configuration.
pub async fn run_watch(config: &WatchConfig) -> Result<Outcome> {
    // 1. Fail fast on incomplete configuration, before any side effect
    config.validate()?;

    // 2. Open the status store
    tracing::info!(db_path = %config.db_path, "Opening status store");
    let store = StatusStore::open(&config.db_path)?;

    // 3. Build the fetcher and notifier
    let fetcher = StatusFetcher::new(&config.status_page_url);
    let notifier = TwilioNotifier::new(&config.twilio);

    // 4. Run the workflow
    let outcome = watch::run_once(
        &fetcher,
        &store,
        &notifier,
        &config.receipt_number,
        &config.recipient_number,
    )
    .await?;

    Ok(outcome)
}
