//! Workflow orchestrator: fetch, compare, notify, persist.

use crate::error::Result;
use crate::fetch::StatusFetcher;
use crate::notify::Notifier;
use crate::store::StatusStore;

/// Terminal outcome of one watch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    SentUpdate,
    NoUpdate,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::SentUpdate => "SENT_UPDATE",
            Outcome::NoUpdate => "NO_UPDATE",
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Run the status-watch workflow once.
///
/// The store write happens strictly after a successful notification send:
/// a rejected send must leave the stored status stale so the next run
/// re-detects the same change instead of silently marking it seen.
pub async fn run_once(
    fetcher: &StatusFetcher,
    store: &StatusStore,
    notifier: &dyn Notifier,
    receipt_number: &str,
    recipient: &str,
) -> Result<Outcome> {
    let current_status = fetcher.fetch_current_status(receipt_number).await?;
    let last_known_status = store.get_last_known_status(receipt_number)?;

    if current_status == last_known_status {
        tracing::info!(outcome = %Outcome::NoUpdate, %current_status, "case status unchanged");
        return Ok(Outcome::NoUpdate);
    }

    let message_sid = notifier.notify(recipient, &current_status).await?;
    store.set_last_known_status(receipt_number, &current_status)?;

    tracing::info!(
        outcome = %Outcome::SentUpdate,
        %message_sid,
        previous = %last_known_status,
        current = %current_status,
        "case status changed, notification sent"
    );
    Ok(Outcome::SentUpdate)
}
