//! Error taxonomy for a watch run.
//!
//! Every failure aborts the current invocation; there are no internal
//! retries. Re-invocation cadence belongs to the external scheduler.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WatchError {
    /// A required configuration value is missing. Raised before any
    /// network or store side effect.
    #[error("missing required configuration value: {0}")]
    Configuration(&'static str),

    /// The upstream HTTP call failed: network error, timeout, or non-2xx.
    #[error("upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The upstream page contained no parseable status heading. An invalid
    /// receipt number and a page redesign are indistinguishable here.
    #[error("no case status found in the upstream response; the receipt number may be invalid or the page layout may have changed")]
    StatusNotFound,

    /// No stored record for the receipt number. Distinct from an empty
    /// status string; the store must be seeded before the first watch run.
    #[error("no stored record for receipt number {0}; run `casewatch seed` to initialize it")]
    RecordNotFound(String),

    /// The messaging provider rejected the send. The store is left
    /// untouched so the next run re-detects the same change.
    #[error("message provider rejected the send (HTTP {status}): {detail}")]
    Delivery { status: u16, detail: String },

    #[error("case status store error: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("store connection pool error: {0}")]
    StorePool(#[from] r2d2::Error),
}

pub type Result<T> = std::result::Result<T, WatchError>;
