//! TOML configuration for casewatch.
//!
//! One file, all operational values required: the watched receipt number,
//! the store path, Twilio credentials, and the recipient number. The
//! upstream URLs carry compiled-in production defaults and are overridable
//! only so tests can point at local doubles.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::WatchError;

/// The USCIS case-status lookup page.
pub const USCIS_CASE_STATUS_PAGE: &str = "https://egov.uscis.gov/casestatus/mycasestatus.do";

/// Twilio REST API base.
pub const TWILIO_API_BASE: &str = "https://api.twilio.com";

/// Root configuration for a watch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Path to the SQLite case-status store.
    #[serde(default = "default_db_path")]
    pub db_path: String,
    /// USCIS receipt number of the single watched case.
    #[serde(default)]
    pub receipt_number: String,
    /// Phone number that receives change notifications (E.164).
    #[serde(default)]
    pub recipient_number: String,
    /// Case-status page URL. Defaults to the production USCIS endpoint.
    #[serde(default = "default_status_page_url")]
    pub status_page_url: String,
    #[serde(default)]
    pub twilio: TwilioConfig,
}

/// Messaging provider credentials and sending number.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TwilioConfig {
    pub account_sid: String,
    pub auth_token: String,
    /// Sending phone number (E.164).
    pub from_number: String,
    /// API base URL. Defaults to the production Twilio endpoint.
    #[serde(default = "default_twilio_api_base")]
    pub api_base: String,
}

fn default_db_path() -> String {
    "data/casewatch.db".to_string()
}

fn default_status_page_url() -> String {
    USCIS_CASE_STATUS_PAGE.to_string()
}

fn default_twilio_api_base() -> String {
    TWILIO_API_BASE.to_string()
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            receipt_number: String::new(),
            recipient_number: String::new(),
            status_page_url: default_status_page_url(),
            twilio: TwilioConfig::default(),
        }
    }
}

impl WatchConfig {
    /// Load configuration from a TOML file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;
        info!(path = %path.display(), "loaded casewatch configuration");
        Ok(config)
    }

    /// Resolve the config path from, in order: an explicit `--config` flag,
    /// the `CASEWATCH_CONFIG` environment variable, `casewatch.toml` in the
    /// working directory.
    pub fn resolve_path(flag: Option<&str>) -> String {
        if let Some(p) = flag {
            return p.to_string();
        }
        if let Ok(p) = std::env::var("CASEWATCH_CONFIG") {
            return p;
        }
        "casewatch.toml".to_string()
    }

    /// Check that every required value is present. Called before any
    /// network or store side effect; reports the first missing field.
    pub fn validate(&self) -> Result<(), WatchError> {
        if self.receipt_number.is_empty() {
            return Err(WatchError::Configuration("receipt_number"));
        }
        if self.recipient_number.is_empty() {
            return Err(WatchError::Configuration("recipient_number"));
        }
        if self.db_path.is_empty() {
            return Err(WatchError::Configuration("db_path"));
        }
        if self.twilio.account_sid.is_empty() {
            return Err(WatchError::Configuration("twilio.account_sid"));
        }
        if self.twilio.auth_token.is_empty() {
            return Err(WatchError::Configuration("twilio.auth_token"));
        }
        if self.twilio.from_number.is_empty() {
            return Err(WatchError::Configuration("twilio.from_number"));
        }
        Ok(())
    }
}
