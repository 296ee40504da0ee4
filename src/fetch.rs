//! Status Fetcher -- one form POST to the case-status page per call.

use std::time::Duration;

use reqwest::Client;

use crate::error::{Result, WatchError};
use crate::html;

/// Form field carrying the search trigger value.
const TRIGGER_FIELD: (&str, &str) = ("initCaseSearch", "CHECK STATUS");
/// Form field carrying the receipt number.
const RECEIPT_FIELD: &str = "appReceiptNum";

/// Fetches the current case status from the upstream page.
pub struct StatusFetcher {
    client: Client,
    page_url: String,
}

impl StatusFetcher {
    pub fn new(page_url: &str) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .expect("Failed to build HTTP client"),
            page_url: page_url.to_string(),
        }
    }

    /// Submit the lookup form and return the trimmed text of the first
    /// heading element. No caching, no retry; one request per call.
    pub async fn fetch_current_status(&self, receipt_number: &str) -> Result<String> {
        let form = [
            TRIGGER_FIELD,
            (RECEIPT_FIELD, receipt_number),
        ];

        let response = self
            .client
            .post(&self.page_url)
            .form(&form)
            .send()
            .await?
            .error_for_status()?;

        let body = response.text().await?;

        html::first_heading_text(&body).ok_or(WatchError::StatusNotFound)
    }
}
