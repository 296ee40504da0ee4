//! Notifier -- SMS delivery through the Twilio REST API.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use crate::config::TwilioConfig;
use crate::error::{Result, WatchError};

/// Sends a status-change notification to one recipient.
///
/// A send is an irreversible external side effect; callers must only invoke
/// this after confirming a real status change.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver the templated status message. Returns the provider-assigned
    /// message identifier.
    async fn notify(&self, recipient: &str, status: &str) -> Result<String>;
}

/// Relevant slice of Twilio's create-message reply.
#[derive(Debug, Deserialize)]
struct MessageResponse {
    sid: String,
}

/// Twilio-backed notifier.
pub struct TwilioNotifier {
    client: Client,
    api_base: String,
    account_sid: String,
    auth_token: String,
    from_number: String,
}

impl TwilioNotifier {
    pub fn new(config: &TwilioConfig) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .expect("Failed to build HTTP client"),
            api_base: config.api_base.clone(),
            account_sid: config.account_sid.clone(),
            auth_token: config.auth_token.clone(),
            from_number: config.from_number.clone(),
        }
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.api_base, self.account_sid
        )
    }
}

/// Render the fixed notification template around the current status.
pub fn status_update_message(status: &str) -> String {
    format!(
        "Hey! Your case status has been updated. The current status is \"{}\"",
        status
    )
}

#[async_trait::async_trait]
impl Notifier for TwilioNotifier {
    async fn notify(&self, recipient: &str, status: &str) -> Result<String> {
        let body = status_update_message(status);
        let form = [
            ("To", recipient),
            ("From", self.from_number.as_str()),
            ("Body", body.as_str()),
        ];

        let response = self
            .client
            .post(self.messages_url())
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&form)
            .send()
            .await?;

        let http_status = response.status();
        if !http_status.is_success() {
            // Twilio puts the rejection reason in the body; pass it through.
            let detail = response.text().await.unwrap_or_default();
            return Err(WatchError::Delivery {
                status: http_status.as_u16(),
                detail,
            });
        }

        let message: MessageResponse = response.json().await?;
        Ok(message.sid)
    }
}
