//! Webhook alert delivery.
//!
//! [`WebhookSink`] POSTs each [`Notification`] as JSON to an external URL.
//! The payload carries `channel_id` and `alert_id` so the receiver can
//! replace an earlier alert with the same id. Each dispatch is a single
//! attempt; a failed POST is reported, not retried.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use soilwatch_core::channels::AlertChannel;
use soilwatch_core::error::NotifyError;

use crate::sink::{ChannelRegistry, Notification, NotificationSink};

/// HTTP request timeout for a single delivery attempt.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for webhook delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The remote server returned a non-2xx status code.
    #[error("Webhook returned HTTP {0}")]
    HttpStatus(u16),
}

impl From<WebhookError> for NotifyError {
    fn from(e: WebhookError) -> Self {
        NotifyError::Delivery(e.to_string())
    }
}

// ---------------------------------------------------------------------------
// WebhookSink
// ---------------------------------------------------------------------------

/// Delivers alerts to an external webhook endpoint.
pub struct WebhookSink {
    client: reqwest::Client,
    url: String,
    permitted: bool,
    channels: ChannelRegistry,
}

impl WebhookSink {
    /// Create a sink posting to `url`.
    ///
    /// `permitted` is the consumer's opt-in for alerts; when `false`, the
    /// sink reports no capability and nothing is ever posted.
    pub fn new(url: impl Into<String>, permitted: bool) -> Result<Self, WebhookError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
            permitted,
            channels: ChannelRegistry::new(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Execute a single POST request and check the response status.
    async fn try_send(&self, payload: &serde_json::Value) -> Result<(), WebhookError> {
        let response = self.client.post(&self.url).json(payload).send().await?;
        if !response.status().is_success() {
            return Err(WebhookError::HttpStatus(response.status().as_u16()));
        }
        Ok(())
    }
}

#[async_trait]
impl NotificationSink for WebhookSink {
    async fn is_permitted(&self) -> bool {
        self.permitted
    }

    async fn register_channel(&self, channel: &AlertChannel) -> Result<(), NotifyError> {
        if self.channels.register(channel) {
            tracing::debug!(channel = %channel.id, url = %self.url, "Webhook channel registered");
        }
        Ok(())
    }

    async fn dispatch(&self, notification: &Notification) -> Result<(), NotifyError> {
        self.channels.ensure_registered(&notification.channel_id)?;

        let payload = serde_json::json!({
            "channel_id": notification.channel_id,
            "alert_id": notification.alert_id,
            "title": notification.title,
            "body": notification.body,
            "timestamp": Utc::now(),
        });

        self.try_send(&payload).await.map_err(|e| {
            tracing::error!(url = %self.url, error = %e, "Webhook delivery failed");
            NotifyError::from(e)
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
