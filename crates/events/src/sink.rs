//! The notification sink seam.
//!
//! A sink is whatever surfaces alerts to the end user. The notifier only
//! talks to it through [`NotificationSink`], so the decision logic never
//! depends on a platform permission API.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use serde::Serialize;
use soilwatch_core::channels::AlertChannel;
use soilwatch_core::error::NotifyError;

// ---------------------------------------------------------------------------
// Notification
// ---------------------------------------------------------------------------

/// A single alert ready for dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    /// Channel the alert is dispatched under. Must be registered first.
    pub channel_id: String,
    /// Stable id; dispatching again with the same id replaces the previous
    /// alert rather than adding another.
    pub alert_id: i32,
    pub title: String,
    pub body: String,
}

// ---------------------------------------------------------------------------
// NotificationSink
// ---------------------------------------------------------------------------

#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Whether the consumer has granted the capability to emit alerts.
    async fn is_permitted(&self) -> bool;

    /// Register a named channel. Registering the same channel again is a
    /// no-op.
    async fn register_channel(&self, channel: &AlertChannel) -> Result<(), NotifyError>;

    /// Emit one alert under its channel.
    ///
    /// Returns [`NotifyError::SinkUnavailable`] if the channel was never
    /// registered.
    async fn dispatch(&self, notification: &Notification) -> Result<(), NotifyError>;
}

// ---------------------------------------------------------------------------
// ChannelRegistry
// ---------------------------------------------------------------------------

/// Set of registered channel ids, shared by the concrete sinks.
#[derive(Debug, Default)]
pub struct ChannelRegistry {
    channels: Mutex<HashSet<String>>,
}

impl ChannelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a channel. Returns `false` if it was already registered.
    pub fn register(&self, channel: &AlertChannel) -> bool {
        self.channels
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(channel.id.clone())
    }

    /// `Ok` if `channel_id` has been registered.
    pub fn ensure_registered(&self, channel_id: &str) -> Result<(), NotifyError> {
        let registered = self
            .channels
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .contains(channel_id);

        if registered {
            Ok(())
        } else {
            Err(NotifyError::SinkUnavailable {
                channel_id: channel_id.to_string(),
            })
        }
    }
}
