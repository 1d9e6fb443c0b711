//! Notification channel definitions.
//!
//! A channel is registered with the sink once at startup; every alert is
//! dispatched under one. Alerts carry a stable id so a repeat dispatch
//! replaces the previous notification instead of stacking a new one.

use serde::Serialize;

/// A named alert channel, as shown in the consumer's notification settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlertChannel {
    pub id: String,
    pub name: String,
    pub description: String,
}

/// Channel id that low-moisture alerts are dispatched under.
pub const CHANNEL_MOISTURE: &str = "moisture_channel";

/// Stable identifier for the low-moisture alert.
pub const LOW_MOISTURE_ALERT_ID: i32 = 1001;

impl AlertChannel {
    /// The channel low-moisture alerts are dispatched under.
    pub fn moisture() -> Self {
        Self {
            id: CHANNEL_MOISTURE.to_string(),
            name: "Moisture Alerts".to_string(),
            description: "Notifications for ESP32 moisture readings".to_string(),
        }
    }
}
