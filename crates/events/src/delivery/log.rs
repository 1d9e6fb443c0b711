//! Alert delivery through the tracing output.
//!
//! Used when no webhook is configured: the alert lands in the agent's log
//! at `WARN`, which is the closest thing a headless host has to a
//! notification tray.

use async_trait::async_trait;
use soilwatch_core::channels::AlertChannel;
use soilwatch_core::error::NotifyError;

use crate::sink::{ChannelRegistry, Notification, NotificationSink};

pub struct LogSink {
    permitted: bool,
    channels: ChannelRegistry,
}

impl LogSink {
    pub fn new(permitted: bool) -> Self {
        Self {
            permitted,
            channels: ChannelRegistry::new(),
        }
    }
}

#[async_trait]
impl NotificationSink for LogSink {
    async fn is_permitted(&self) -> bool {
        self.permitted
    }

    async fn register_channel(&self, channel: &AlertChannel) -> Result<(), NotifyError> {
        if self.channels.register(channel) {
            tracing::info!(
                channel = %channel.id,
                name = %channel.name,
                description = %channel.description,
                "Notification channel registered"
            );
        }
        Ok(())
    }

    async fn dispatch(&self, notification: &Notification) -> Result<(), NotifyError> {
        self.channels.ensure_registered(&notification.channel_id)?;
        tracing::warn!(
            channel = %notification.channel_id,
            alert_id = notification.alert_id,
            title = %notification.title,
            "{}",
            notification.body
        );
        Ok(())
    }
}
