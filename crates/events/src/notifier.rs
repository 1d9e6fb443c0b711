//! Threshold decision plus alert dispatch.
//!
//! [`ThresholdNotifier`] is stateless: it holds only immutable
//! configuration, and notifying twice for the same reading dispatches
//! twice.

use soilwatch_core::alert::{AlertEvent, AlertThreshold};
use soilwatch_core::channels::{AlertChannel, LOW_MOISTURE_ALERT_ID};
use soilwatch_core::error::NotifyError;
use soilwatch_core::reading::Reading;
use soilwatch_core::threshold;

use crate::sink::{Notification, NotificationSink};

/// Decides whether readings are low and emits alerts for those that are.
#[derive(Debug, Clone)]
pub struct ThresholdNotifier {
    threshold: AlertThreshold,
    channel: AlertChannel,
    alert_id: i32,
}

impl ThresholdNotifier {
    /// Notifier for the moisture channel with the standard alert id.
    pub fn new(threshold: AlertThreshold) -> Self {
        Self {
            threshold,
            channel: AlertChannel::moisture(),
            alert_id: LOW_MOISTURE_ALERT_ID,
        }
    }

    pub fn threshold(&self) -> AlertThreshold {
        self.threshold
    }

    /// The channel alerts are dispatched under. Register it with the sink
    /// at startup.
    pub fn channel(&self) -> &AlertChannel {
        &self.channel
    }

    /// See [`threshold::evaluate`].
    pub fn evaluate(&self, reading: &Reading) -> Option<AlertEvent> {
        threshold::evaluate(reading, self.threshold)
    }

    /// Dispatch `event` to `sink`.
    ///
    /// The sink's permission is queried before every dispatch attempt; a
    /// denied sink is never handed the alert.
    pub async fn notify(
        &self,
        event: &AlertEvent,
        sink: &dyn NotificationSink,
    ) -> Result<(), NotifyError> {
        if !sink.is_permitted().await {
            tracing::info!(
                reading = event.reading.value,
                "Alert suppressed -- notification permission not granted"
            );
            return Err(NotifyError::PermissionDenied);
        }

        let notification = Notification {
            channel_id: self.channel.id.clone(),
            alert_id: self.alert_id,
            title: event.title(),
            body: event.message.clone(),
        };

        sink.dispatch(&notification).await?;

        tracing::info!(
            channel = %self.channel.id,
            alert_id = self.alert_id,
            reading = event.reading.value,
            threshold = self.threshold.value(),
            "Low reading alert dispatched"
        );
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
