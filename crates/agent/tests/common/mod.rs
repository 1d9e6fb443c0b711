//! Shared fixtures for agent integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use soilwatch_agent::display::{ReadingDisplay, Status};
use soilwatch_agent::fetcher::ReadingFetcher;
use soilwatch_agent::monitor::Monitor;
use soilwatch_agent::source::{DataSource, SourceError};
use soilwatch_core::alert::AlertThreshold;
use soilwatch_core::channels::AlertChannel;
use soilwatch_core::error::NotifyError;
use soilwatch_core::reading::Reading;
use soilwatch_events::{ChannelRegistry, Notification, NotificationSink, ThresholdNotifier};
use tokio::sync::Notify;

pub const NAMESPACE: &str = "sensor";
pub const KEY: &str = "moisture";

// ---------------------------------------------------------------------------
// Data sources
// ---------------------------------------------------------------------------

/// In-memory store keyed by `namespace/key`.
#[derive(Default)]
pub struct MemorySource {
    values: HashMap<String, Value>,
}

impl MemorySource {
    pub fn with(key: &str, value: Value) -> Self {
        let mut values = HashMap::new();
        values.insert(format!("{NAMESPACE}/{key}"), value);
        Self { values }
    }
}

#[async_trait]
impl DataSource for MemorySource {
    async fn read_once(&self, namespace: &str, key: &str) -> Result<Option<Value>, SourceError> {
        Ok(self.values.get(&format!("{namespace}/{key}")).cloned())
    }
}

/// Source that holds every read until [`release`](Self::release) is called.
pub struct GatedSource {
    value: Value,
    started: Notify,
    gate: Notify,
}

impl GatedSource {
    pub fn new(value: Value) -> Arc<Self> {
        Arc::new(Self {
            value,
            started: Notify::new(),
            gate: Notify::new(),
        })
    }

    /// Wait until a read is in flight.
    pub async fn wait_started(&self) {
        self.started.notified().await;
    }

    pub fn release(&self) {
        self.gate.notify_waiters();
    }
}

#[async_trait]
impl DataSource for GatedSource {
    async fn read_once(&self, _namespace: &str, _key: &str) -> Result<Option<Value>, SourceError> {
        let gate = self.gate.notified();
        self.started.notify_one();
        gate.await;
        Ok(Some(self.value.clone()))
    }
}

// ---------------------------------------------------------------------------
// Sink
// ---------------------------------------------------------------------------

pub struct RecordingSink {
    permitted: bool,
    registry: ChannelRegistry,
    sent: Mutex<Vec<Notification>>,
}

impl RecordingSink {
    pub fn new(permitted: bool) -> Arc<Self> {
        Arc::new(Self {
            permitted,
            registry: ChannelRegistry::new(),
            sent: Mutex::new(Vec::new()),
        })
    }

    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationSink for RecordingSink {
    async fn is_permitted(&self) -> bool {
        self.permitted
    }

    async fn register_channel(&self, channel: &AlertChannel) -> Result<(), NotifyError> {
        self.registry.register(channel);
        Ok(())
    }

    async fn dispatch(&self, notification: &Notification) -> Result<(), NotifyError> {
        self.registry.ensure_registered(&notification.channel_id)?;
        self.sent.lock().unwrap().push(notification.clone());
        Ok(())
    }
}

/// Permitted sink whose dispatch blocks until [`release`](Self::release).
pub struct GatedSink {
    started: Notify,
    gate: Notify,
    sent: Mutex<Vec<Notification>>,
}

impl GatedSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            started: Notify::new(),
            gate: Notify::new(),
            sent: Mutex::new(Vec::new()),
        })
    }

    /// Wait until a dispatch is in flight.
    pub async fn wait_started(&self) {
        self.started.notified().await;
    }

    pub fn release(&self) {
        self.gate.notify_waiters();
    }

    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationSink for GatedSink {
    async fn is_permitted(&self) -> bool {
        true
    }

    async fn register_channel(&self, _channel: &AlertChannel) -> Result<(), NotifyError> {
        Ok(())
    }

    async fn dispatch(&self, notification: &Notification) -> Result<(), NotifyError> {
        let gate = self.gate.notified();
        self.started.notify_one();
        gate.await;
        self.sent.lock().unwrap().push(notification.clone());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct RecordingDisplay {
    readings: Mutex<Vec<f64>>,
    statuses: Mutex<Vec<Status>>,
}

impl RecordingDisplay {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn readings(&self) -> Vec<f64> {
        self.readings.lock().unwrap().clone()
    }

    pub fn statuses(&self) -> Vec<Status> {
        self.statuses.lock().unwrap().clone()
    }
}

impl ReadingDisplay for RecordingDisplay {
    fn show_reading(&self, reading: &Reading) {
        self.readings.lock().unwrap().push(reading.value);
    }

    fn show_status(&self, status: &Status) {
        self.statuses.lock().unwrap().push(status.clone());
    }
}

// ---------------------------------------------------------------------------
// Monitor
// ---------------------------------------------------------------------------

/// Build a monitor reading `sensor/moisture` with a 45 threshold.
pub fn build_monitor(
    source: Arc<dyn DataSource>,
    sink: Arc<dyn NotificationSink>,
    display: Arc<dyn ReadingDisplay>,
) -> Monitor {
    let fetcher = ReadingFetcher::new(source, NAMESPACE, Duration::from_secs(5));
    let notifier = ThresholdNotifier::new(AlertThreshold::new(45.0).unwrap());
    Monitor::new(fetcher, KEY, notifier, sink, display)
}
