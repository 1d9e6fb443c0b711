//! The fetch, decide, notify pipeline.
//!
//! Each trigger runs one independent cycle on its own task: fetch the
//! reading, show it, and dispatch an alert if it is low. Overlapping
//! triggers are not serialized and complete in no particular order.
//!
//! Cycles observe a child of the monitor's [`CancellationToken`]. Once
//! [`Monitor::shutdown`] is called, any cycle still waiting on the data
//! source drops its result without touching the display or the sink.
//! [`Monitor::drain`] is the graceful alternative: it waits for every
//! cycle already triggered to finish.

use std::sync::Arc;

use soilwatch_core::error::{FetchError, NotifyError};
use soilwatch_core::reading::Reading;
use soilwatch_events::{NotificationSink, ThresholdNotifier};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use crate::display::{ReadingDisplay, Status};
use crate::fetcher::ReadingFetcher;

/// What happened to the alert for a successful read.
#[derive(Debug, Clone, PartialEq)]
pub enum AlertOutcome {
    /// The reading was at or above the threshold.
    NotRequired,
    Dispatched,
    /// The reading was low but the sink refused or failed the alert.
    Suppressed(NotifyError),
    /// The monitor shut down before the alert could be dispatched.
    Abandoned,
}

/// Result of a single trigger.
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    /// A reading was fetched and displayed.
    Completed { reading: Reading, alert: AlertOutcome },
    /// The fetch failed; the failure was shown to the user.
    FetchFailed(FetchError),
    /// The monitor shut down before the fetch resolved. Nothing was shown.
    Cancelled,
}

/// Owns the pipeline collaborators and spawns one cycle per trigger.
#[derive(Clone)]
pub struct Monitor {
    fetcher: ReadingFetcher,
    key: String,
    notifier: ThresholdNotifier,
    sink: Arc<dyn NotificationSink>,
    display: Arc<dyn ReadingDisplay>,
    cancel: CancellationToken,
    cycles: TaskTracker,
}

impl Monitor {
    pub fn new(
        fetcher: ReadingFetcher,
        key: impl Into<String>,
        notifier: ThresholdNotifier,
        sink: Arc<dyn NotificationSink>,
        display: Arc<dyn ReadingDisplay>,
    ) -> Self {
        Self {
            fetcher,
            key: key.into(),
            notifier,
            sink,
            display,
            cancel: CancellationToken::new(),
            cycles: TaskTracker::new(),
        }
    }

    /// Register the alert channel with the sink. Call once before the
    /// first trigger; calling again is harmless.
    pub async fn start(&self) -> Result<(), NotifyError> {
        self.sink.register_channel(self.notifier.channel()).await
    }

    /// Spawn a cycle and return immediately.
    pub fn trigger(&self) -> JoinHandle<CycleOutcome> {
        let monitor = self.clone();
        self.cycles.spawn(async move { monitor.run_cycle().await })
    }

    /// Wait for every cycle triggered so far to finish. Cycles triggered
    /// while draining are waited for too.
    pub async fn drain(&self) {
        self.cycles.close();
        self.cycles.wait().await;
        self.cycles.reopen();
    }

    /// Dispose of the monitor. Unresolved cycles are discarded.
    pub fn shutdown(&self) {
        tracing::info!("Monitor shutting down");
        self.cancel.cancel();
    }

    pub fn is_shut_down(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Run one fetch, decide, notify cycle to completion.
    pub async fn run_cycle(&self) -> CycleOutcome {
        let cancel = self.cancel.child_token();

        let fetched = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!(key = %self.key, "Fetch discarded after shutdown");
                return CycleOutcome::Cancelled;
            }
            result = self.fetcher.fetch(&self.key) => result,
        };

        let reading = match fetched {
            Ok(reading) => reading,
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "Sensor read failed");
                self.display.show_status(&Status::ReadFailed(e.clone()));
                return CycleOutcome::FetchFailed(e);
            }
        };

        self.display
            .show_status(&Status::ReadSucceeded(reading.label()));
        self.display.show_reading(&reading);
        tracing::info!(
            key = %self.key,
            value = reading.value,
            threshold = self.notifier.threshold().value(),
            "Sensor read"
        );

        let alert = match self.notifier.evaluate(&reading) {
            None => AlertOutcome::NotRequired,
            Some(event) => {
                let result = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => None,
                    result = self.notifier.notify(&event, self.sink.as_ref()) => Some(result),
                };

                match result {
                    None => AlertOutcome::Abandoned,
                    Some(Ok(())) => AlertOutcome::Dispatched,
                    Some(Err(e)) => {
                        tracing::warn!(error = %e, "Low reading alert suppressed");
                        self.display.show_status(&Status::AlertSuppressed(e.clone()));
                        AlertOutcome::Suppressed(e)
                    }
                }
            }
        };

        CycleOutcome::Completed { reading, alert }
    }
}
