//! Soilwatch alert notification infrastructure.
//!
//! - [`NotificationSink`] -- the capability a consumer exposes for
//!   surfacing alerts (permission query, channel registration, dispatch).
//! - [`ThresholdNotifier`] -- decides whether a reading is low and hands
//!   the resulting alert to a sink.
//! - [`delivery`] -- concrete sinks (webhook, log).

pub mod delivery;
pub mod notifier;
pub mod sink;

pub use delivery::log::LogSink;
pub use delivery::webhook::WebhookSink;
pub use notifier::ThresholdNotifier;
pub use sink::{ChannelRegistry, Notification, NotificationSink};
