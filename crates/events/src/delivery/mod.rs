//! Concrete notification sinks.
//!
//! [`webhook::WebhookSink`] pushes alerts to an external HTTP endpoint;
//! [`log::LogSink`] writes them to the tracing output for headless hosts.

pub mod log;
pub mod webhook;
