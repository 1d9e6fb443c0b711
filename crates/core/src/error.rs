use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Why a one-shot read of a sensor value did not produce a [`Reading`].
///
/// Each variant is distinct so the caller can decide whether to skip
/// silently or surface the problem to the user.
///
/// [`Reading`]: crate::reading::Reading
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FetchError {
    /// The key is absent from the data source.
    #[error("No value stored at {path}")]
    NotFound { path: String },

    /// A value exists but is not a finite number.
    #[error("Value {raw} is not a valid number")]
    ParseError { raw: String },

    /// The read itself failed (network, HTTP status, malformed body).
    #[error("Transport error: {0}")]
    TransportError(String),

    /// The data source did not answer within the fetch timeout.
    #[error("Read timed out after {}s", .0.as_secs_f64())]
    Timeout(Duration),
}

/// Why an alert could not be handed to a notification sink.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotifyError {
    /// The consumer has not granted the capability to emit alerts.
    #[error("Notification permission not granted")]
    PermissionDenied,

    /// The alert channel was never registered with the sink.
    #[error("Notification channel {channel_id} is not registered")]
    SinkUnavailable { channel_id: String },

    /// The sink accepted the alert but its transport failed.
    #[error("Notification delivery failed: {0}")]
    Delivery(String),
}
