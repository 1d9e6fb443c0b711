//! Low-reading alert types.

use serde::Serialize;

use crate::error::CoreError;
use crate::reading::Reading;

/// Moisture percentage below which a reading is considered low.
pub const DEFAULT_MOISTURE_THRESHOLD: f64 = 45.0;

/// Fixed boundary below which a reading raises an alert.
///
/// Configured once at startup and never mutated.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct AlertThreshold(f64);

impl AlertThreshold {
    /// Returns a `CoreError::Validation` if `value` is NaN or infinite.
    pub fn new(value: f64) -> Result<Self, CoreError> {
        if !value.is_finite() {
            return Err(CoreError::Validation(format!(
                "alert threshold must be a finite number, got {value}"
            )));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl Default for AlertThreshold {
    fn default() -> Self {
        Self(DEFAULT_MOISTURE_THRESHOLD)
    }
}

/// Raised for a reading strictly below its threshold.
///
/// Consumed immediately by a notification sink; never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertEvent {
    /// The reading that triggered the alert.
    pub reading: Reading,
    /// Human-readable body, e.g. `"Moisture is low: 30%"`.
    pub message: String,
}

impl AlertEvent {
    pub fn new(reading: Reading) -> Self {
        let message = format!("{} is low: {}%", reading.label(), reading.value);
        Self { reading, message }
    }

    /// Short heading for the notification, e.g. `"Low Moisture Alert"`.
    pub fn title(&self) -> String {
        format!("Low {} Alert", self.reading.label())
    }
}
