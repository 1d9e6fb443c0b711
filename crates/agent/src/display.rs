//! What the user sees after each read.
//!
//! The monitor reports through [`ReadingDisplay`] only, so the console
//! front end can be swapped for anything else without touching the
//! pipeline.

use std::fmt;

use soilwatch_core::error::{FetchError, NotifyError};
use soilwatch_core::reading::Reading;

/// Short status line shown to the user, the console's equivalent of a toast.
#[derive(Debug, Clone, PartialEq)]
pub enum Status {
    /// A value was read successfully. Carries the sensor label.
    ReadSucceeded(String),
    /// The read failed; shown instead of a reading.
    ReadFailed(FetchError),
    /// The reading was low but the alert could not be sent.
    AlertSuppressed(NotifyError),
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::ReadSucceeded(label) => write!(f, "Successful {label} Read"),
            Status::ReadFailed(e) => write!(f, "Read failed: {e}"),
            Status::AlertSuppressed(NotifyError::PermissionDenied) => {
                write!(f, "{}", NotifyError::PermissionDenied)
            }
            Status::AlertSuppressed(e) => write!(f, "Alert not sent: {e}"),
        }
    }
}

pub trait ReadingDisplay: Send + Sync {
    fn show_reading(&self, reading: &Reading);
    fn show_status(&self, status: &Status);
}

/// Writes readings and statuses to stdout.
#[derive(Debug, Default)]
pub struct ConsoleDisplay;

impl ReadingDisplay for ConsoleDisplay {
    fn show_reading(&self, reading: &Reading) {
        println!("{}: {}", reading.label(), reading.value);
    }

    fn show_status(&self, status: &Status) {
        println!("[{status}]");
    }
}
