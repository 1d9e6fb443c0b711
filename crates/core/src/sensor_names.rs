//! Well-known sensor paths in the realtime database.
//!
//! The ESP32 firmware writes its readings under `sensor/<key>`; these are
//! the defaults the agent reads when no override is configured.

/// Parent node that every sensor value is written under.
pub const SENSOR_NAMESPACE: &str = "sensor";

/// Soil moisture as a percentage (0-100).
pub const SENSOR_MOISTURE: &str = "moisture";
