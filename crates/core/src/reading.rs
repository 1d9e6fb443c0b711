//! A single named sensor measurement.

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;

use crate::error::FetchError;
use crate::types::Timestamp;

/// One fetched numeric measurement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reading {
    /// Sensor key the value was read from, e.g. `"moisture"`.
    pub name: String,
    /// Always finite.
    pub value: f64,
    /// When the value was fetched.
    pub timestamp: Timestamp,
}

impl Reading {
    /// Build a reading from the raw value returned by the data source.
    ///
    /// The ESP32 firmware writes either a JSON number or a numeric string,
    /// so both are accepted. `null` means nothing is stored at `path`.
    /// Anything else, including strings like `"NaN"` or `"inf"`, is a
    /// [`FetchError::ParseError`] rather than a zero reading.
    pub fn from_raw(name: &str, path: &str, raw: &Value) -> Result<Self, FetchError> {
        let value = match raw {
            Value::Null => {
                return Err(FetchError::NotFound {
                    path: path.to_string(),
                })
            }
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };

        match value {
            Some(v) if v.is_finite() => Ok(Self {
                name: name.to_string(),
                value: v,
                timestamp: Utc::now(),
            }),
            _ => Err(FetchError::ParseError {
                raw: raw.to_string(),
            }),
        }
    }

    /// Sensor name with its first letter upper-cased, for user-facing text.
    pub fn label(&self) -> String {
        let mut chars = self.name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}
