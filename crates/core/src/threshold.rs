//! Threshold decision for a single reading.
//!
//! Pure logic: no I/O and no memory of earlier calls. Evaluating the same
//! reading twice yields the same verdict both times; de-duplicating alerts
//! is left to the caller.

use crate::alert::{AlertEvent, AlertThreshold};
use crate::reading::Reading;

/// Return an [`AlertEvent`] iff `reading.value` is strictly below `threshold`.
///
/// A reading exactly at the threshold does not alert.
pub fn evaluate(reading: &Reading, threshold: AlertThreshold) -> Option<AlertEvent> {
    if reading.value < threshold.value() {
        Some(AlertEvent::new(reading.clone()))
    } else {
        None
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use serde_json::json;

    use super::*;

    fn make_reading(value: f64) -> Reading {
        Reading {
            name: "moisture".to_string(),
            value,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn no_alert_at_or_above_threshold() {
        let threshold = AlertThreshold::default();
        for value in [45.0, 45.000_1, 60.0, 100.0, 1e9] {
            assert!(
                evaluate(&make_reading(value), threshold).is_none(),
                "{value} should not alert"
            );
        }
    }

    #[test]
    fn alert_below_threshold() {
        let threshold = AlertThreshold::default();
        for value in [44.999, 30.0, 0.0, -5.0] {
            let event = evaluate(&make_reading(value), threshold)
                .unwrap_or_else(|| panic!("{value} should alert"));
            assert_eq!(event.reading.value, value);
        }
    }

    #[test]
    fn verdict_is_stable_across_repeated_calls() {
        let threshold = AlertThreshold::default();
        let low = make_reading(12.0);
        let first = evaluate(&low, threshold);
        let second = evaluate(&low, threshold);
        assert!(first.is_some());
        assert_eq!(first, second);
    }

    #[test]
    fn fetched_thirty_alerts_with_value_in_message() {
        let reading = Reading::from_raw("moisture", "sensor/moisture", &json!("30.0")).unwrap();
        let event = evaluate(&reading, AlertThreshold::new(45.0).unwrap()).unwrap();
        assert!(event.message.contains("30"));
    }

    #[test]
    fn fetched_boundary_value_does_not_alert() {
        let reading = Reading::from_raw("moisture", "sensor/moisture", &json!("45.0")).unwrap();
        assert!(evaluate(&reading, AlertThreshold::new(45.0).unwrap()).is_none());
    }
}
