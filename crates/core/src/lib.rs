//! Domain types and pure decision logic for soil-moisture alerting.
//!
//! Nothing in this crate performs I/O. The agent fetches raw values and
//! hands them to [`reading::Reading::from_raw`]; the result is fed to
//! [`threshold::evaluate`], which decides whether an alert is due.

pub mod alert;
pub mod channels;
pub mod error;
pub mod reading;
pub mod sensor_names;
pub mod threshold;
pub mod types;
