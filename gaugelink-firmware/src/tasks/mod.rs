//! Embassy async tasks
//!
//! The radio task produces into the telemetry mailbox; the dashboard task
//! consumes from it. They share nothing else.

pub mod dashboard;
pub mod radio_rx;

pub use dashboard::{dashboard_task, Panel};
pub use radio_rx::radio_rx_task;
