//! Board-agnostic core logic for the dashboard firmware
//!
//! This crate contains the whole telemetry-to-gauge pipeline, independent of
//! the radio, the panel and the executor:
//!
//! - Single-slot telemetry mailbox shared by the receive path and the tick loop
//! - Link health monitoring (packet recency)
//! - Trip distance accumulation
//! - Gauge mapping (speed, ride mode, battery, range)
//! - The per-tick dashboard presenter
//! - Rendering surface trait and configuration types

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod gauge;
pub mod link;
pub mod mailbox;
pub mod model;
pub mod presenter;
pub mod traits;
pub mod trip;

pub use gaugelink_protocol::TelemetryRecord;
