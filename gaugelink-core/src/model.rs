//! Display model
//!
//! Everything the dashboard shows for one packet, derived fresh on every
//! update and never stored beyond it.

use core::fmt::Write;

use heapless::String;

use crate::config::DashboardConfig;
use crate::gauge::RideMode;
use crate::TelemetryRecord;

/// Capacity of short numeric labels
pub const LABEL_LEN: usize = 16;

/// Capacity of the voltage label, which shows the raw float unclamped
pub const VOLTAGE_LABEL_LEN: usize = 48;

/// Display-ready values for one update
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DashboardModel {
    /// Speed in display units (0..=max speed)
    pub speed: u16,
    /// Ride-mode band for `speed`
    pub ride_mode: RideMode,
    /// Trip distance in km
    pub trip_km: f32,
    /// Battery charge estimate (0..=100)
    pub battery_percent: u8,
    /// Raw pack voltage as received
    pub battery_volts: f32,
    /// Range gauge value (0..=range max)
    pub range_level: u8,
}

impl DashboardModel {
    /// Speed for a record, the input to the trip odometer
    pub fn speed_for(record: &TelemetryRecord, config: &DashboardConfig) -> u16 {
        config.gauge.speed(record.rpm)
    }

    /// Derive the model from a record and the current trip distance
    pub fn derive(record: &TelemetryRecord, trip_km: f32, config: &DashboardConfig) -> Self {
        let speed = Self::speed_for(record, config);
        let battery_percent = config.battery.percent(record.battery_volts);
        Self {
            speed,
            ride_mode: config.gauge.ride_mode(speed),
            trip_km,
            battery_percent,
            battery_volts: record.battery_volts,
            range_level: config.battery.range_level(battery_percent),
        }
    }

    /// Speed label, e.g. `"125"`
    pub fn speed_text(&self) -> String<LABEL_LEN> {
        let mut text = String::new();
        let _ = write!(text, "{}", self.speed);
        text
    }

    /// Trip label with one decimal and a trailing space before the unit
    /// caption, e.g. `"12.3 "`
    pub fn trip_text(&self) -> String<LABEL_LEN> {
        let mut text = String::new();
        if write!(text, "{:.1} ", self.trip_km).is_err() {
            text.clear();
            let _ = text.push_str("---- ");
        }
        text
    }

    /// Battery label, e.g. `"75%"`
    pub fn battery_text(&self) -> String<LABEL_LEN> {
        let mut text = String::new();
        let _ = write!(text, "{}%", self.battery_percent);
        text
    }

    /// Voltage label from the raw reading, e.g. `"12.6V"`
    pub fn voltage_text(&self) -> String<VOLTAGE_LABEL_LEN> {
        let mut text = String::new();
        let _ = write!(text, "{:.1}V", self.battery_volts);
        text
    }
}
