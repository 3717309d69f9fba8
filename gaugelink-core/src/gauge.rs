//! Gauge mapping
//!
//! Pure conversions from raw telemetry to display units. All integer
//! results truncate toward zero, after clamping to the gauge range.

use crate::config::{BatteryConfig, GaugeConfig};

/// Number of ride-mode bands
pub const RIDE_MODE_COUNT: usize = 4;

/// Ordinal ride-mode band
///
/// Band 0 is the slowest. The names shown for each band belong to the
/// rendering surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RideMode(u8);

impl RideMode {
    /// Ordinal index into the surface's mode list
    pub const fn index(self) -> u8 {
        self.0
    }
}

impl GaugeConfig {
    /// Convert motor rpm to speed units, clamped to full scale
    pub fn speed(&self, rpm: u16) -> u16 {
        rpm.checked_div(self.rpm_per_unit)
            .unwrap_or(0)
            .min(self.max_speed)
    }

    /// Classify a speed into a ride-mode band
    ///
    /// Thresholds are inclusive lower bounds of bands 1, 2 and 3.
    pub fn ride_mode(&self, speed: u16) -> RideMode {
        let band = self
            .ride_mode_thresholds
            .iter()
            .take_while(|&&threshold| speed >= threshold)
            .count();
        RideMode(band as u8)
    }
}

impl BatteryConfig {
    /// Map pack voltage to a 0..=100 charge estimate
    ///
    /// Linear over the configured window. A NaN reading maps to 0.
    pub fn percent(&self, volts: f32) -> u8 {
        // f32::max/min return the non-NaN operand, so NaN lands on empty
        let clamped = volts.max(self.empty_volts).min(self.full_volts);
        let window = self.full_volts - self.empty_volts;
        let percent = ((clamped - self.empty_volts) / window * 100.0) as i32;
        percent.clamp(0, 100) as u8
    }

    /// Remap a battery percentage onto the range gauge
    pub fn range_level(&self, percent: u8) -> u8 {
        let percent = u16::from(percent.min(100));
        (percent * u16::from(self.range_max) / 100) as u8
    }
}
