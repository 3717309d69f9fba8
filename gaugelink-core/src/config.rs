//! Configuration types
//!
//! Every gauge formula reads its constants from here. The defaults are the
//! dashboard's stock calibration. The battery window and range scale are
//! linear approximations of the pack's discharge curve.

use crate::gauge::RIDE_MODE_COUNT;
use crate::traits::Color;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Link health configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LinkConfig {
    /// A packet younger than this keeps the link up (ms, strict)
    pub timeout_ms: u32,
    /// Indicator color while connected
    pub connected_color: Color,
    /// Indicator color while disconnected
    pub disconnected_color: Color,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 1000,
            connected_color: Color::from_hex(0x00FF00),
            disconnected_color: Color::from_hex(0xFF0000),
        }
    }
}

/// Speed gauge configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GaugeConfig {
    /// Motor rpm per speed unit (integer division)
    pub rpm_per_unit: u16,
    /// Full-scale speed value
    pub max_speed: u16,
    /// Speeds at which ride modes 1, 2 and 3 begin
    pub ride_mode_thresholds: [u16; RIDE_MODE_COUNT - 1],
}

impl Default for GaugeConfig {
    fn default() -> Self {
        Self {
            rpm_per_unit: 32,
            max_speed: 250,
            ride_mode_thresholds: [60, 80, 140],
        }
    }
}

/// Battery gauge configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BatteryConfig {
    /// Voltage shown as 0 %
    pub empty_volts: f32,
    /// Voltage shown as 100 %
    pub full_volts: f32,
    /// Range gauge value at 100 %
    pub range_max: u8,
}

impl Default for BatteryConfig {
    fn default() -> Self {
        Self {
            empty_volts: 10.0,
            full_volts: 14.0,
            range_max: 70,
        }
    }
}

/// Complete dashboard configuration
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DashboardConfig {
    pub link: LinkConfig,
    pub gauge: GaugeConfig,
    pub battery: BatteryConfig,
}

impl DashboardConfig {
    /// Check the invariants the gauge formulas rely on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.link.timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        if self.gauge.rpm_per_unit == 0 {
            return Err(ConfigError::ZeroRpmScale);
        }
        let [a, b, c] = self.gauge.ride_mode_thresholds;
        if !(a < b && b < c) {
            return Err(ConfigError::ThresholdOrder);
        }
        if !(self.battery.empty_volts < self.battery.full_volts) {
            return Err(ConfigError::BatteryWindow);
        }
        Ok(())
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Link timeout must be positive
    ZeroTimeout,
    /// Rpm divisor must be positive
    ZeroRpmScale,
    /// Ride mode thresholds must be strictly increasing
    ThresholdOrder,
    /// Empty voltage must be below full voltage
    BatteryWindow,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert_eq!(DashboardConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_default_values() {
        let config = DashboardConfig::default();
        assert_eq!(config.link.timeout_ms, 1000);
        assert_eq!(config.gauge.rpm_per_unit, 32);
        assert_eq!(config.gauge.max_speed, 250);
        assert_eq!(config.gauge.ride_mode_thresholds, [60, 80, 140]);
        assert_eq!(config.battery.empty_volts, 10.0);
        assert_eq!(config.battery.full_volts, 14.0);
        assert_eq!(config.battery.range_max, 70);
    }

    #[test]
    fn test_invalid_configs() {
        let mut config = DashboardConfig::default();
        config.gauge.ride_mode_thresholds = [60, 60, 140];
        assert_eq!(config.validate(), Err(ConfigError::ThresholdOrder));

        let mut config = DashboardConfig::default();
        config.battery.full_volts = 9.0;
        assert_eq!(config.validate(), Err(ConfigError::BatteryWindow));

        let mut config = DashboardConfig::default();
        config.battery.empty_volts = f32::NAN;
        assert_eq!(config.validate(), Err(ConfigError::BatteryWindow));

        let mut config = DashboardConfig::default();
        config.link.timeout_ms = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroTimeout));

        let mut config = DashboardConfig::default();
        config.gauge.rpm_per_unit = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroRpmScale));
    }
}
