//! Configuration loading and parsing
//!
//! The dashboard configuration is compiled in from dashboard.toml and parsed
//! at boot by a small no_std parser.

pub mod toml;

use gaugelink_core::config::DashboardConfig;

pub use toml::{parse_config, ParseError};

/// Dashboard tick loop timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickConfig {
    /// Sleep between ticks (ms)
    pub interval_ms: u32,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self { interval_ms: 5 }
    }
}

/// Radio bridge UART settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RadioConfig {
    pub baud: u32,
}

impl Default for RadioConfig {
    fn default() -> Self {
        Self { baud: 115_200 }
    }
}

/// Panel orientation and addressing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PanelConfig {
    /// Quarter turns, 1 and 3 are landscape
    pub rotation: u8,
    /// Controller column of the first visible pixel
    pub x_offset: u16,
    /// Controller row of the first visible pixel
    pub y_offset: u16,
    /// Panel needs color inversion (most IPS ST7789 modules do)
    pub invert: bool,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            rotation: 3,
            x_offset: 0,
            y_offset: 35,
            invert: true,
        }
    }
}

/// Everything the firmware reads from dashboard.toml
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FirmwareConfig {
    pub dashboard: DashboardConfig,
    pub tick: TickConfig,
    pub radio: RadioConfig,
    pub display: PanelConfig,
}
