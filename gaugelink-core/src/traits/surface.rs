//! Rendering surface trait
//!
//! The presenter never creates or lays out widgets. It only pushes values
//! into widgets that the surface already owns, addressed by the enums below.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Errors a rendering surface can report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SurfaceError {
    /// Drawing to the underlying target failed
    Draw,
    /// The surface has no such widget
    UnknownWidget,
    /// Text does not fit the label
    TextTooLong,
}

/// 24-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// Build a color from a `0xRRGGBB` literal
    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: (hex >> 16) as u8,
            g: (hex >> 8) as u8,
            b: hex as u8,
        }
    }

    /// Back to `0xRRGGBB`
    pub const fn to_hex(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }
}

/// Progress-style widgets (sliders and bars)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Gauge {
    /// Speed slider, 0..=max speed
    Speed,
    /// Battery bar, 0..=100
    Battery,
    /// Range slider, 0..=range max
    Range,
}

/// Text labels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Label {
    Speed,
    Trip,
    BatteryPercent,
    Voltage,
}

/// Discrete selectors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Selector {
    /// Ride mode roller; the entries are owned by the surface
    RideMode,
}

/// Solid shapes whose background color carries state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Indicator {
    /// Link status dot
    Link,
}

/// Trait for anything that can show the dashboard widgets
///
/// Every call sets one widget immediately, without animation.
pub trait RenderSurface {
    /// Set the value of a progress widget
    fn set_value(&mut self, gauge: Gauge, value: i32) -> Result<(), SurfaceError>;

    /// Replace the text of a label
    fn set_text(&mut self, label: Label, text: &str) -> Result<(), SurfaceError>;

    /// Select an entry of a discrete selector
    fn set_selected(&mut self, selector: Selector, index: u16) -> Result<(), SurfaceError>;

    /// Set the background color of an indicator shape
    fn set_background(&mut self, indicator: Indicator, color: Color) -> Result<(), SurfaceError>;
}

impl<T: RenderSurface + ?Sized> RenderSurface for &mut T {
    fn set_value(&mut self, gauge: Gauge, value: i32) -> Result<(), SurfaceError> {
        (**self).set_value(gauge, value)
    }

    fn set_text(&mut self, label: Label, text: &str) -> Result<(), SurfaceError> {
        (**self).set_text(label, text)
    }

    fn set_selected(&mut self, selector: Selector, index: u16) -> Result<(), SurfaceError> {
        (**self).set_selected(selector, index)
    }

    fn set_background(&mut self, indicator: Indicator, color: Color) -> Result<(), SurfaceError> {
        (**self).set_background(indicator, color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_hex() {
        let green = Color::from_hex(0x00FF00);
        assert_eq!(green, Color { r: 0, g: 0xFF, b: 0 });
        assert_eq!(green.to_hex(), 0x00FF00);
        assert_eq!(Color::from_hex(0x123456).to_hex(), 0x123456);
    }
}
