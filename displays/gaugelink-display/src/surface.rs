//! Dashboard rendering surface
//!
//! Maps the widget addresses used by the presenter onto the fixed layout and
//! draws them with the helpers in [`crate::widgets`].

use embedded_graphics::mono_font::MonoFont;
use embedded_graphics::pixelcolor::{Rgb565, Rgb888};
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use heapless::String;

use gaugelink_core::traits::{
    Color, Gauge, Indicator, Label, RenderSurface, Selector, SurfaceError,
};

use crate::layout::{self, BACKGROUND, RIDE_MODES};
use crate::widgets::{self, ProgressKind, LABEL_FONT, VALUE_FONT};

/// Longest label the layout can hold
const MAX_LABEL_CHARS: usize = 16;

/// Convert a 24-bit color to the panel format
pub fn to_rgb565(color: Color) -> Rgb565 {
    Rgb888::new(color.r, color.g, color.b).into()
}

/// Rendering surface over an RGB565 draw target
pub struct GaugeSurface<'m, D> {
    target: D,
    modes: &'m [&'m str],
    ride_mode: usize,
}

impl<D> GaugeSurface<'static, D>
where
    D: DrawTarget<Color = Rgb565>,
{
    /// Surface with the default ride-mode names
    pub fn new(target: D) -> Self {
        Self::with_modes(target, &RIDE_MODES)
    }
}

impl<'m, D> GaugeSurface<'m, D>
where
    D: DrawTarget<Color = Rgb565>,
{
    /// Surface with a custom ride-mode list
    pub fn with_modes(target: D, modes: &'m [&'m str]) -> Self {
        Self {
            target,
            modes,
            ride_mode: 0,
        }
    }

    /// Paint the background, static captions and every widget at rest
    ///
    /// The link dot starts red and the gauges at zero.
    pub fn draw_chrome(&mut self) -> Result<(), SurfaceError> {
        self.target.clear(BACKGROUND).map_err(|_| SurfaceError::Draw)?;

        let t = &mut self.target;
        widgets::draw_caption(t, layout::TRIP_UNIT, "km").map_err(|_| SurfaceError::Draw)?;
        widgets::draw_caption(t, layout::BATTERY_CAPTION, "BAT").map_err(|_| SurfaceError::Draw)?;
        widgets::draw_caption(t, layout::RANGE_CAPTION, "RNG").map_err(|_| SurfaceError::Draw)?;

        self.set_background(Indicator::Link, Color::from_hex(0xFF0000))?;
        for gauge in [Gauge::Speed, Gauge::Battery, Gauge::Range] {
            self.set_value(gauge, 0)?;
        }
        self.set_selected(Selector::RideMode, 0)
    }

    /// Name of the ride mode currently shown
    pub fn ride_mode_name(&self) -> Option<&str> {
        self.modes.get(self.ride_mode).copied()
    }

    /// Access the draw target (e.g. to flush a framebuffer)
    pub fn target_mut(&mut self) -> &mut D {
        &mut self.target
    }

    fn label_slot(label: Label) -> (Rectangle, &'static MonoFont<'static>) {
        match label {
            Label::Speed => (layout::SPEED_LABEL, VALUE_FONT),
            Label::Trip => (layout::TRIP_LABEL, LABEL_FONT),
            Label::BatteryPercent => (layout::BATTERY_LABEL, LABEL_FONT),
            Label::Voltage => (layout::VOLTAGE_LABEL, LABEL_FONT),
        }
    }
}

impl<D> RenderSurface for GaugeSurface<'_, D>
where
    D: DrawTarget<Color = Rgb565>,
{
    fn set_value(&mut self, gauge: Gauge, value: i32) -> Result<(), SurfaceError> {
        let (area, max, fill, kind) = match gauge {
            Gauge::Speed => (
                layout::SPEED_SLIDER,
                layout::SPEED_MAX,
                layout::SPEED_FILL,
                ProgressKind::Slider,
            ),
            Gauge::Battery => (
                layout::BATTERY_BAR,
                layout::BATTERY_MAX,
                layout::BATTERY_FILL,
                ProgressKind::Bar,
            ),
            Gauge::Range => (
                layout::RANGE_SLIDER,
                layout::RANGE_MAX,
                layout::RANGE_FILL,
                ProgressKind::Slider,
            ),
        };
        widgets::draw_progress(&mut self.target, area, value, max, fill, kind)
            .map_err(|_| SurfaceError::Draw)
    }

    /// Text wider than the box is cut to fit and reported as `TextTooLong`
    fn set_text(&mut self, label: Label, text: &str) -> Result<(), SurfaceError> {
        let (area, font) = Self::label_slot(label);
        let capacity = widgets::text_capacity(&area, font).min(MAX_LABEL_CHARS);

        let mut shown: String<MAX_LABEL_CHARS> = String::new();
        for c in text.chars().take(capacity) {
            // Capacity was checked above
            let _ = shown.push(c);
        }
        let truncated = text.chars().count() > capacity;

        widgets::draw_label(&mut self.target, area, &shown, font).map_err(|_| SurfaceError::Draw)?;

        if truncated {
            Err(SurfaceError::TextTooLong)
        } else {
            Ok(())
        }
    }

    /// Indices past the end of the mode list show the last mode
    fn set_selected(&mut self, selector: Selector, index: u16) -> Result<(), SurfaceError> {
        match selector {
            Selector::RideMode => {
                let last = self.modes.len().checked_sub(1).ok_or(SurfaceError::UnknownWidget)?;
                self.ride_mode = usize::from(index).min(last);
                let entry = self.modes[self.ride_mode];
                widgets::draw_roller(&mut self.target, layout::RIDE_MODE_BOX, entry)
                    .map_err(|_| SurfaceError::Draw)
            }
        }
    }

    fn set_background(&mut self, indicator: Indicator, color: Color) -> Result<(), SurfaceError> {
        match indicator {
            Indicator::Link => widgets::draw_dot(
                &mut self.target,
                layout::LINK_DOT_ORIGIN,
                layout::LINK_DOT_DIAMETER,
                to_rgb565(color),
            )
            .map_err(|_| SurfaceError::Draw),
        }
    }
}
