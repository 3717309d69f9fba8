//! Screen layout
//!
//! Fixed geometry for the 320x170 landscape panel.
//!
//! ```text
//! +--------------------------------------------------------------+
//! | [=========== speed slider ===========]                  (o)  |
//! |                                                               |
//! |  [ MODE ]          125            12.3 km                     |
//! |                                                               |
//! |  BAT [======= battery bar =======]   66%                      |
//! |  RNG [======= range slider ======]   12.6V                    |
//! +--------------------------------------------------------------+
//! ```

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use gaugelink_core::gauge::RIDE_MODE_COUNT;

/// Panel width in landscape orientation
pub const SCREEN_WIDTH: u32 = 320;

/// Panel height in landscape orientation
pub const SCREEN_HEIGHT: u32 = 170;

/// Default ride-mode names, slowest band first
pub const RIDE_MODES: [&str; RIDE_MODE_COUNT] = ["ECO", "CITY", "SPORT", "RACE"];

/// Full-scale values of the progress widgets
pub const SPEED_MAX: i32 = 250;
pub const BATTERY_MAX: i32 = 100;
pub const RANGE_MAX: i32 = 70;

// Link dot: 8x8, 6 px in from the top-right corner
pub const LINK_DOT_DIAMETER: u32 = 8;
pub const LINK_DOT_ORIGIN: Point = Point::new((SCREEN_WIDTH - 6 - LINK_DOT_DIAMETER) as i32, 6);

pub const SPEED_SLIDER: Rectangle = Rectangle::new(Point::new(10, 14), Size::new(280, 14));

pub const RIDE_MODE_BOX: Rectangle = Rectangle::new(Point::new(10, 48), Size::new(72, 28));
pub const SPEED_LABEL: Rectangle = Rectangle::new(Point::new(110, 46), Size::new(80, 32));
pub const TRIP_LABEL: Rectangle = Rectangle::new(Point::new(210, 52), Size::new(72, 20));
pub const TRIP_UNIT: Point = Point::new(284, 62);

pub const BATTERY_CAPTION: Point = Point::new(10, 106);
pub const BATTERY_BAR: Rectangle = Rectangle::new(Point::new(40, 98), Size::new(180, 16));
pub const BATTERY_LABEL: Rectangle = Rectangle::new(Point::new(230, 96), Size::new(80, 20));

pub const RANGE_CAPTION: Point = Point::new(10, 140);
pub const RANGE_SLIDER: Rectangle = Rectangle::new(Point::new(40, 133), Size::new(180, 14));
pub const VOLTAGE_LABEL: Rectangle = Rectangle::new(Point::new(230, 130), Size::new(80, 20));

/// Palette
pub const BACKGROUND: Rgb565 = Rgb565::BLACK;
pub const TEXT: Rgb565 = Rgb565::WHITE;
pub const CAPTION: Rgb565 = Rgb565::CSS_GRAY;
pub const TRACK: Rgb565 = Rgb565::CSS_DIM_GRAY;
pub const SPEED_FILL: Rgb565 = Rgb565::CSS_DEEP_SKY_BLUE;
pub const BATTERY_FILL: Rgb565 = Rgb565::CSS_LIME_GREEN;
pub const RANGE_FILL: Rgb565 = Rgb565::CSS_ORANGE;
pub const MODE_FILL: Rgb565 = Rgb565::CSS_DARK_SLATE_GRAY;

#[cfg(test)]
mod tests {
    use super::*;

    const WIDGETS: [Rectangle; 8] = [
        SPEED_SLIDER,
        RIDE_MODE_BOX,
        SPEED_LABEL,
        TRIP_LABEL,
        BATTERY_BAR,
        BATTERY_LABEL,
        RANGE_SLIDER,
        VOLTAGE_LABEL,
    ];

    #[test]
    fn test_widgets_fit_on_screen() {
        let screen = Rectangle::new(Point::zero(), Size::new(SCREEN_WIDTH, SCREEN_HEIGHT));
        for widget in WIDGETS {
            assert_eq!(screen.intersection(&widget), widget);
        }
        assert_eq!(LINK_DOT_ORIGIN, Point::new(306, 6));
    }

    #[test]
    fn test_widgets_do_not_overlap() {
        for (i, a) in WIDGETS.iter().enumerate() {
            for b in WIDGETS.iter().skip(i + 1) {
                assert!(a.intersection(b).is_zero_sized(), "{:?} overlaps {:?}", a, b);
            }
        }
    }
}
