//! Widget drawing
//!
//! Each widget repaints its whole box on every update, background first, so
//! no stale pixels survive a shorter value.

use embedded_graphics::mono_font::ascii::{FONT_10X20, FONT_6X10, FONT_9X15};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, PrimitiveStyle, Rectangle, RoundedRectangle};
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyle, TextStyleBuilder};

use crate::layout::{BACKGROUND, CAPTION, MODE_FILL, TEXT, TRACK};

/// Large numeric readout
pub const VALUE_FONT: &MonoFont<'static> = &FONT_10X20;
/// Secondary labels
pub const LABEL_FONT: &MonoFont<'static> = &FONT_9X15;
/// Static captions
pub const CAPTION_FONT: &MonoFont<'static> = &FONT_6X10;

const CENTERED: TextStyle = TextStyleBuilder::new()
    .alignment(Alignment::Center)
    .baseline(Baseline::Middle)
    .build();

const LEFT: TextStyle = TextStyleBuilder::new()
    .alignment(Alignment::Left)
    .baseline(Baseline::Middle)
    .build();

/// How a progress widget is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProgressKind {
    /// Filled track with a knob at the current value
    Slider,
    /// Filled track only
    Bar,
}

/// Characters of `font` that fit across `area`
pub fn text_capacity(area: &Rectangle, font: &MonoFont<'_>) -> usize {
    let advance = font.character_size.width + font.character_spacing;
    if advance == 0 {
        return 0;
    }
    (area.size.width / advance) as usize
}

/// Width of the filled part of a progress widget
///
/// `value` is clamped to `0..=max`.
pub fn fill_width(area: &Rectangle, value: i32, max: i32) -> u32 {
    if max <= 0 {
        return 0;
    }
    let value = value.clamp(0, max) as u32;
    area.size.width * value / max as u32
}

/// Draw a horizontal progress widget
pub fn draw_progress<D>(
    target: &mut D,
    area: Rectangle,
    value: i32,
    max: i32,
    fill: Rgb565,
    kind: ProgressKind,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    target.fill_solid(&area, TRACK)?;

    let width = fill_width(&area, value, max);
    if width > 0 {
        let filled = Rectangle::new(area.top_left, Size::new(width, area.size.height));
        target.fill_solid(&filled, fill)?;
    }

    if kind == ProgressKind::Slider {
        // Knob straddles the end of the fill, kept inside the track
        let knob_width = 4;
        let x = (area.top_left.x + width as i32 - knob_width / 2)
            .clamp(area.top_left.x, area.top_left.x + area.size.width as i32 - knob_width);
        let knob = Rectangle::new(
            Point::new(x, area.top_left.y),
            Size::new(knob_width as u32, area.size.height),
        );
        target.fill_solid(&knob, TEXT)?;
    }

    Ok(())
}

/// Clear a label box and draw `text` centered in it
pub fn draw_label<D>(
    target: &mut D,
    area: Rectangle,
    text: &str,
    font: &MonoFont<'_>,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    target.fill_solid(&area, BACKGROUND)?;
    let style = MonoTextStyle::new(font, TEXT);
    Text::with_text_style(text, area.center(), style, CENTERED).draw(target)?;
    Ok(())
}

/// Draw a static caption with its left edge at `position`
pub fn draw_caption<D>(target: &mut D, position: Point, text: &str) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let style = MonoTextStyle::new(CAPTION_FONT, CAPTION);
    Text::with_text_style(text, position, style, LEFT).draw(target)?;
    Ok(())
}

/// Draw the selected entry of a roller in a rounded box
pub fn draw_roller<D>(target: &mut D, area: Rectangle, entry: &str) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    target.fill_solid(&area, BACKGROUND)?;
    RoundedRectangle::with_equal_corners(area, Size::new(6, 6))
        .into_styled(PrimitiveStyle::with_fill(MODE_FILL))
        .draw(target)?;
    let style = MonoTextStyle::new(LABEL_FONT, TEXT);
    Text::with_text_style(entry, area.center(), style, CENTERED).draw(target)?;
    Ok(())
}

/// Draw a solid status dot
pub fn draw_dot<D>(target: &mut D, origin: Point, diameter: u32, color: Rgb565) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    Circle::new(origin, diameter)
        .into_styled(PrimitiveStyle::with_fill(color))
        .draw(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_width() {
        let area = Rectangle::new(Point::zero(), Size::new(200, 10));
        assert_eq!(fill_width(&area, 0, 100), 0);
        assert_eq!(fill_width(&area, 50, 100), 100);
        assert_eq!(fill_width(&area, 100, 100), 200);
        assert_eq!(fill_width(&area, 150, 100), 200);
        assert_eq!(fill_width(&area, -5, 100), 0);
        assert_eq!(fill_width(&area, 5, 0), 0);
    }

    #[test]
    fn test_text_capacity() {
        let area = Rectangle::new(Point::zero(), Size::new(80, 20));
        assert_eq!(text_capacity(&area, VALUE_FONT), 8);
        assert_eq!(text_capacity(&area, LABEL_FONT), 8);
        assert_eq!(text_capacity(&area, CAPTION_FONT), 13);
    }
}
