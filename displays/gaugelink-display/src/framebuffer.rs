//! RGB565 framebuffer
//!
//! Widgets are drawn here instead of straight to the panel. The buffer keeps
//! the bounding box of every pixel written since the last `take_dirty`, so
//! the flush after a tick only has to push the region that changed.

use core::convert::Infallible;

use embedded_graphics::pixelcolor::raw::RawU16;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

/// In-memory RGB565 draw target with dirty-region tracking
pub struct FrameBuffer<'a> {
    pixels: &'a mut [u16],
    width: u32,
    height: u32,
    dirty: Option<Rectangle>,
}

impl<'a> FrameBuffer<'a> {
    /// Wrap a pixel buffer of `width * height` entries, row-major
    ///
    /// Returns `None` if the buffer length does not match.
    pub fn new(pixels: &'a mut [u16], width: u32, height: u32) -> Option<Self> {
        if pixels.len() != (width as usize) * (height as usize) {
            return None;
        }
        Some(Self {
            pixels,
            width,
            height,
            dirty: None,
        })
    }

    /// Take the changed region, leaving the buffer clean
    pub fn take_dirty(&mut self) -> Option<Rectangle> {
        self.dirty.take()
    }

    /// Mark the whole screen as changed (e.g. after a panel reset)
    pub fn mark_all_dirty(&mut self) {
        self.dirty = Some(self.bounding_box());
    }

    /// Color at a position
    pub fn pixel(&self, point: Point) -> Option<Rgb565> {
        self.index(point)
            .map(|i| Rgb565::from(RawU16::new(self.pixels[i])))
    }

    /// Raw pixels of row `y` between the columns of `area`
    ///
    /// `area` is clipped to the screen; rows outside it give an empty slice.
    pub fn row(&self, area: &Rectangle, y: i32) -> &[u16] {
        let area = area.intersection(&self.bounding_box());
        if area.is_zero_sized() || !area.rows().contains(&y) {
            return &[];
        }
        let start = y as usize * self.width as usize + area.top_left.x as usize;
        &self.pixels[start..start + area.size.width as usize]
    }

    fn index(&self, point: Point) -> Option<usize> {
        if point.x < 0 || point.y < 0 {
            return None;
        }
        let (x, y) = (point.x as u32, point.y as u32);
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    fn mark(&mut self, area: Rectangle) {
        let Some(bottom_right) = area.bottom_right() else {
            return;
        };
        self.dirty = Some(match self.dirty {
            None => area,
            Some(current) => {
                // A non-empty dirty box always has a bottom-right corner
                let current_br = current.bottom_right().unwrap_or(current.top_left);
                Rectangle::with_corners(
                    Point::new(
                        current.top_left.x.min(area.top_left.x),
                        current.top_left.y.min(area.top_left.y),
                    ),
                    Point::new(
                        current_br.x.max(bottom_right.x),
                        current_br.y.max(bottom_right.y),
                    ),
                )
            }
        });
    }
}

impl OriginDimensions for FrameBuffer<'_> {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl DrawTarget for FrameBuffer<'_> {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if let Some(i) = self.index(point) {
                self.pixels[i] = color.into_storage();
                self.mark(Rectangle::new(point, Size::new(1, 1)));
            }
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let area = area.intersection(&self.bounding_box());
        if area.is_zero_sized() {
            return Ok(());
        }
        let raw = color.into_storage();
        let width = self.width as usize;
        for y in area.rows() {
            let start = y as usize * width + area.top_left.x as usize;
            self.pixels[start..start + area.size.width as usize].fill(raw);
        }
        self.mark(area);
        Ok(())
    }
}
