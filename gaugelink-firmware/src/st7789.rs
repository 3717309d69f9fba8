//! ST7789 TFT Display Driver
//!
//! Driver for the 320x170 ST7789 IPS panel over a write-only SPI bus.
//! Pixels are RGB565; the firmware renders into a `FrameBuffer` and this
//! driver copies rectangles of it to the panel.

use embassy_time::Timer;
use embedded_graphics::geometry::Dimensions;
use embedded_graphics::primitives::Rectangle;
use embedded_hal::digital::OutputPin;
use embedded_hal_async::spi::SpiBus;

use gaugelink_display::FrameBuffer;

use crate::config::PanelConfig;

/// Widest row we ever send, in pixels
const MAX_ROW: usize = 320;

/// ST7789 commands
#[allow(dead_code)]
mod cmd {
    pub const SWRESET: u8 = 0x01;
    pub const SLPOUT: u8 = 0x11;
    pub const NORON: u8 = 0x13;
    pub const INVOFF: u8 = 0x20;
    pub const INVON: u8 = 0x21;
    pub const DISPOFF: u8 = 0x28;
    pub const DISPON: u8 = 0x29;
    pub const CASET: u8 = 0x2A;
    pub const RASET: u8 = 0x2B;
    pub const RAMWR: u8 = 0x2C;
    pub const MADCTL: u8 = 0x36;
    pub const COLMOD: u8 = 0x3A;
}

/// 16 bits per pixel
const COLMOD_RGB565: u8 = 0x55;

/// Driver error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// SPI transfer failed
    Spi,
    /// A control pin could not be driven
    Pin,
}

/// Memory access control value for a rotation in quarter turns
pub fn madctl(rotation: u8) -> u8 {
    match rotation & 0x03 {
        0 => 0x00,
        1 => 0x60,
        2 => 0xC0,
        _ => 0xA0,
    }
}

/// ST7789 panel driver
pub struct St7789<SPI, DC, CS, RST> {
    spi: SPI,
    dc: DC,
    cs: CS,
    rst: RST,
    panel: PanelConfig,
}

impl<SPI, DC, CS, RST> St7789<SPI, DC, CS, RST>
where
    SPI: SpiBus<u8>,
    DC: OutputPin,
    CS: OutputPin,
    RST: OutputPin,
{
    /// Create a new ST7789 driver
    pub fn new(spi: SPI, dc: DC, cs: CS, rst: RST, panel: PanelConfig) -> Self {
        Self {
            spi,
            dc,
            cs,
            rst,
            panel,
        }
    }

    /// Reset and initialize the panel
    pub async fn init(&mut self) -> Result<(), Error> {
        self.cs.set_high().map_err(|_| Error::Pin)?;

        // Hardware reset
        self.rst.set_high().map_err(|_| Error::Pin)?;
        Timer::after_millis(10).await;
        self.rst.set_low().map_err(|_| Error::Pin)?;
        Timer::after_millis(10).await;
        self.rst.set_high().map_err(|_| Error::Pin)?;
        Timer::after_millis(120).await;

        self.command(cmd::SWRESET, &[]).await?;
        Timer::after_millis(150).await;
        self.command(cmd::SLPOUT, &[]).await?;
        Timer::after_millis(120).await;

        self.command(cmd::COLMOD, &[COLMOD_RGB565]).await?;
        self.command(cmd::MADCTL, &[madctl(self.panel.rotation)]).await?;
        let inversion = if self.panel.invert {
            cmd::INVON
        } else {
            cmd::INVOFF
        };
        self.command(inversion, &[]).await?;
        self.command(cmd::NORON, &[]).await?;
        Timer::after_millis(10).await;
        self.command(cmd::DISPON, &[]).await?;
        Timer::after_millis(10).await;

        Ok(())
    }

    /// Copy `area` of the framebuffer to the same place on the panel
    pub async fn flush_region(&mut self, area: &Rectangle, frame: &FrameBuffer<'_>) -> Result<(), Error> {
        let area = &area.intersection(&frame.bounding_box());
        let width = area.size.width as usize;
        if width == 0 || width > MAX_ROW || area.size.height == 0 {
            return Ok(());
        }

        self.set_window(area).await?;
        self.command(cmd::RAMWR, &[]).await?;

        self.dc.set_high().map_err(|_| Error::Pin)?;
        self.cs.set_low().map_err(|_| Error::Pin)?;

        let mut bytes = [0u8; MAX_ROW * 2];
        let mut result = Ok(());
        for y in area.rows() {
            let row = frame.row(area, y);
            // Panel expects big-endian RGB565
            for (chunk, pixel) in bytes.chunks_exact_mut(2).zip(row) {
                chunk.copy_from_slice(&pixel.to_be_bytes());
            }
            result = self.spi.write(&bytes[..row.len() * 2]).await;
            if result.is_err() {
                break;
            }
        }
        let flushed = self.spi.flush().await;

        self.cs.set_high().map_err(|_| Error::Pin)?;
        result.and(flushed).map_err(|_| Error::Spi)
    }

    /// Set the controller's address window to `area`
    async fn set_window(&mut self, area: &Rectangle) -> Result<(), Error> {
        let x0 = area.top_left.x as u16 + self.panel.x_offset;
        let y0 = area.top_left.y as u16 + self.panel.y_offset;
        let x1 = x0 + area.size.width as u16 - 1;
        let y1 = y0 + area.size.height as u16 - 1;

        let [x0h, x0l] = x0.to_be_bytes();
        let [x1h, x1l] = x1.to_be_bytes();
        let [y0h, y0l] = y0.to_be_bytes();
        let [y1h, y1l] = y1.to_be_bytes();

        self.command(cmd::CASET, &[x0h, x0l, x1h, x1l]).await?;
        self.command(cmd::RASET, &[y0h, y0l, y1h, y1l]).await
    }

    /// Send a command byte followed by its parameters
    async fn command(&mut self, command: u8, params: &[u8]) -> Result<(), Error> {
        self.cs.set_low().map_err(|_| Error::Pin)?;

        self.dc.set_low().map_err(|_| Error::Pin)?;
        let mut result = self.spi.write(&[command]).await;
        if result.is_ok() {
            result = self.spi.flush().await;
        }

        if result.is_ok() && !params.is_empty() {
            self.dc.set_high().map_err(|_| Error::Pin)?;
            result = self.spi.write(params).await;
            if result.is_ok() {
                result = self.spi.flush().await;
            }
        }

        self.cs.set_high().map_err(|_| Error::Pin)?;
        result.map_err(|_| Error::Spi)
    }
}
