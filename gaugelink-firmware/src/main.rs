//! GaugeLink - Wireless Vehicle Dashboard Firmware
//!
//! Main firmware binary for an RP2040 driving a 320x170 ST7789 panel.
//! Telemetry arrives from a vehicle-side sender through a radio bridge
//! module on UART0; the dashboard task turns the newest packet into gauges.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::peripherals::UART0;
use embassy_rp::spi::{Config as SpiConfig, Spi};
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use static_cell::{ConstStaticCell, StaticCell};
use {defmt_rtt as _, panic_probe as _};

use gaugelink_display::{FrameBuffer, SCREEN_HEIGHT, SCREEN_WIDTH};

use crate::config::{parse_config, FirmwareConfig};
use crate::st7789::St7789;

/// Embedded configuration (compiled into firmware)
/// Edit dashboard.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../dashboard.toml");

/// SPI clock for the panel
const PANEL_SPI_HZ: u32 = 62_500_000;

const FRAME_PIXELS: usize = (SCREEN_WIDTH * SCREEN_HEIGHT) as usize;

mod channels;
mod config;
mod st7789;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 64]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

// RGB565 framebuffer for the whole screen
static FRAME: ConstStaticCell<[u16; FRAME_PIXELS]> = ConstStaticCell::new([0; FRAME_PIXELS]);

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("GaugeLink firmware starting...");

    // Initialize RP2040 peripherals
    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = load_config();

    // Panel power and backlight
    // Pin assignments are board-specific (LCD_POWER: GPIO22, BL: GPIO21)
    let _power = Output::new(p.PIN_22, Level::High);
    let _backlight = Output::new(p.PIN_21, Level::High);

    // Setup SPI0 for the panel (SCK: GPIO18, MOSI: GPIO19)
    let mut spi_config = SpiConfig::default();
    spi_config.frequency = PANEL_SPI_HZ;
    let spi = Spi::new_txonly(p.SPI0, p.PIN_18, p.PIN_19, p.DMA_CH0, spi_config);

    let dc = Output::new(p.PIN_16, Level::Low);
    let cs = Output::new(p.PIN_17, Level::High);
    let rst = Output::new(p.PIN_20, Level::High);

    let mut panel = St7789::new(spi, dc, cs, rst, config.display);
    match panel.init().await {
        Ok(()) => info!("Panel initialized"),
        Err(e) => error!("Panel init failed: {:?}", e),
    }

    let frame = FrameBuffer::new(FRAME.take(), SCREEN_WIDTH, SCREEN_HEIGHT).unwrap();

    // Setup UART for the radio bridge
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = config.radio.baud;

    let tx_buf = TX_BUF.init([0u8; 64]);
    let rx_buf = RX_BUF.init([0u8; 256]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (_tx, rx) = uart.split();

    info!("UART initialized for radio bridge at {} baud", config.radio.baud);

    // Spawn tasks
    spawner.spawn(tasks::radio_rx_task(rx)).unwrap();
    spawner
        .spawn(tasks::dashboard_task(config, panel, frame))
        .unwrap();

    info!("All tasks spawned, firmware running");

    // Main task has nothing else to do - all work happens in spawned tasks
    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}

/// Parse the embedded configuration
///
/// build.rs already validated dashboard.toml, so failure here means the
/// runtime parser and the build check disagree. Fall back to built-in
/// defaults rather than refusing to boot.
fn load_config() -> FirmwareConfig {
    match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!("Parsed embedded configuration successfully");
            config
        }
        Err(e) => {
            error!("Failed to parse embedded config: {:?}", e);
            error!("Using built-in defaults");
            FirmwareConfig::default()
        }
    }
}
