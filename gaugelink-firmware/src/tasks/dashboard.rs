//! Dashboard task
//!
//! The consumer loop: flush what changed to the panel, sleep one tick
//! interval, then run the presenter against the telemetry mailbox.

use defmt::*;
use embassy_rp::gpio::Output;
use embassy_rp::peripherals::SPI0;
use embassy_rp::spi::{Async, Spi};
use embassy_time::Timer;

use gaugelink_core::presenter::{Dashboard, TickOutcome};
use gaugelink_display::{FrameBuffer, GaugeSurface};

use crate::channels::{now_ms, RadioStatus, RADIO_STATUS, TELEMETRY};
use crate::config::FirmwareConfig;
use crate::st7789::St7789;

/// Concrete panel type on this board
pub type Panel = St7789<Spi<'static, SPI0, Async>, Output<'static>, Output<'static>, Output<'static>>;

/// Dashboard task - owns the surface, the panel and all dashboard state
#[embassy_executor::task]
pub async fn dashboard_task(config: FirmwareConfig, mut panel: Panel, frame: FrameBuffer<'static>) {
    info!("Dashboard task started");

    let mut surface = GaugeSurface::new(frame);
    if let Err(e) = surface.draw_chrome() {
        warn!("Failed to draw dashboard chrome: {:?}", e);
    }

    let mut dashboard = Dashboard::new(config.dashboard);
    let mut dropped = TELEMETRY.stats().dropped;

    loop {
        // Push the previous tick's changes before sleeping
        let frame = surface.target_mut();
        if let Some(area) = frame.take_dirty() {
            if let Err(e) = panel.flush_region(&area, frame).await {
                warn!("Panel flush failed: {:?}", e);
                frame.mark_all_dirty();
            }
        }

        Timer::after_millis(u64::from(config.tick.interval_ms)).await;

        let outcome = dashboard.tick(now_ms(), &TELEMETRY, &mut surface);
        report_tick(&outcome);

        let stats = TELEMETRY.stats();
        if stats.dropped != dropped {
            warn!(
                "Dropped {} malformed packet(s) ({} accepted so far)",
                stats.dropped.wrapping_sub(dropped),
                stats.accepted
            );
            dropped = stats.dropped;
        }

        if let Some(status) = RADIO_STATUS.try_take() {
            report_radio(status);
        }
    }
}

fn report_tick(outcome: &TickOutcome) {
    if outcome.link_changed {
        if outcome.link.is_up() {
            info!("Link up");
        } else {
            let last = TELEMETRY.peek();
            warn!(
                "Link lost, holding rpm={} batt={}V",
                last.rpm, last.battery_volts
            );
        }
    }

    if let Some(model) = &outcome.model {
        trace!(
            "speed={} mode={} trip={} bat={}%",
            model.speed,
            model.ride_mode.index(),
            model.trip_km,
            model.battery_percent
        );
    }

    if let Some(e) = outcome.last_error {
        warn!("{} widget update(s) failed, last: {:?}", outcome.render_errors, e);
    }
}

fn report_radio(status: RadioStatus) {
    match status {
        RadioStatus::Ready(mac) => info!("Radio bridge ready, station MAC {}", mac),
        RadioStatus::MacUnavailable => warn!("Radio bridge ready, station MAC unavailable"),
        RadioStatus::InitFailed(code) => {
            error!("Radio bridge init failed (code {}), receive disabled", code)
        }
    }
}
