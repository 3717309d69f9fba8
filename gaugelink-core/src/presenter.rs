//! Dashboard presenter
//!
//! Runs once per tick of the consumer loop. The link indicator is refreshed
//! on every tick; the data-derived widgets are only written when the mailbox
//! holds a record that has not been shown yet, otherwise they keep whatever
//! they showed last.

use embassy_sync::blocking_mutex::raw::RawMutex;

use crate::config::DashboardConfig;
use crate::link::{LinkMonitor, LinkState};
use crate::mailbox::TelemetryMailbox;
use crate::model::DashboardModel;
use crate::traits::{Gauge, Indicator, Label, RenderSurface, Selector, SurfaceError};
use crate::trip::TripAccumulator;

/// What happened during one tick
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickOutcome {
    /// Link health as evaluated this tick
    pub link: LinkState,
    /// Link health differs from the previous tick
    pub link_changed: bool,
    /// Values pushed to the surface, if a new record was shown
    pub model: Option<DashboardModel>,
    /// Number of surface writes that failed
    pub render_errors: u8,
    /// Most recent surface error
    pub last_error: Option<SurfaceError>,
}

impl TickOutcome {
    /// Whether the data-derived widgets were written
    pub fn updated(&self) -> bool {
        self.model.is_some()
    }
}

/// Failed writes are tallied and the tick moves on
#[derive(Default)]
struct ErrorTally {
    count: u8,
    last: Option<SurfaceError>,
}

impl ErrorTally {
    fn note(&mut self, result: Result<(), SurfaceError>) {
        if let Err(e) = result {
            self.count = self.count.saturating_add(1);
            self.last = Some(e);
        }
    }
}

/// Owns the per-process dashboard state and drives the rendering surface
pub struct Dashboard {
    config: DashboardConfig,
    link: LinkMonitor,
    trip: TripAccumulator,
}

impl Dashboard {
    /// Create a dashboard with an empty trip and the link down
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            link: LinkMonitor::new(config.link),
            trip: TripAccumulator::new(),
            config,
        }
    }

    /// Link health as of the last tick
    pub fn link_state(&self) -> LinkState {
        self.link.state()
    }

    /// Distance covered so far
    pub fn trip_km(&self) -> f32 {
        self.trip.distance_km()
    }

    /// Run one tick
    ///
    /// 1. Evaluate link health and paint the indicator.
    /// 2. If the mailbox has a new record, take it, advance the trip odometer
    ///    with its speed and write every widget in display order.
    ///
    /// Surface errors are counted in the returned outcome and never cut the
    /// tick short.
    pub fn tick<M, S>(
        &mut self,
        now_ms: u32,
        mailbox: &TelemetryMailbox<M>,
        surface: &mut S,
    ) -> TickOutcome
    where
        M: RawMutex,
        S: RenderSurface + ?Sized,
    {
        let mut errors = ErrorTally::default();

        let (link, link_changed) = self.link.update(now_ms, mailbox.last_receipt_ms());
        errors.note(surface.set_background(Indicator::Link, self.link.color(link)));

        let model = mailbox.take().map(|record| {
            let speed = DashboardModel::speed_for(&record, &self.config);
            let trip_km = self.trip.integrate(now_ms, f32::from(speed));
            let model = DashboardModel::derive(&record, trip_km, &self.config);
            Self::render(&model, surface, &mut errors);
            model
        });

        TickOutcome {
            link,
            link_changed,
            model,
            render_errors: errors.count,
            last_error: errors.last,
        }
    }

    fn render<S: RenderSurface + ?Sized>(
        model: &DashboardModel,
        surface: &mut S,
        errors: &mut ErrorTally,
    ) {
        errors.note(surface.set_value(Gauge::Speed, i32::from(model.speed)));
        errors.note(surface.set_text(Label::Speed, &model.speed_text()));
        errors.note(surface.set_selected(Selector::RideMode, u16::from(model.ride_mode.index())));
        errors.note(surface.set_text(Label::Trip, &model.trip_text()));
        errors.note(surface.set_value(Gauge::Battery, i32::from(model.battery_percent)));
        errors.note(surface.set_text(Label::BatteryPercent, &model.battery_text()));
        errors.note(surface.set_text(Label::Voltage, &model.voltage_text()));
        errors.note(surface.set_value(Gauge::Range, i32::from(model.range_level)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::Color;
    use crate::TelemetryRecord;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;

    const GREEN: Color = Color::from_hex(0x00FF00);
    const RED: Color = Color::from_hex(0xFF0000);

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Value(Gauge, i32),
        Text(Label, String),
        Selected(Selector, u16),
        Background(Indicator, Color),
    }

    /// Mock surface that records every call
    #[derive(Default)]
    struct MockSurface {
        calls: Vec<Call>,
        fail_text: bool,
    }

    impl MockSurface {
        fn drain(&mut self) -> Vec<Call> {
            core::mem::take(&mut self.calls)
        }
    }

    impl RenderSurface for MockSurface {
        fn set_value(&mut self, gauge: Gauge, value: i32) -> Result<(), SurfaceError> {
            self.calls.push(Call::Value(gauge, value));
            Ok(())
        }

        fn set_text(&mut self, label: Label, text: &str) -> Result<(), SurfaceError> {
            self.calls.push(Call::Text(label, text.to_string()));
            if self.fail_text {
                Err(SurfaceError::TextTooLong)
            } else {
                Ok(())
            }
        }

        fn set_selected(&mut self, selector: Selector, index: u16) -> Result<(), SurfaceError> {
            self.calls.push(Call::Selected(selector, index));
            Ok(())
        }

        fn set_background(&mut self, indicator: Indicator, color: Color) -> Result<(), SurfaceError> {
            self.calls.push(Call::Background(indicator, color));
            Ok(())
        }
    }

    fn record(rpm: u16, volts: f32) -> TelemetryRecord {
        TelemetryRecord {
            rpm,
            battery_volts: volts,
            ..TelemetryRecord::ZERO
        }
    }

    fn setup() -> (Dashboard, TelemetryMailbox<NoopRawMutex>, MockSurface) {
        (
            Dashboard::new(DashboardConfig::default()),
            TelemetryMailbox::new(),
            MockSurface::default(),
        )
    }

    #[test]
    fn test_startup_shows_link_down_only() {
        let (mut dashboard, mailbox, mut surface) = setup();

        let outcome = dashboard.tick(500, &mailbox, &mut surface);

        assert_eq!(outcome.link, LinkState::Down);
        assert!(!outcome.link_changed);
        assert!(!outcome.updated());
        assert_eq!(surface.drain(), vec![Call::Background(Indicator::Link, RED)]);
    }

    #[test]
    fn test_update_writes_every_widget_in_order() {
        let (mut dashboard, mailbox, mut surface) = setup();
        mailbox.store(record(4000, 12.6), 100);

        let outcome = dashboard.tick(105, &mailbox, &mut surface);

        assert_eq!(outcome.link, LinkState::Up);
        assert!(outcome.link_changed);
        assert_eq!(outcome.render_errors, 0);
        assert_eq!(
            surface.drain(),
            vec![
                Call::Background(Indicator::Link, GREEN),
                Call::Value(Gauge::Speed, 125),
                Call::Text(Label::Speed, "125".to_string()),
                Call::Selected(Selector::RideMode, 2),
                Call::Text(Label::Trip, "0.0 ".to_string()),
                Call::Value(Gauge::Battery, 65),
                Call::Text(Label::BatteryPercent, "65%".to_string()),
                Call::Text(Label::Voltage, "12.6V".to_string()),
                Call::Value(Gauge::Range, 45),
            ]
        );
    }

    #[test]
    fn test_second_tick_without_data_only_refreshes_link() {
        let (mut dashboard, mailbox, mut surface) = setup();
        mailbox.store(record(2000, 12.0), 0);

        dashboard.tick(5, &mailbox, &mut surface);
        surface.drain();

        let outcome = dashboard.tick(10, &mailbox, &mut surface);
        assert!(!outcome.updated());
        assert_eq!(surface.drain(), vec![Call::Background(Indicator::Link, GREEN)]);
    }

    #[test]
    fn test_link_drops_after_timeout() {
        let (mut dashboard, mailbox, mut surface) = setup();
        mailbox.store(record(0, 12.0), 100);

        assert_eq!(dashboard.tick(1099, &mailbox, &mut surface).link, LinkState::Up);
        surface.drain();

        let outcome = dashboard.tick(1100, &mailbox, &mut surface);
        assert_eq!(outcome.link, LinkState::Down);
        assert!(outcome.link_changed);
        assert_eq!(dashboard.link_state(), LinkState::Down);
        assert_eq!(surface.drain(), vec![Call::Background(Indicator::Link, RED)]);
    }

    #[test]
    fn test_trip_integrates_between_updates() {
        let (mut dashboard, mailbox, mut surface) = setup();
        const HOUR_MS: u32 = 3_600_000;

        // 1920 rpm is 60 speed units
        mailbox.store(record(1920, 12.0), 0);
        dashboard.tick(0, &mailbox, &mut surface);
        assert_eq!(dashboard.trip_km(), 0.0);

        mailbox.store(record(1920, 12.0), HOUR_MS);
        surface.drain();
        let outcome = dashboard.tick(HOUR_MS, &mailbox, &mut surface);

        assert!((dashboard.trip_km() - 60.0).abs() < 1e-3);
        let model = outcome.model.unwrap();
        assert_eq!(model.trip_text().as_str(), "60.0 ");
        assert!(surface
            .drain()
            .contains(&Call::Text(Label::Trip, "60.0 ".to_string())));
    }

    #[test]
    fn test_ticks_without_data_do_not_advance_trip() {
        let (mut dashboard, mailbox, mut surface) = setup();
        mailbox.store(record(3200, 12.0), 0);
        dashboard.tick(0, &mailbox, &mut surface);

        for now in (5..100_000).step_by(5) {
            dashboard.tick(now, &mailbox, &mut surface);
        }
        assert_eq!(dashboard.trip_km(), 0.0);
    }

    #[test]
    fn test_only_newest_record_is_shown() {
        let (mut dashboard, mailbox, mut surface) = setup();
        mailbox.store(record(320, 12.0), 10);
        mailbox.store(record(6400, 12.0), 20);

        let outcome = dashboard.tick(25, &mailbox, &mut surface);
        assert_eq!(outcome.model.map(|m| m.speed), Some(200));
        assert_eq!(outcome.model.map(|m| m.ride_mode.index()), Some(3));
    }

    #[test]
    fn test_render_errors_do_not_abort_tick() {
        let (mut dashboard, mailbox, mut surface) = setup();
        surface.fail_text = true;
        mailbox.store(record(4000, 13.0), 0);

        let outcome = dashboard.tick(1, &mailbox, &mut surface);

        assert_eq!(outcome.render_errors, 4);
        assert_eq!(outcome.last_error, Some(SurfaceError::TextTooLong));
        let calls = surface.drain();
        assert_eq!(calls.len(), 9);
        assert_eq!(calls.last(), Some(&Call::Value(Gauge::Range, 52)));
    }

    #[test]
    fn test_malformed_packet_changes_nothing() {
        let (mut dashboard, mailbox, mut surface) = setup();
        assert!(mailbox.publish(&[0u8; 10], 0).is_err());

        let outcome = dashboard.tick(5, &mailbox, &mut surface);
        assert_eq!(outcome.link, LinkState::Down);
        assert!(!outcome.updated());
        assert_eq!(mailbox.stats().dropped, 1);
    }
}
