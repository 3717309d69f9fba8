//! Link health monitoring
//!
//! The link is up while the newest valid packet is younger than the
//! configured timeout. There is no hysteresis: the state follows packet
//! recency on every tick and may flap near the boundary.

use crate::config::LinkConfig;
use crate::traits::Color;

/// Link health
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkState {
    /// A packet arrived within the timeout
    Up,
    /// No packet yet, or the newest one is too old
    Down,
}

impl LinkState {
    pub fn is_up(self) -> bool {
        self == LinkState::Up
    }
}

/// Decide link health from the last receipt time
///
/// `last_receipt_ms` is `None` until the first valid packet, which always
/// reads as down. Timestamps are wrapping milliseconds.
pub fn link_state(now_ms: u32, last_receipt_ms: Option<u32>, timeout_ms: u32) -> LinkState {
    match last_receipt_ms {
        Some(last) if now_ms.wrapping_sub(last) < timeout_ms => LinkState::Up,
        _ => LinkState::Down,
    }
}

/// Link health monitor
///
/// Evaluated once per tick. Remembers the previous state only so callers
/// can report transitions; the state itself is recomputed every time.
#[derive(Debug, Clone)]
pub struct LinkMonitor {
    config: LinkConfig,
    state: LinkState,
}

impl LinkMonitor {
    /// Create a monitor; the link starts down
    pub fn new(config: LinkConfig) -> Self {
        Self {
            config,
            state: LinkState::Down,
        }
    }

    /// Recompute link health
    ///
    /// Returns the new state and whether it differs from the previous one.
    pub fn update(&mut self, now_ms: u32, last_receipt_ms: Option<u32>) -> (LinkState, bool) {
        let state = link_state(now_ms, last_receipt_ms, self.config.timeout_ms);
        let changed = state != self.state;
        self.state = state;
        (state, changed)
    }

    /// State from the most recent update
    pub fn state(&self) -> LinkState {
        self.state
    }

    /// Indicator color for a state
    pub fn color(&self, state: LinkState) -> Color {
        match state {
            LinkState::Up => self.config.connected_color,
            LinkState::Down => self.config.disconnected_color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIMEOUT: u32 = 1000;

    #[test]
    fn test_down_before_first_packet() {
        assert_eq!(link_state(0, None, TIMEOUT), LinkState::Down);
        assert_eq!(link_state(500, None, TIMEOUT), LinkState::Down);
        assert_eq!(link_state(u32::MAX, None, TIMEOUT), LinkState::Down);
    }

    #[test]
    fn test_timeout_is_strict() {
        assert_eq!(link_state(5999, Some(5000), TIMEOUT), LinkState::Up);
        assert_eq!(link_state(6000, Some(5000), TIMEOUT), LinkState::Down);
        assert_eq!(link_state(5000, Some(5000), TIMEOUT), LinkState::Up);
    }

    #[test]
    fn test_timestamp_wraparound() {
        let last = u32::MAX - 100;
        assert_eq!(link_state(200, Some(last), TIMEOUT), LinkState::Up);
        assert_eq!(link_state(899, Some(last), TIMEOUT), LinkState::Down);
    }

    #[test]
    fn test_monitor_reports_transitions() {
        let mut monitor = LinkMonitor::new(LinkConfig::default());
        assert_eq!(monitor.state(), LinkState::Down);

        assert_eq!(monitor.update(100, None), (LinkState::Down, false));
        assert_eq!(monitor.update(200, Some(150)), (LinkState::Up, true));
        assert_eq!(monitor.update(900, Some(150)), (LinkState::Up, false));
        assert_eq!(monitor.update(1150, Some(150)), (LinkState::Down, true));
        assert!(!monitor.state().is_up());
    }

    #[test]
    fn test_monitor_colors() {
        let monitor = LinkMonitor::new(LinkConfig::default());
        assert_eq!(monitor.color(LinkState::Up).to_hex(), 0x00FF00);
        assert_eq!(monitor.color(LinkState::Down).to_hex(), 0xFF0000);
    }
}
