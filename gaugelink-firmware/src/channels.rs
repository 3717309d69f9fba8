//! Inter-task communication
//!
//! Defines the statics shared between the radio receive path and the
//! dashboard loop.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::Instant;

use gaugelink_core::mailbox::TelemetryMailbox;
use gaugelink_protocol::MacAddress;

/// Newest telemetry record, written by the radio task, taken by the dashboard
pub static TELEMETRY: TelemetryMailbox<CriticalSectionRawMutex> = TelemetryMailbox::new();

/// Radio bridge status changes (for logging on the dashboard side)
pub static RADIO_STATUS: Signal<CriticalSectionRawMutex, RadioStatus> = Signal::new();

/// Radio bridge status as last reported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RadioStatus {
    /// Bridge is receiving; carries its station MAC
    Ready(MacAddress),
    /// Bridge is receiving but could not report its MAC
    MacUnavailable,
    /// Bridge radio failed to start; receive is disabled
    InitFailed(u8),
}

/// Milliseconds since boot on the shared monotonic clock
///
/// Wraps after about 49 days; every consumer compares with wrapping math.
pub fn now_ms() -> u32 {
    Instant::now().as_millis() as u32
}
