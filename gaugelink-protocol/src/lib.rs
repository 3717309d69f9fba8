//! GaugeLink wire protocols
//!
//! Two layers live in this crate:
//!
//! - [`packet`]: the fixed-size telemetry packet broadcast by the vehicle
//!   sender over the radio. Its layout is the sender's in-memory struct, so
//!   size, padding and byte order must match exactly.
//! - [`frame`] and [`messages`]: the UART framing between the radio bridge
//!   module and the dashboard MCU. The bridge wraps every received radio
//!   datagram (and its own status reports) in a frame:
//!
//! ```text
//! ┌───────┬────────┬──────┬─────────────┬──────────┐
//! │ START │ LENGTH │ TYPE │ PAYLOAD     │ CHECKSUM │
//! │ 1B    │ 1B     │ 1B   │ 0–255B      │ 1B       │
//! └───────┴────────┴──────┴─────────────┴──────────┘
//! ```
//!
//! The frame checksum only covers the UART hop. The radio payload itself is
//! accepted on length alone.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod frame;
pub mod messages;
pub mod packet;

pub use frame::{Frame, FrameError, FrameParser, FRAME_START, MAX_PAYLOAD_SIZE};
pub use messages::{BridgeMessage, MacAddress, MAX_DATAGRAM_LEN};
pub use packet::{PacketError, TelemetryRecord, PACKET_SIZE};
