//! Messages from the radio bridge to the dashboard
//!
//! The bridge is a small radio module that listens for broadcast telemetry
//! and forwards every datagram it hears, together with the sender's MAC
//! address, over UART. It also reports its own start-up result once.
//!
//! No sender filtering happens on either side: every datagram is forwarded
//! and handed to the dashboard unchanged.

use crate::frame::{Frame, FrameError, MAX_PAYLOAD_SIZE};

// Message type IDs: Bridge → Dashboard
pub const MSG_DATAGRAM: u8 = 0x01;
pub const MSG_READY: u8 = 0x02;
pub const MSG_MAC_UNAVAILABLE: u8 = 0x03;
pub const MSG_INIT_FAILED: u8 = 0x04;

/// Length of a radio MAC address
pub const MAC_LEN: usize = 6;

/// Largest radio payload that fits in one frame after the sender MAC
pub const MAX_DATAGRAM_LEN: usize = MAX_PAYLOAD_SIZE - MAC_LEN;

/// Six-byte radio MAC address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MacAddress(pub [u8; MAC_LEN]);

impl MacAddress {
    fn from_slice(bytes: &[u8]) -> Option<Self> {
        bytes.try_into().ok().map(MacAddress)
    }
}

impl core::fmt::Display for MacAddress {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let m = &self.0;
        write!(
            f,
            "{:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}",
            m[0], m[1], m[2], m[3], m[4], m[5]
        )
    }
}

/// Messages sent by the radio bridge
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BridgeMessage<'a> {
    /// A radio datagram and the MAC of the station that sent it
    Datagram { sender: MacAddress, data: &'a [u8] },
    /// Radio initialised; carries the bridge's own station MAC
    Ready { mac: MacAddress },
    /// Radio initialised but its MAC could not be read
    MacUnavailable,
    /// Radio initialisation failed; no datagrams will follow
    InitFailed { code: u8 },
}

impl<'a> BridgeMessage<'a> {
    /// Parse a message from a frame
    ///
    /// The returned message borrows the frame's payload.
    pub fn from_frame(frame: &'a Frame) -> Result<Self, FrameError> {
        let payload = frame.payload.as_slice();
        match frame.msg_type {
            MSG_DATAGRAM => {
                if payload.len() < MAC_LEN {
                    return Err(FrameError::InvalidFrame);
                }
                let (mac, data) = payload.split_at(MAC_LEN);
                let sender = MacAddress::from_slice(mac).ok_or(FrameError::InvalidFrame)?;
                Ok(BridgeMessage::Datagram { sender, data })
            }
            MSG_READY => {
                let mac = MacAddress::from_slice(payload).ok_or(FrameError::InvalidFrame)?;
                Ok(BridgeMessage::Ready { mac })
            }
            MSG_MAC_UNAVAILABLE => Ok(BridgeMessage::MacUnavailable),
            MSG_INIT_FAILED => match payload {
                [code] => Ok(BridgeMessage::InitFailed { code: *code }),
                _ => Err(FrameError::InvalidFrame),
            },
            _ => Err(FrameError::InvalidFrame),
        }
    }

    /// Encode this message into a frame (bridge side, simulation and tests)
    pub fn to_frame(&self) -> Result<Frame, FrameError> {
        match self {
            BridgeMessage::Datagram { sender, data } => {
                if data.len() > MAX_DATAGRAM_LEN {
                    return Err(FrameError::PayloadTooLarge);
                }
                let mut frame = Frame::new(MSG_DATAGRAM, &sender.0)?;
                frame
                    .payload
                    .extend_from_slice(data)
                    .map_err(|_| FrameError::PayloadTooLarge)?;
                Ok(frame)
            }
            BridgeMessage::Ready { mac } => Frame::new(MSG_READY, &mac.0),
            BridgeMessage::MacUnavailable => Ok(Frame::empty(MSG_MAC_UNAVAILABLE)),
            BridgeMessage::InitFailed { code } => Frame::new(MSG_INIT_FAILED, &[*code]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packet::{TelemetryRecord, PACKET_SIZE};
    use crate::FrameParser;

    const SENDER: MacAddress = MacAddress([0x24, 0x6F, 0x28, 0x0A, 0x0B, 0x0C]);

    #[test]
    fn test_datagram_layout() {
        let msg = BridgeMessage::Datagram {
            sender: SENDER,
            data: &[1, 2, 3],
        };
        let frame = msg.to_frame().unwrap();

        assert_eq!(frame.msg_type, MSG_DATAGRAM);
        assert_eq!(&frame.payload[..MAC_LEN], &SENDER.0);
        assert_eq!(&frame.payload[MAC_LEN..], &[1, 2, 3]);
    }

    #[test]
    fn test_datagram_carries_telemetry_packet() {
        let record = TelemetryRecord {
            rpm: 6400,
            battery_volts: 12.0,
            ..TelemetryRecord::ZERO
        };
        let packet = record.to_bytes();
        let encoded = BridgeMessage::Datagram {
            sender: SENDER,
            data: &packet,
        }
        .to_frame()
        .unwrap()
        .encode_to_vec()
        .unwrap();

        let mut parser = FrameParser::new();
        let (_, parsed) = parser.feed_bytes(&encoded);
        let frame = parsed.unwrap().unwrap();

        match BridgeMessage::from_frame(&frame).unwrap() {
            BridgeMessage::Datagram { sender, data } => {
                assert_eq!(sender, SENDER);
                assert_eq!(data.len(), PACKET_SIZE);
                assert_eq!(TelemetryRecord::from_bytes(data).unwrap(), record);
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[test]
    fn test_empty_datagram_allowed() {
        let frame = Frame::new(MSG_DATAGRAM, &SENDER.0).unwrap();
        assert_eq!(
            BridgeMessage::from_frame(&frame).unwrap(),
            BridgeMessage::Datagram {
                sender: SENDER,
                data: &[]
            }
        );
    }

    #[test]
    fn test_datagram_too_large() {
        let data = [0u8; MAX_DATAGRAM_LEN + 1];
        let msg = BridgeMessage::Datagram {
            sender: SENDER,
            data: &data,
        };
        assert_eq!(msg.to_frame(), Err(FrameError::PayloadTooLarge));
    }

    #[test]
    fn test_datagram_without_sender_rejected() {
        let frame = Frame::new(MSG_DATAGRAM, &[1, 2, 3]).unwrap();
        assert_eq!(
            BridgeMessage::from_frame(&frame),
            Err(FrameError::InvalidFrame)
        );
    }

    #[test]
    fn test_status_messages() {
        let ready = BridgeMessage::Ready { mac: SENDER }.to_frame().unwrap();
        assert_eq!(
            BridgeMessage::from_frame(&ready).unwrap(),
            BridgeMessage::Ready { mac: SENDER }
        );

        let failed = Frame::new(MSG_INIT_FAILED, &[0x69]).unwrap();
        assert_eq!(
            BridgeMessage::from_frame(&failed).unwrap(),
            BridgeMessage::InitFailed { code: 0x69 }
        );

        let no_mac = Frame::empty(MSG_MAC_UNAVAILABLE);
        assert_eq!(
            BridgeMessage::from_frame(&no_mac).unwrap(),
            BridgeMessage::MacUnavailable
        );
    }

    #[test]
    fn test_unknown_type_rejected() {
        let frame = Frame::empty(0x7F);
        assert_eq!(
            BridgeMessage::from_frame(&frame),
            Err(FrameError::InvalidFrame)
        );
    }

    #[test]
    fn test_mac_display() {
        use core::fmt::Write;
        let mut text = heapless::String::<17>::new();
        write!(text, "{}", SENDER).unwrap();
        assert_eq!(text.as_str(), "24:6F:28:0A:0B:0C");
    }
}
