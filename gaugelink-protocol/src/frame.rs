//! Frame encoding and decoding for the radio bridge UART link.
//!
//! Frame format:
//! - START (1 byte): 0xAA synchronization byte
//! - LENGTH (1 byte): payload length (0-255)
//! - TYPE (1 byte): message type identifier
//! - PAYLOAD (0-255 bytes): type-specific data
//! - CHECKSUM (1 byte): XOR of LENGTH, TYPE, and all PAYLOAD bytes

use heapless::Vec;

/// Frame synchronization byte
pub const FRAME_START: u8 = 0xAA;

/// Maximum payload size in bytes (the LENGTH byte covers its full range)
pub const MAX_PAYLOAD_SIZE: usize = u8::MAX as usize;

/// Bytes a frame adds around its payload (START + LENGTH + TYPE + CHECKSUM)
pub const FRAME_OVERHEAD: usize = 4;

/// Maximum complete frame size
pub const MAX_FRAME_SIZE: usize = FRAME_OVERHEAD + MAX_PAYLOAD_SIZE;

/// Errors that can occur during frame parsing or encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Payload exceeds maximum allowed size
    PayloadTooLarge,
    /// Checksum mismatch
    InvalidChecksum,
    /// Frame structure does not match its message type
    InvalidFrame,
    /// Buffer too small for encoding
    BufferTooSmall,
}

/// A parsed or constructed frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Message type identifier
    pub msg_type: u8,
    /// Payload data
    pub payload: Vec<u8, MAX_PAYLOAD_SIZE>,
}

impl Frame {
    /// Create a new frame with the given message type and payload
    pub fn new(msg_type: u8, payload: &[u8]) -> Result<Self, FrameError> {
        let payload = Vec::from_slice(payload).map_err(|_| FrameError::PayloadTooLarge)?;
        Ok(Self { msg_type, payload })
    }

    /// Create a frame with no payload
    pub fn empty(msg_type: u8) -> Self {
        Self {
            msg_type,
            payload: Vec::new(),
        }
    }

    fn checksum(length: u8, msg_type: u8, payload: &[u8]) -> u8 {
        payload.iter().fold(length ^ msg_type, |acc, &b| acc ^ b)
    }

    /// Number of bytes this frame occupies on the wire
    pub fn encoded_len(&self) -> usize {
        FRAME_OVERHEAD + self.payload.len()
    }

    /// Encode this frame into a byte buffer
    ///
    /// Returns the number of bytes written
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, FrameError> {
        let frame_len = self.encoded_len();
        if buffer.len() < frame_len {
            return Err(FrameError::BufferTooSmall);
        }

        let length = self.payload.len() as u8;
        let end = 3 + self.payload.len();

        buffer[0] = FRAME_START;
        buffer[1] = length;
        buffer[2] = self.msg_type;
        buffer[3..end].copy_from_slice(&self.payload);
        buffer[end] = Self::checksum(length, self.msg_type, &self.payload);

        Ok(frame_len)
    }

    /// Encode this frame into a heapless Vec
    pub fn encode_to_vec(&self) -> Result<Vec<u8, MAX_FRAME_SIZE>, FrameError> {
        let mut buffer = [0u8; MAX_FRAME_SIZE];
        let len = self.encode(&mut buffer)?;
        Vec::from_slice(&buffer[..len]).map_err(|_| FrameError::BufferTooSmall)
    }
}

/// Byte-at-a-time frame parser
///
/// Bytes arriving outside a frame are skipped until the next START byte,
/// so the parser resynchronises on its own after line noise or a bridge
/// reset.
#[derive(Debug, Clone, Default)]
pub struct FrameParser {
    state: Stage,
    payload: Vec<u8, MAX_PAYLOAD_SIZE>,
}

/// Where the parser is inside the current frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Stage {
    #[default]
    Idle,
    Length,
    Type { len: u8 },
    Payload { len: u8, msg_type: u8 },
    Checksum { len: u8, msg_type: u8 },
}

impl FrameParser {
    /// Create a parser waiting for a START byte
    pub const fn new() -> Self {
        Self {
            state: Stage::Idle,
            payload: Vec::new(),
        }
    }

    /// Drop any partial frame and wait for the next START byte
    pub fn reset(&mut self) {
        self.state = Stage::Idle;
        self.payload.clear();
    }

    /// Feed a single byte to the parser
    ///
    /// Returns `Ok(Some(frame))` when a complete valid frame is parsed,
    /// `Ok(None)` when more bytes are needed, or `Err` on a checksum failure.
    pub fn feed(&mut self, byte: u8) -> Result<Option<Frame>, FrameError> {
        self.state = match self.state {
            Stage::Idle if byte == FRAME_START => Stage::Length,
            Stage::Idle => Stage::Idle,
            Stage::Length => Stage::Type { len: byte },
            Stage::Type { len } => {
                self.payload.clear();
                if len == 0 {
                    Stage::Checksum { len, msg_type: byte }
                } else {
                    Stage::Payload { len, msg_type: byte }
                }
            }
            Stage::Payload { len, msg_type } => {
                // Capacity equals the largest LENGTH value
                let _ = self.payload.push(byte);
                if self.payload.len() == usize::from(len) {
                    Stage::Checksum { len, msg_type }
                } else {
                    Stage::Payload { len, msg_type }
                }
            }
            Stage::Checksum { len, msg_type } => {
                let valid = byte == Frame::checksum(len, msg_type, &self.payload);
                let payload = core::mem::take(&mut self.payload);
                self.state = Stage::Idle;
                return if valid {
                    Ok(Some(Frame { msg_type, payload }))
                } else {
                    Err(FrameError::InvalidChecksum)
                };
            }
        };
        Ok(None)
    }

    /// Feed bytes until the first complete frame
    ///
    /// Returns the number of bytes consumed along with the parse result, so
    /// the caller can continue with the remainder of `bytes`.
    pub fn feed_bytes(&mut self, bytes: &[u8]) -> (usize, Result<Option<Frame>, FrameError>) {
        for (i, &byte) in bytes.iter().enumerate() {
            match self.feed(byte) {
                Ok(None) => {}
                other => return (i + 1, other),
            }
        }
        (bytes.len(), Ok(None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_encode_empty_payload() {
        let frame = Frame::empty(0x03);
        let mut buffer = [0u8; 10];
        let len = frame.encode(&mut buffer).unwrap();

        assert_eq!(len, 4);
        assert_eq!(buffer[0], FRAME_START);
        assert_eq!(buffer[1], 0); // length
        assert_eq!(buffer[2], 0x03); // type
        assert_eq!(buffer[3], 0x03); // checksum (0 ^ 0x03)
    }

    #[test]
    fn test_frame_encode_with_payload() {
        let frame = Frame::new(0x01, &[0x10, 0x20, 0x30]).unwrap();
        let encoded = frame.encode_to_vec().unwrap();

        assert_eq!(encoded.len(), 7);
        assert_eq!(&encoded[..3], &[FRAME_START, 3, 0x01]);
        assert_eq!(&encoded[3..6], &[0x10, 0x20, 0x30]);
        assert_eq!(encoded[6], 3 ^ 0x01 ^ 0x10 ^ 0x20 ^ 0x30);
    }

    #[test]
    fn test_encode_buffer_too_small() {
        let frame = Frame::new(0x01, &[1, 2, 3]).unwrap();
        let mut buffer = [0u8; 6];
        assert_eq!(frame.encode(&mut buffer), Err(FrameError::BufferTooSmall));
    }

    #[test]
    fn test_parser_reads_encoded_frame() {
        let original = Frame::new(0x01, &[1, 2, 3, 4, 5]).unwrap();
        let encoded = original.encode_to_vec().unwrap();

        let mut parser = FrameParser::new();
        let (consumed, parsed) = parser.feed_bytes(&encoded);

        assert_eq!(consumed, encoded.len());
        assert_eq!(parsed, Ok(Some(original)));
    }

    #[test]
    fn test_parser_full_length_payload() {
        let payload = [0xA5u8; MAX_PAYLOAD_SIZE];
        let original = Frame::new(0x01, &payload).unwrap();
        let encoded = original.encode_to_vec().unwrap();

        let mut parser = FrameParser::new();
        let (_, parsed) = parser.feed_bytes(&encoded);
        assert_eq!(parsed.unwrap().unwrap().payload.len(), MAX_PAYLOAD_SIZE);
    }

    #[test]
    fn test_parser_invalid_checksum() {
        let mut encoded = Frame::new(0x02, &[9, 8, 7]).unwrap().encode_to_vec().unwrap();
        let last = encoded.len() - 1;
        encoded[last] ^= 0xFF;

        let mut parser = FrameParser::new();
        let (_, result) = parser.feed_bytes(&encoded);
        assert_eq!(result, Err(FrameError::InvalidChecksum));
    }

    #[test]
    fn test_parser_resync_after_garbage() {
        let encoded = Frame::empty(0x03).encode_to_vec().unwrap();

        let mut data = Vec::<u8, 20>::new();
        data.extend_from_slice(&[0x00, 0xFF, 0x12, 0x34]).unwrap();
        data.extend_from_slice(&encoded).unwrap();

        let mut parser = FrameParser::new();
        let (_, parsed) = parser.feed_bytes(&data);
        assert_eq!(parsed.unwrap().unwrap().msg_type, 0x03);
    }

    #[test]
    fn test_feed_bytes_stops_after_first_frame() {
        let first = Frame::new(0x01, &[1]).unwrap().encode_to_vec().unwrap();
        let second = Frame::new(0x01, &[2]).unwrap().encode_to_vec().unwrap();

        let mut data = Vec::<u8, 20>::new();
        data.extend_from_slice(&first).unwrap();
        data.extend_from_slice(&second).unwrap();

        let mut parser = FrameParser::new();
        let (consumed, parsed) = parser.feed_bytes(&data);
        assert_eq!(consumed, first.len());
        assert_eq!(parsed.unwrap().unwrap().payload[0], 1);

        let (_, parsed) = parser.feed_bytes(&data[consumed..]);
        assert_eq!(parsed.unwrap().unwrap().payload[0], 2);
    }

    #[test]
    fn test_reset_drops_partial_frame() {
        let encoded = Frame::new(0x01, &[7, 7]).unwrap().encode_to_vec().unwrap();

        let mut parser = FrameParser::new();
        let (_, parsed) = parser.feed_bytes(&encoded[..3]);
        assert_eq!(parsed, Ok(None));

        parser.reset();
        let (_, parsed) = parser.feed_bytes(&encoded[3..]);
        assert_eq!(parsed, Ok(None));

        let (_, parsed) = parser.feed_bytes(&encoded);
        assert_eq!(parsed.unwrap().unwrap().payload.as_slice(), &[7, 7]);
    }

    #[test]
    fn test_payload_too_large() {
        let large_payload = [0u8; MAX_PAYLOAD_SIZE + 1];
        assert_eq!(
            Frame::new(0x01, &large_payload),
            Err(FrameError::PayloadTooLarge)
        );
    }
}
