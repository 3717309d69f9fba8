//! Telemetry packet decoding
//!
//! The sender transmits its packet struct as raw memory on a little-endian
//! MCU with natural alignment, so the wire image carries the compiler's
//! padding:
//!
//! ```text
//! offset  size  field
//!  0      2     rpm            u16
//!  2      2     (padding)
//!  4      4     battery volts  f32
//!  8      4     motor temp     f32
//! 12      4     duty cycle     f32   ("dk")
//! 16      4     gear position  f32   ("gp")
//! 20      1     flags          u8    ("funk")
//! 21      3     (padding)
//! ```
//!
//! Any buffer whose length is not exactly [`PACKET_SIZE`] is rejected.

/// Size of one telemetry packet on the wire
pub const PACKET_SIZE: usize = 24;

const RPM_OFFSET: usize = 0;
const BATTERY_OFFSET: usize = 4;
const MOTOR_TEMP_OFFSET: usize = 8;
const DUTY_CYCLE_OFFSET: usize = 12;
const GEAR_POSITION_OFFSET: usize = 16;
const FLAGS_OFFSET: usize = 20;

/// Errors that can occur while decoding a packet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PacketError {
    /// Buffer length does not match the fixed packet size
    WrongLength { expected: usize, actual: usize },
}

/// One decoded telemetry packet
///
/// Only `rpm` and `battery_volts` drive the gauges today. The other channels
/// are part of the sender's contract and are carried through unchanged.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TelemetryRecord {
    /// Motor speed
    pub rpm: u16,
    /// Pack voltage in volts
    pub battery_volts: f32,
    /// Motor temperature
    pub motor_temp: f32,
    /// Controller duty cycle
    pub duty_cycle: f32,
    /// Gear position
    pub gear_position: f32,
    /// Reserved flag bits
    pub flags: u8,
}

impl TelemetryRecord {
    /// All-zero record, the value shown before any packet arrives
    pub const ZERO: Self = Self {
        rpm: 0,
        battery_volts: 0.0,
        motor_temp: 0.0,
        duty_cycle: 0.0,
        gear_position: 0.0,
        flags: 0,
    };

    /// Decode a packet from its wire image
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PacketError> {
        let bytes: &[u8; PACKET_SIZE] =
            bytes.try_into().map_err(|_| PacketError::WrongLength {
                expected: PACKET_SIZE,
                actual: bytes.len(),
            })?;

        Ok(Self {
            rpm: u16::from_le_bytes([bytes[RPM_OFFSET], bytes[RPM_OFFSET + 1]]),
            battery_volts: read_f32(bytes, BATTERY_OFFSET),
            motor_temp: read_f32(bytes, MOTOR_TEMP_OFFSET),
            duty_cycle: read_f32(bytes, DUTY_CYCLE_OFFSET),
            gear_position: read_f32(bytes, GEAR_POSITION_OFFSET),
            flags: bytes[FLAGS_OFFSET],
        })
    }

    /// Encode this record into its wire image (padding bytes are zero)
    ///
    /// Used by senders, simulators and tests.
    pub fn to_bytes(&self) -> [u8; PACKET_SIZE] {
        let mut bytes = [0u8; PACKET_SIZE];
        bytes[RPM_OFFSET..RPM_OFFSET + 2].copy_from_slice(&self.rpm.to_le_bytes());
        write_f32(&mut bytes, BATTERY_OFFSET, self.battery_volts);
        write_f32(&mut bytes, MOTOR_TEMP_OFFSET, self.motor_temp);
        write_f32(&mut bytes, DUTY_CYCLE_OFFSET, self.duty_cycle);
        write_f32(&mut bytes, GEAR_POSITION_OFFSET, self.gear_position);
        bytes[FLAGS_OFFSET] = self.flags;
        bytes
    }
}

impl Default for TelemetryRecord {
    fn default() -> Self {
        Self::ZERO
    }
}

fn read_f32(bytes: &[u8; PACKET_SIZE], offset: usize) -> f32 {
    f32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

fn write_f32(bytes: &mut [u8; PACKET_SIZE], offset: usize, value: f32) {
    bytes[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}
