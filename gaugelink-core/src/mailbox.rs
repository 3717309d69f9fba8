//! Single-slot telemetry mailbox
//!
//! The radio receive path publishes packets here and the dashboard tick loop
//! takes them. There is no queue: each valid packet overwrites the slot, so
//! the tick loop only ever sees the newest record and anything published in
//! between is superseded.
//!
//! The record, the new-data flag and the receipt time are stored together
//! under one blocking mutex, so a reader never sees a half-written record or
//! a flag raised before its record is in place.

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;
use portable_atomic::{AtomicU32, Ordering};

use gaugelink_protocol::{PacketError, TelemetryRecord};

#[derive(Clone, Copy)]
struct Slot {
    record: TelemetryRecord,
    fresh: bool,
    last_receipt_ms: Option<u32>,
}

/// Packet counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MailboxStats {
    /// Packets stored in the slot
    pub accepted: u32,
    /// Packets rejected for their length
    pub dropped: u32,
}

/// Newest-wins telemetry slot
///
/// `M` selects the locking strategy; use `CriticalSectionRawMutex` when the
/// producer runs in an interrupt or another executor.
pub struct TelemetryMailbox<M: RawMutex> {
    slot: Mutex<M, Cell<Slot>>,
    accepted: AtomicU32,
    dropped: AtomicU32,
}

impl<M: RawMutex> Default for TelemetryMailbox<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: RawMutex> TelemetryMailbox<M> {
    /// Create an empty mailbox holding [`TelemetryRecord::ZERO`]
    pub const fn new() -> Self {
        Self {
            slot: Mutex::new(Cell::new(Slot {
                record: TelemetryRecord::ZERO,
                fresh: false,
                last_receipt_ms: None,
            })),
            accepted: AtomicU32::new(0),
            dropped: AtomicU32::new(0),
        }
    }

    /// Decode a raw packet and, if valid, make it the current record
    ///
    /// A packet of the wrong length is counted and otherwise ignored: the
    /// previous record, the new-data flag and the receipt time are left
    /// as they were.
    pub fn publish(&self, bytes: &[u8], now_ms: u32) -> Result<(), PacketError> {
        match TelemetryRecord::from_bytes(bytes) {
            Ok(record) => {
                self.store(record, now_ms);
                Ok(())
            }
            Err(e) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                Err(e)
            }
        }
    }

    /// Store an already decoded record
    pub fn store(&self, record: TelemetryRecord, now_ms: u32) {
        self.slot.lock(|slot| {
            slot.set(Slot {
                record,
                fresh: true,
                last_receipt_ms: Some(now_ms),
            })
        });
        self.accepted.fetch_add(1, Ordering::Relaxed);
    }

    /// Take the current record if it has not been taken yet
    ///
    /// Clears the new-data flag in the same critical section that reads the
    /// record.
    pub fn take(&self) -> Option<TelemetryRecord> {
        self.slot.lock(|slot| {
            let mut current = slot.get();
            if !current.fresh {
                return None;
            }
            current.fresh = false;
            slot.set(current);
            Some(current.record)
        })
    }

    /// Current record, taken or not
    pub fn peek(&self) -> TelemetryRecord {
        self.slot.lock(|slot| slot.get().record)
    }

    /// Whether a record is waiting to be taken
    pub fn has_new_data(&self) -> bool {
        self.slot.lock(|slot| slot.get().fresh)
    }

    /// Time of the newest valid packet, if any arrived yet
    pub fn last_receipt_ms(&self) -> Option<u32> {
        self.slot.lock(|slot| slot.get().last_receipt_ms)
    }

    /// Packet counters
    pub fn stats(&self) -> MailboxStats {
        MailboxStats {
            accepted: self.accepted.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
        }
    }
}
