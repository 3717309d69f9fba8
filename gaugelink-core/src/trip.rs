//! Trip distance accumulation
//!
//! Integrates speed over wall-clock time as a step function: each call
//! credits the speed passed in for the whole interval since the previous
//! call. Accuracy depends on how often new data arrives, which is far
//! faster than speed changes.
//!
//! The distance lives only in RAM and restarts from zero at power-on. It is
//! summed in `f64` so millisecond steps still register on a long trip; the
//! display only needs `f32`.

/// Milliseconds per hour
const MS_PER_HOUR: f64 = 3_600_000.0;

/// Trip odometer
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TripAccumulator {
    /// Time of the previous integration (wrapping ms), unset until the first call
    last_ms: Option<u32>,
    /// Accumulated distance
    distance_km: f64,
}

impl TripAccumulator {
    /// Create an empty trip
    pub const fn new() -> Self {
        Self {
            last_ms: None,
            distance_km: 0.0,
        }
    }

    /// Credit `speed_kmh` for the time since the previous call
    ///
    /// The first call only records the baseline. Returns the total distance.
    pub fn integrate(&mut self, now_ms: u32, speed_kmh: f32) -> f32 {
        if let Some(last) = self.last_ms {
            let elapsed_hours = f64::from(now_ms.wrapping_sub(last)) / MS_PER_HOUR;
            self.distance_km += f64::from(speed_kmh) * elapsed_hours;
        }
        self.last_ms = Some(now_ms);
        self.distance_km()
    }

    /// Accumulated distance in km
    pub fn distance_km(&self) -> f32 {
        self.distance_km as f32
    }
}
