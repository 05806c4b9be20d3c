//! Time adapter.
//!
//! Provides the ranging driver's timing primitive and monotonic uptime.
//!
//! - **`feature = "espidf"`** — wraps `esp_timer_get_time()` from the
//!   ESP-IDF high-resolution timer (microsecond precision, monotonic).
//! - **otherwise** — uses `std::time::Instant` for host-side simulation.

use crate::sensors::ultrasonic::FreeRunningCounter;

/// Monotonic microsecond clock.
pub struct UptimeClock {
    #[cfg(not(feature = "espidf"))]
    start: std::time::Instant,
}

impl Default for UptimeClock {
    fn default() -> Self {
        Self::new()
    }
}

impl UptimeClock {
    pub fn new() -> Self {
        Self {
            #[cfg(not(feature = "espidf"))]
            start: std::time::Instant::now(),
        }
    }

    /// Microseconds since boot.
    #[cfg(feature = "espidf")]
    pub fn uptime_us(&self) -> u64 {
        // SAFETY: read-only query of the system timer.
        (unsafe { esp_idf_svc::sys::esp_timer_get_time() }) as u64
    }

    /// Microseconds since creation.
    #[cfg(not(feature = "espidf"))]
    pub fn uptime_us(&self) -> u64 {
        self.start.elapsed().as_micros() as u64
    }
}

/// A 32-bit, 1 µs/tick counter derived from the uptime clock.
///
/// `reset` records a base; `ticks` reports the low 32 bits of the time
/// since that base, so it wraps exactly like a hardware register.
pub struct MicrosCounter {
    clock: UptimeClock,
    base_us: u64,
}

impl MicrosCounter {
    pub fn new(clock: UptimeClock) -> Self {
        let base_us = clock.uptime_us();
        Self { clock, base_us }
    }
}

impl FreeRunningCounter for MicrosCounter {
    const MAX: u32 = u32::MAX;
    const NANOS_PER_TICK: u32 = 1000;

    fn reset(&mut self) {
        self.base_us = self.clock.uptime_us();
    }

    fn ticks(&mut self) -> u32 {
        self.clock.uptime_us().wrapping_sub(self.base_us) as u32
    }
}
