//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (ranger, fan, serial link, event sinks) implement these
//! traits.  The [`AppService`](super::service::AppService) consumes them via
//! generics, so the domain core never touches hardware directly.

use crate::error::{ActuatorError, CommsError};

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain calls this to obtain a ranging sample.
pub trait SensorPort {
    /// Run one ranging cycle.  Blocks for a bounded time and always
    /// returns a round trip in µs (last-known-good on failure).
    fn measure_echo_us(&mut self) -> u16;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain calls this to command the fan.
pub trait ActuatorPort {
    /// Forward rotation at the fixed configured duty.
    fn fan_on(&mut self) -> Result<(), ActuatorError>;

    /// Zero duty, both direction lines deasserted.
    fn fan_off(&mut self) -> Result<(), ActuatorError>;

    /// Whether the output is currently driving the motor.
    fn is_fan_on(&self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Byte link port (driven adapter: serial ↔ domain)
// ───────────────────────────────────────────────────────────────

/// Ordered byte-stream channel to the vision host.
pub trait ByteLink {
    /// Whether at least one inbound byte is waiting.
    fn available(&self) -> bool;

    /// Take the next inbound byte.  Only called after `available()`.
    fn receive(&mut self) -> Result<u8, CommsError>;

    /// Queue one outbound byte.
    fn send(&mut self, byte: u8) -> Result<(), CommsError>;

    /// Queue a run of outbound bytes in order.
    fn send_all(&mut self, bytes: &[u8]) -> Result<(), CommsError> {
        for &b in bytes {
            self.send(b)?;
        }
        Ok(())
    }
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

/// Fan out to two sinks.
impl<A: EventSink, B: EventSink> EventSink for (A, B) {
    fn emit(&mut self, event: &super::events::AppEvent) {
        self.0.emit(event);
        self.1.emit(event);
    }
}
