//! Unified error types for the PresenceFan firmware.
//!
//! A single `Error` enum that every subsystem can convert into, keeping the
//! top-level control loop's error handling uniform.  All variants are `Copy`
//! so they can be passed through the control path without allocation.
//!
//! Nothing in here is fatal to the control loop: sensor errors degrade to the
//! last-known-good reading, actuator and link errors are logged and retried
//! on the next tick.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The ranging sensor could not produce a usable reading.
    Sensor(SensorError),
    /// An actuator command failed.
    Actuator(ActuatorError),
    /// The serial link failed.
    Comms(CommsError),
    /// Configuration is invalid.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Actuator(e) => write!(f, "actuator: {e}"),
            Self::Comms(e) => write!(f, "comms: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

/// Why a single ranging cycle did not yield a fresh sample.
///
/// Never surfaced to the control loop: the ultrasonic driver maps every
/// variant to its last-known-good reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// Echo line was still high from a previous cycle and never cleared.
    EchoStuck,
    /// No rising edge on the echo line after the trigger pulse.
    NoEcho,
    /// Echo line rose but never fell within the maximum-range window.
    EchoTimeout,
    /// Round trip measured (µs) but outside the sensor's rated window.
    OutOfRange(u16),
    /// Trigger or echo GPIO access failed.
    Gpio,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EchoStuck => write!(f, "echo line stuck high"),
            Self::NoEcho => write!(f, "no echo after trigger"),
            Self::EchoTimeout => write!(f, "echo never returned low"),
            Self::OutOfRange(us) => write!(f, "round trip {us}us out of range"),
            Self::Gpio => write!(f, "GPIO access failed"),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Actuator errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorError {
    /// PWM duty-cycle write failed.
    PwmWriteFailed,
    /// Direction GPIO write failed.
    GpioWriteFailed,
}

impl fmt::Display for ActuatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PwmWriteFailed => write!(f, "PWM write failed"),
            Self::GpioWriteFailed => write!(f, "GPIO write failed"),
        }
    }
}

impl From<ActuatorError> for Error {
    fn from(e: ActuatorError) -> Self {
        Self::Actuator(e)
    }
}

// ---------------------------------------------------------------------------
// Communications errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommsError {
    /// `receive` was called with nothing staged.
    RxEmpty,
    /// The UART driver rejected a write.
    TxFailed,
    /// Inbound staging queue was full; a byte was dropped.
    RxOverrun,
}

impl fmt::Display for CommsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RxEmpty => write!(f, "no inbound byte staged"),
            Self::TxFailed => write!(f, "UART write failed"),
            Self::RxOverrun => write!(f, "inbound queue overrun"),
        }
    }
}

impl From<CommsError> for Error {
    fn from(e: CommsError) -> Self {
        Self::Comms(e)
    }
}
