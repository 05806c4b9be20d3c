//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port and renders the wire-visible
//! subset as status lines on the serial link.

use serde::Serialize;

use crate::fsm::context::{FanCause, FanState, OperatingMode};

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Boot complete, control loop about to run.
    Started,

    /// Mode command processed (sent even if the mode did not change).
    ModeChanged(OperatingMode),

    /// Presence signal flipped.
    PresenceChanged(bool),

    /// Fan output changed, or a manual command was executed.
    FanChanged { state: FanState, cause: FanCause },

    /// Periodic status snapshot.
    Status(StatusSnapshot),
}

/// A point-in-time snapshot suitable for logging or transmission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusSnapshot {
    pub mode: OperatingMode,
    pub fan: FanState,
    pub presence: bool,
    /// Latest ranging round trip (µs).
    pub echo_us: u16,
    /// Latest displayable distance (cm).
    pub distance_cm: Option<u16>,
    pub grace_ticks: u16,
    pub run_ticks: u32,
}
