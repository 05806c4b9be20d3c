//! Inbound commands to the application service.
//!
//! Produced by the [`CommandInterpreter`](crate::protocol::interpreter::CommandInterpreter)
//! from single bytes on the serial link and consumed immediately by the
//! fusion controller.

/// Commands that the vision host or operator can send into the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    /// Vision host reports a person in view (`A`, `H`, bare `1`).
    PresenceDetected,

    /// Vision host reports nobody in view (`D`, `L`, bare `0`).
    PresenceLost,

    /// Switch to MANUAL; presence is cleared (`M`).
    EnterManual,

    /// Switch to AUTO (`O`).
    EnterAuto,

    /// Turn the fan on; honoured only in MANUAL (`F1`).
    ManualFanOn,

    /// Turn the fan off; honoured only in MANUAL (`F0`).
    ManualFanOff,
}
