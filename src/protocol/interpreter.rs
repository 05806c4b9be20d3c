//! Single-byte command decoder.
//!
//! | Byte        | Command                                   |
//! |-------------|-------------------------------------------|
//! | `A`, `H`    | presence detected                         |
//! | `D`, `L`    | presence lost                             |
//! | `M`         | enter MANUAL                              |
//! | `O`         | enter AUTO                                |
//! | `F`         | arm the manual prefix, no command         |
//! | `1` / `0`   | `F1`/`F0` manual fan, else presence on/off |
//! | other       | ignored                                   |
//!
//! The prefix is a one-slot lookahead with no timeout: whatever byte
//! follows `F` consumes it.

use crate::app::commands::AppCommand;

/// Lookahead state between two bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Prefix {
    #[default]
    None,
    /// `F` seen, next `1`/`0` is a fan level.
    Fan,
}

#[derive(Debug, Default)]
pub struct CommandInterpreter {
    prefix: Prefix,
}

impl CommandInterpreter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode one inbound byte.
    pub fn interpret(&mut self, byte: u8) -> Option<AppCommand> {
        let prefix = core::mem::take(&mut self.prefix);

        match (byte, prefix) {
            (b'F', _) => {
                self.prefix = Prefix::Fan;
                None
            }
            (b'1', Prefix::Fan) => Some(AppCommand::ManualFanOn),
            (b'0', Prefix::Fan) => Some(AppCommand::ManualFanOff),
            (b'A' | b'H' | b'1', _) => Some(AppCommand::PresenceDetected),
            (b'D' | b'L' | b'0', _) => Some(AppCommand::PresenceLost),
            (b'M', _) => Some(AppCommand::EnterManual),
            (b'O', _) => Some(AppCommand::EnterAuto),
            _ => None,
        }
    }

    pub fn prefix(&self) -> Prefix {
        self.prefix
    }
}
