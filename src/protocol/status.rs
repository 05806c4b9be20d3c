//! Outbound status lines.
//!
//! ```text
//! SYSTEM:READY        once at startup
//! MODE:AUTO|MANUAL    on every mode command
//! FAN:ON|FAN:OFF      on manual command execution, and each report in AUTO
//! AUTO:TIMEOUT        on runtime cutoff
//! TIME:<us>           each report
//! ```
//!
//! Rendering is pure; [`StatusReporter`] pushes the result onto a
//! [`ByteLink`].

use core::fmt::Write;

use heapless::{String, Vec};
use log::warn;

use crate::app::events::AppEvent;
use crate::app::ports::ByteLink;
use crate::error::CommsError;
use crate::fsm::context::{FanCause, FanState, OperatingMode};

/// Longest line is `TIME:65535\n`; leave headroom.
pub const LINE_CAPACITY: usize = 24;
/// A single event renders to at most this many lines.
pub const MAX_LINES: usize = 2;

pub type StatusLine = String<LINE_CAPACITY>;
pub type StatusLines = Vec<StatusLine, MAX_LINES>;

/// Render the wire-visible lines for `event`.  Events with no wire
/// representation yield nothing.
pub fn render(event: &AppEvent) -> StatusLines {
    let mut lines = StatusLines::new();
    match event {
        AppEvent::Started => push(&mut lines, "SYSTEM:READY"),
        AppEvent::ModeChanged(OperatingMode::Auto) => push(&mut lines, "MODE:AUTO"),
        AppEvent::ModeChanged(OperatingMode::Manual) => push(&mut lines, "MODE:MANUAL"),
        AppEvent::FanChanged {
            cause: FanCause::Timeout,
            ..
        } => push(&mut lines, "AUTO:TIMEOUT"),
        AppEvent::FanChanged {
            state,
            cause: FanCause::Manual,
        } => push(&mut lines, fan_text(*state)),
        AppEvent::Status(snap) => {
            let mut line = StatusLine::new();
            // Cannot overflow: five bytes of tag plus at most five digits.
            let _ = writeln!(line, "TIME:{}", snap.echo_us);
            let _ = lines.push(line);
            if snap.mode == OperatingMode::Auto {
                push(&mut lines, fan_text(snap.fan));
            }
        }
        AppEvent::FanChanged { .. } | AppEvent::PresenceChanged(_) => {}
    }
    lines
}

fn fan_text(state: FanState) -> &'static str {
    match state {
        FanState::On => "FAN:ON",
        FanState::Off => "FAN:OFF",
    }
}

fn push(lines: &mut StatusLines, text: &str) {
    let mut line = StatusLine::new();
    let _ = writeln!(line, "{text}");
    let _ = lines.push(line);
}

/// Writes rendered lines to the serial link.
#[derive(Debug, Default)]
pub struct StatusReporter {
    tx_failures: u32,
}

impl StatusReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render and send `event`.  A failed write is counted and logged;
    /// the remaining lines for this event are dropped.
    pub fn publish<L: ByteLink>(&mut self, link: &mut L, event: &AppEvent) -> Result<(), CommsError> {
        for line in render(event) {
            if let Err(e) = link.send_all(line.as_bytes()) {
                self.tx_failures = self.tx_failures.saturating_add(1);
                warn!("status line dropped: {e}");
                return Err(e);
            }
        }
        Ok(())
    }

    pub fn tx_failures(&self) -> u32 {
        self.tx_failures
    }
}
