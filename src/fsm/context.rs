//! Shared mutable context threaded through every FSM handler.
//!
//! `FusionContext` is the single struct that state handlers read from and
//! write to: operating mode, the latest presence signal and ranging sample,
//! the grace and run-duration counters, and configuration.  Nothing outside
//! [`FusionController`](super::controller::FusionController) mutates it.

use serde::Serialize;

use crate::config::SystemConfig;

// ---------------------------------------------------------------------------
// Domain enums
// ---------------------------------------------------------------------------

/// Who decides the fan output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OperatingMode {
    /// Fan driven by presence + range fusion.
    Auto,
    /// Fan driven only by explicit `F1`/`F0` commands.
    Manual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FanState {
    Off,
    On,
}

/// Why the fan last changed state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FanCause {
    /// Power-on default.
    Boot,
    /// Presence and range both satisfied.
    Fusion,
    /// Vision host reported nobody in view.
    PresenceLost,
    /// Target stayed out of range for the whole grace period.
    GraceExpired,
    /// Maximum AUTO runtime exceeded.
    Timeout,
    /// Explicit `F1`/`F0` in MANUAL.
    Manual,
}

// ---------------------------------------------------------------------------
// FusionContext
// ---------------------------------------------------------------------------

/// The shared context passed to every state handler function.
pub struct FusionContext {
    // -- Inputs --
    pub mode: OperatingMode,
    /// Latest presence report from the vision host.  Never expires.
    pub presence: bool,
    /// Latest ranging round trip (µs).  Refreshed every Nth tick.
    pub echo_us: u16,

    // -- Counters (reset on every fan transition) --
    /// Consecutive out-of-range ticks while ON with presence.
    pub grace_ticks: u16,
    /// AUTO ticks since the fan turned ON.
    pub run_ticks: u32,

    /// Reason recorded by whichever handler requested the latest transition.
    pub cause: FanCause,

    // -- Configuration --
    pub config: SystemConfig,
}

impl FusionContext {
    /// Create a new context: AUTO, no presence, no sample.
    pub fn new(config: SystemConfig) -> Self {
        Self {
            mode: OperatingMode::Auto,
            presence: false,
            echo_us: 0,
            grace_ticks: 0,
            run_ticks: 0,
            cause: FanCause::Boot,
            config,
        }
    }

    /// Whether the target counts as within switching distance.
    ///
    /// Below the too-close floor the sensor cannot discriminate, so the
    /// presence signal alone decides.
    pub fn in_range(&self) -> bool {
        if self.echo_us < self.config.too_close_floor_us {
            self.presence
        } else {
            self.echo_us <= self.config.on_threshold_us
        }
    }

    pub fn conditions_met(&self) -> bool {
        self.presence && self.in_range()
    }

    pub fn reset_counters(&mut self) {
        self.grace_ticks = 0;
        self.run_ticks = 0;
    }
}
