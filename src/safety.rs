//! Runtime guard.
//!
//! Runs **every tick after the FSM** and counts how long the fan has been
//! on under automatic control.  When the count passes the configured
//! limit it reports a trip and the controller forces `FanOff`, the same
//! way a safety fault would preempt the normal handlers.
//!
//! ## Lifecycle
//!
//! 1. The FSM enters `FanOn`; `fan_on_enter` zeroes `run_ticks`.
//! 2. Each AUTO tick with the fan on, the guard increments `run_ticks`.
//! 3. On the first tick where `run_ticks > fan_timeout_ticks` the guard
//!    trips; the controller forces `FanOff` with cause `Timeout`.
//! 4. In MANUAL the count is frozen; an operator-held fan never times out.

use crate::config::SystemConfig;
use crate::fsm::context::{FusionContext, OperatingMode};
use log::warn;

pub struct RuntimeGuard {
    limit_ticks: u32,
    /// Cutoffs since boot.
    trips: u32,
}

impl RuntimeGuard {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            limit_ticks: config.fan_timeout_ticks,
            trips: 0,
        }
    }

    /// Account for one tick.  Returns `true` when the cutoff must fire.
    pub fn evaluate(&mut self, ctx: &mut FusionContext, fan_on: bool) -> bool {
        if ctx.mode != OperatingMode::Auto || !fan_on {
            return false;
        }

        ctx.run_ticks = ctx.run_ticks.saturating_add(1);
        if ctx.run_ticks > self.limit_ticks {
            self.trips = self.trips.saturating_add(1);
            warn!(
                "RUNTIME CUTOFF: fan on for {} ticks (limit {})",
                ctx.run_ticks, self.limit_ticks
            );
            return true;
        }
        false
    }

    pub fn trips(&self) -> u32 {
        self.trips
    }
}
