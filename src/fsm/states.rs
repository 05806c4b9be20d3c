//! Concrete state handler functions and table builder.
//!
//! Two states, each defined by plain `fn` pointers.  Handlers only act in
//! AUTO; in MANUAL the fan is moved exclusively by
//! [`Fsm::force_transition`](super::Fsm::force_transition).
//!
//! ```text
//!  FAN_OFF ──[presence && in range]──▶ FAN_ON
//!     ▲                                  │
//!     ├────────[presence lost]───────────┤
//!     ├──[out of range for grace ticks]──┤
//!     └──────[runtime cutoff (guard)]────┘
//! ```

use super::context::{FanCause, FusionContext, OperatingMode};
use super::{StateDescriptor, StateId};
use log::{debug, info};

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static state table.  Called once at startup.
pub fn build_state_table() -> [StateDescriptor; StateId::COUNT] {
    [
        // Index 0 — FanOff
        StateDescriptor {
            name: "FanOff",
            on_enter: Some(fan_off_enter),
            on_update: fan_off_update,
        },
        // Index 1 — FanOn
        StateDescriptor {
            name: "FanOn",
            on_enter: Some(fan_on_enter),
            on_update: fan_on_update,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  FAN_OFF
// ═══════════════════════════════════════════════════════════════════════════

fn fan_off_enter(ctx: &mut FusionContext) {
    ctx.reset_counters();
    info!("FAN OFF ({:?}, {:?})", ctx.cause, ctx.mode);
}

fn fan_off_update(ctx: &mut FusionContext) -> Option<StateId> {
    if ctx.mode == OperatingMode::Manual {
        return None;
    }

    if ctx.conditions_met() {
        ctx.cause = FanCause::Fusion;
        return Some(StateId::FanOn);
    }

    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  FAN_ON
// ═══════════════════════════════════════════════════════════════════════════

fn fan_on_enter(ctx: &mut FusionContext) {
    ctx.reset_counters();
    info!(
        "FAN ON ({:?}, {:?}, echo {} us)",
        ctx.cause, ctx.mode, ctx.echo_us
    );
}

fn fan_on_update(ctx: &mut FusionContext) -> Option<StateId> {
    if ctx.mode == OperatingMode::Manual {
        return None;
    }

    if ctx.conditions_met() {
        ctx.grace_ticks = 0;
        return None;
    }

    // Nobody in view: no grace.
    if !ctx.presence {
        ctx.cause = FanCause::PresenceLost;
        return Some(StateId::FanOff);
    }

    // Present but out of range.
    ctx.grace_ticks = ctx.grace_ticks.saturating_add(1);
    if ctx.grace_ticks >= ctx.config.grace_ticks {
        ctx.cause = FanCause::GraceExpired;
        return Some(StateId::FanOff);
    }

    debug!(
        "out of range ({} us), grace {}/{}",
        ctx.echo_us, ctx.grace_ticks, ctx.config.grace_ticks
    );
    None
}
