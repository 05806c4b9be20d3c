//! Fusion controller: the single owner of all fan-decision state.
//!
//! Wraps the FSM engine, its [`FusionContext`] and the [`RuntimeGuard`].
//! Callers feed it decoded commands and ranging samples and tick it once
//! per control-loop iteration; it never exposes the context mutably.

use log::{debug, info};

use super::context::{FanCause, FanState, FusionContext, OperatingMode};
use super::{Fsm, StateId, states};
use crate::app::commands::AppCommand;
use crate::config::SystemConfig;
use crate::safety::RuntimeGuard;

/// A fan state change produced by [`FusionController::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FanTransition {
    pub state: FanState,
    pub cause: FanCause,
}

/// Visible effect of applying one command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlOutcome {
    PresenceChanged(bool),
    /// Emitted for every mode command, changed or not.
    ModeChanged(OperatingMode),
    /// A manual fan command was executed.  Reported even when the fan was
    /// already in the requested state.
    ManualFan(FanState),
}

pub struct FusionController {
    fsm: Fsm,
    ctx: FusionContext,
    guard: RuntimeGuard,
}

impl FusionController {
    /// AUTO, fan off, no presence, no sample.
    pub fn new(config: SystemConfig) -> Self {
        let guard = RuntimeGuard::new(&config);
        let mut ctx = FusionContext::new(config);
        let mut fsm = Fsm::new(states::build_state_table(), StateId::FanOff);
        fsm.start(&mut ctx);
        Self { fsm, ctx, guard }
    }

    /// Apply one decoded command.
    pub fn apply(&mut self, cmd: AppCommand) -> Option<ControlOutcome> {
        match cmd {
            AppCommand::PresenceDetected => self.set_presence(true),
            AppCommand::PresenceLost => self.set_presence(false),
            AppCommand::EnterManual => {
                self.ctx.mode = OperatingMode::Manual;
                self.ctx.presence = false;
                self.ctx.grace_ticks = 0;
                info!("mode MANUAL (fan {:?})", self.fan_state());
                Some(ControlOutcome::ModeChanged(OperatingMode::Manual))
            }
            AppCommand::EnterAuto => {
                self.ctx.mode = OperatingMode::Auto;
                info!("mode AUTO (fan {:?})", self.fan_state());
                Some(ControlOutcome::ModeChanged(OperatingMode::Auto))
            }
            AppCommand::ManualFanOn => self.manual_fan(FanState::On),
            AppCommand::ManualFanOff => self.manual_fan(FanState::Off),
        }
    }

    /// Record the latest ranging sample.
    pub fn update_range(&mut self, echo_us: u16) {
        self.ctx.echo_us = echo_us;
    }

    /// One control-loop tick: FSM update, then the runtime guard.
    pub fn tick(&mut self) -> Option<FanTransition> {
        let before = self.fsm.current_state();

        self.fsm.tick(&mut self.ctx);

        let fan_on = self.fsm.current_state() == StateId::FanOn;
        if self.guard.evaluate(&mut self.ctx, fan_on) {
            self.ctx.cause = FanCause::Timeout;
            self.fsm.force_transition(StateId::FanOff, &mut self.ctx);
        }

        let after = self.fsm.current_state();
        (after != before).then(|| FanTransition {
            state: after.into(),
            cause: self.ctx.cause,
        })
    }

    pub fn mode(&self) -> OperatingMode {
        self.ctx.mode
    }

    pub fn presence(&self) -> bool {
        self.ctx.presence
    }

    pub fn fan_state(&self) -> FanState {
        self.fsm.current_state().into()
    }

    pub fn echo_us(&self) -> u16 {
        self.ctx.echo_us
    }

    pub fn grace_ticks(&self) -> u16 {
        self.ctx.grace_ticks
    }

    pub fn run_ticks(&self) -> u32 {
        self.ctx.run_ticks
    }

    /// Why the fan last changed state.
    pub fn last_cause(&self) -> FanCause {
        self.ctx.cause
    }

    pub fn timeout_trips(&self) -> u32 {
        self.guard.trips()
    }

    pub fn config(&self) -> &SystemConfig {
        &self.ctx.config
    }

    // ── Internal ──────────────────────────────────────────────────

    fn set_presence(&mut self, present: bool) -> Option<ControlOutcome> {
        if self.ctx.presence == present {
            return None;
        }
        self.ctx.presence = present;
        Some(ControlOutcome::PresenceChanged(present))
    }

    fn manual_fan(&mut self, want: FanState) -> Option<ControlOutcome> {
        if self.ctx.mode != OperatingMode::Manual {
            debug!("manual fan {want:?} ignored in AUTO");
            return None;
        }
        self.ctx.cause = FanCause::Manual;
        self.fsm.force_transition(want.into(), &mut self.ctx);
        Some(ControlOutcome::ManualFan(want))
    }
}
