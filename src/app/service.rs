//! Application service — the hexagonal core.
//!
//! [`AppService`] owns the command interpreter, the fusion controller and
//! the status reporter.  All I/O flows through port traits injected at
//! call sites, making the entire service testable with mock adapters.
//!
//! ```text
//!   ByteLink ──▶ ┌──────────────────────────────┐ ──▶ ByteLink (status)
//!  SensorPort ──▶│          AppService          │ ──▶ EventSink
//! ActuatorPort ◀─│ Interpreter · Fusion · Guard │
//!                └──────────────────────────────┘
//! ```

use log::{info, warn};

use crate::config::SystemConfig;
use crate::fsm::context::{FanCause, FanState, OperatingMode};
use crate::fsm::{ControlOutcome, FusionController};
use crate::protocol::interpreter::CommandInterpreter;
use crate::protocol::status::StatusReporter;
use crate::sensors::ultrasonic::echo_to_cm;

use super::commands::AppCommand;
use super::events::{AppEvent, StatusSnapshot};
use super::ports::{ActuatorPort, ByteLink, EventSink, SensorPort};

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

pub struct AppService {
    interpreter: CommandInterpreter,
    controller: FusionController,
    reporter: StatusReporter,
    measure_interval: u16,
    status_interval: u16,
    measure_counter: u16,
    status_counter: u16,
    tick_count: u64,
}

impl AppService {
    /// Construct the service from configuration.  Call [`start`](Self::start) next.
    pub fn new(config: SystemConfig) -> Self {
        Self {
            interpreter: CommandInterpreter::new(),
            measure_interval: config.measure_interval_ticks.max(1),
            status_interval: config.status_interval_ticks.max(1),
            controller: FusionController::new(config),
            reporter: StatusReporter::new(),
            measure_counter: 0,
            status_counter: 0,
            tick_count: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Drive the fan to a known-off output and announce readiness.
    pub fn start(
        &mut self,
        hw: &mut impl ActuatorPort,
        link: &mut impl ByteLink,
        sink: &mut impl EventSink,
    ) {
        if let Err(e) = hw.fan_off() {
            warn!("initial fan off failed: {e}");
        }
        self.publish(&AppEvent::Started, link, sink);
        self.publish(&AppEvent::ModeChanged(OperatingMode::Auto), link, sink);
        info!(
            "AppService started (on <= {} us, grace {} ticks, timeout {} ticks)",
            self.controller.config().on_threshold_us,
            self.controller.config().grace_ticks,
            self.controller.config().fan_timeout_ticks
        );
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one control-loop iteration:
    /// inbound byte → ranging (every Nth tick) → fusion → actuator → status.
    ///
    /// `hw` satisfies **both** [`SensorPort`] and [`ActuatorPort`] to avoid a
    /// double mutable borrow.
    pub fn tick(
        &mut self,
        hw: &mut (impl SensorPort + ActuatorPort),
        link: &mut impl ByteLink,
        sink: &mut impl EventSink,
    ) {
        self.tick_count = self.tick_count.wrapping_add(1);

        // 1. At most one inbound byte per iteration.
        if link.available() {
            match link.receive() {
                Ok(byte) => {
                    if let Some(cmd) = self.interpreter.interpret(byte) {
                        self.handle_command(cmd, link, sink);
                    }
                }
                Err(e) => warn!("link receive failed: {e}"),
            }
        }

        // 2. Ranging at a reduced rate.
        self.measure_counter += 1;
        if self.measure_counter >= self.measure_interval {
            self.measure_counter = 0;
            self.controller.update_range(hw.measure_echo_us());
        }

        // 3. Fusion + runtime guard.
        if let Some(t) = self.controller.tick() {
            self.publish(
                &AppEvent::FanChanged {
                    state: t.state,
                    cause: t.cause,
                },
                link,
                sink,
            );
        }

        // 4. Bring the actuator in line with the decision.
        self.sync_actuator(hw);

        // 5. Periodic status.
        self.status_counter += 1;
        if self.status_counter >= self.status_interval {
            self.status_counter = 0;
            let snap = self.snapshot();
            self.publish(&AppEvent::Status(snap), link, sink);
        }
    }

    // ── Command handling ──────────────────────────────────────

    /// Apply one decoded command and publish its visible effect.
    pub fn handle_command(
        &mut self,
        cmd: AppCommand,
        link: &mut impl ByteLink,
        sink: &mut impl EventSink,
    ) {
        let event = match self.controller.apply(cmd) {
            Some(ControlOutcome::PresenceChanged(p)) => AppEvent::PresenceChanged(p),
            Some(ControlOutcome::ModeChanged(m)) => AppEvent::ModeChanged(m),
            Some(ControlOutcome::ManualFan(state)) => AppEvent::FanChanged {
                state,
                cause: FanCause::Manual,
            },
            None => return,
        };
        self.publish(&event, link, sink);
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn snapshot(&self) -> StatusSnapshot {
        let echo_us = self.controller.echo_us();
        StatusSnapshot {
            mode: self.controller.mode(),
            fan: self.controller.fan_state(),
            presence: self.controller.presence(),
            echo_us,
            distance_cm: echo_to_cm(echo_us),
            grace_ticks: self.controller.grace_ticks(),
            run_ticks: self.controller.run_ticks(),
        }
    }

    pub fn controller(&self) -> &FusionController {
        &self.controller
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn tx_failures(&self) -> u32 {
        self.reporter.tx_failures()
    }

    // ── Internal ──────────────────────────────────────────────

    fn sync_actuator(&mut self, hw: &mut impl ActuatorPort) {
        let want_on = self.controller.fan_state() == FanState::On;
        if want_on == hw.is_fan_on() {
            return;
        }
        let result = if want_on { hw.fan_on() } else { hw.fan_off() };
        if let Err(e) = result {
            warn!("fan write failed, retrying next tick: {e}");
        }
    }

    fn publish(&mut self, event: &AppEvent, link: &mut impl ByteLink, sink: &mut impl EventSink) {
        sink.emit(event);
        // Failure is already logged and counted by the reporter.
        let _ = self.reporter.publish(link, event);
    }
}
