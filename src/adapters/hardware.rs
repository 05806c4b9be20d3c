//! Hardware adapter — bridges real peripherals to domain port traits.
//!
//! Owns the ranger and the fan driver and exposes them through a single
//! value implementing both [`SensorPort`] and [`ActuatorPort`], which is
//! what [`AppService::tick`](crate::app::service::AppService::tick) takes.

use crate::app::ports::{ActuatorPort, SensorPort};
use crate::error::ActuatorError;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<S, A> {
    ranger: S,
    fan: A,
}

impl<S: SensorPort, A: ActuatorPort> HardwareAdapter<S, A> {
    pub fn new(ranger: S, fan: A) -> Self {
        Self { ranger, fan }
    }

    pub fn ranger(&self) -> &S {
        &self.ranger
    }

    pub fn fan(&self) -> &A {
        &self.fan
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl<S: SensorPort, A> SensorPort for HardwareAdapter<S, A> {
    fn measure_echo_us(&mut self) -> u16 {
        self.ranger.measure_echo_us()
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl<S, A: ActuatorPort> ActuatorPort for HardwareAdapter<S, A> {
    fn fan_on(&mut self) -> Result<(), ActuatorError> {
        self.fan.fan_on()
    }

    fn fan_off(&mut self) -> Result<(), ActuatorError> {
        self.fan.fan_off()
    }

    fn is_fan_on(&self) -> bool {
        self.fan.is_fan_on()
    }
}
