//! Fan motor driver (L293D half H-bridge).
//!
//! One PWM enable line sets the speed, two direction inputs select
//! forward rotation or coast.  The fan only ever runs forward at the
//! configured duty.
//!
//! ## Output contract
//!
//! - On: IN1 high, IN2 low, enable at `fan_duty_percent`.
//! - Off: enable at zero duty, IN1 and IN2 both low.
//!
//! Generic over `embedded-hal` traits, so the same driver runs on LEDC +
//! GPIO on the target and on recording mocks in tests.

use embedded_hal::digital::OutputPin;
use embedded_hal::pwm::SetDutyCycle;
use log::debug;

use crate::app::ports::ActuatorPort;
use crate::config::SystemConfig;
use crate::error::ActuatorError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FanOutput {
    Stopped,
    Forward { duty: u8 },
}

pub struct FanDriver<EN, IN1, IN2> {
    enable: EN,
    in1: IN1,
    in2: IN2,
    duty_percent: u8,
    output: FanOutput,
}

impl<EN, IN1, IN2> FanDriver<EN, IN1, IN2>
where
    EN: SetDutyCycle,
    IN1: OutputPin,
    IN2: OutputPin,
{
    pub fn new(enable: EN, in1: IN1, in2: IN2, config: &SystemConfig) -> Self {
        Self {
            enable,
            in1,
            in2,
            duty_percent: config.fan_duty_percent.min(100),
            output: FanOutput::Stopped,
        }
    }

    /// Forward rotation at the configured duty.
    pub fn start(&mut self) -> Result<(), ActuatorError> {
        self.in1.set_high().map_err(|_| ActuatorError::GpioWriteFailed)?;
        self.in2.set_low().map_err(|_| ActuatorError::GpioWriteFailed)?;
        self.enable
            .set_duty_cycle_percent(self.duty_percent)
            .map_err(|_| ActuatorError::PwmWriteFailed)?;
        self.output = FanOutput::Forward {
            duty: self.duty_percent,
        };
        debug!("fan forward at {}%", self.duty_percent);
        Ok(())
    }

    /// Zero duty, both direction lines low.
    ///
    /// Marked stopped only once every write has landed, so a failed stop
    /// still reads as running and gets retried.
    pub fn stop(&mut self) -> Result<(), ActuatorError> {
        self.enable
            .set_duty_cycle_fully_off()
            .map_err(|_| ActuatorError::PwmWriteFailed)?;
        self.in1.set_low().map_err(|_| ActuatorError::GpioWriteFailed)?;
        self.in2.set_low().map_err(|_| ActuatorError::GpioWriteFailed)?;
        self.output = FanOutput::Stopped;
        debug!("fan stopped");
        Ok(())
    }

    pub fn output(&self) -> FanOutput {
        self.output
    }

    pub fn is_running(&self) -> bool {
        matches!(self.output, FanOutput::Forward { .. })
    }
}

impl<EN, IN1, IN2> ActuatorPort for FanDriver<EN, IN1, IN2>
where
    EN: SetDutyCycle,
    IN1: OutputPin,
    IN2: OutputPin,
{
    fn fan_on(&mut self) -> Result<(), ActuatorError> {
        self.start()
    }

    fn fan_off(&mut self) -> Result<(), ActuatorError> {
        self.stop()
    }

    fn is_fan_on(&self) -> bool {
        self.is_running()
    }
}
