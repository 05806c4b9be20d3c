//! System configuration parameters
//!
//! All tunable parameters for the PresenceFan controller.  Durations on the
//! echo path are round-trip times in microseconds (≈58 µs per centimetre of
//! target distance); loop-rate durations are counted in control ticks.
//!
//! Configuration is fixed at boot.  There is no runtime reconfiguration path.

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Fusion thresholds (round-trip µs) ---
    /// Fan may switch ON only when the echo is at or below this (≈70 cm)
    pub on_threshold_us: u16,
    /// Outer edge of the hysteresis band (≈75 cm).  Reported only; leaving
    /// the ON window is handled by the grace period.
    pub off_threshold_us: u16,
    /// Below this the sensor cannot resolve distance (≈3 cm); presence alone decides
    pub too_close_floor_us: u16,

    // --- Sensor validity window (round-trip µs) ---
    /// Shortest round trip the HC-SR04 can report (≈2 cm)
    pub min_valid_us: u16,
    /// Longest round trip the HC-SR04 can report (≈400 cm)
    pub max_valid_us: u16,

    // --- Ranging bounds ---
    /// Polls allowed for a stuck echo line to clear before giving up
    pub stuck_echo_polls: u32,
    /// Delay between stuck-echo polls (µs)
    pub stuck_echo_poll_us: u32,
    /// 1 µs polls allowed for the echo rising edge
    pub echo_rise_polls: u32,
    /// 1 µs polls allowed for the echo falling edge (covers max range)
    pub echo_fall_polls: u32,
    /// Trigger line held low before the pulse (µs)
    pub trigger_settle_us: u32,
    /// Trigger pulse width (µs)
    pub trigger_pulse_us: u32,

    // --- Timing (control ticks) ---
    /// Ticks a fan may stay ON with presence but no range before switching OFF
    pub grace_ticks: u16,
    /// Maximum continuous AUTO runtime before the safety cutoff
    pub fan_timeout_ticks: u32,
    /// Ranging runs once every this many ticks
    pub measure_interval_ticks: u16,
    /// Status lines are sent once every this many ticks
    pub status_interval_ticks: u16,
    /// Control loop period (milliseconds)
    pub loop_interval_ms: u32,

    // --- Actuator ---
    /// Fan PWM duty when ON (0-100%); the fan is binary at this duty
    pub fan_duty_percent: u8,

    // --- Platform ---
    /// Serial link baud rate
    pub uart_baud: u32,
    /// Loop watchdog timeout (milliseconds)
    pub watchdog_timeout_ms: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Fusion thresholds
            on_threshold_us: 4081,    // 70 cm
            off_threshold_us: 4372,   // 75 cm
            too_close_floor_us: 200,  // ~3 cm

            // HC-SR04 rated window: 2 cm .. 400 cm
            min_valid_us: 116,
            max_valid_us: 23_200,

            // Ranging bounds
            stuck_echo_polls: 1000,
            stuck_echo_poll_us: 10,
            echo_rise_polls: 10_000,
            echo_fall_polls: 25_000,
            trigger_settle_us: 5,
            trigger_pulse_us: 10,

            // Timing at a 10 ms loop
            grace_ticks: 300,            // 3 s
            fan_timeout_ticks: 60_000,   // 10 min
            measure_interval_ticks: 400, // 4 s
            status_interval_ticks: 200,  // 2 s
            loop_interval_ms: 10,

            // Actuator
            fan_duty_percent: 100,

            // Platform
            uart_baud: 9600,
            watchdog_timeout_ms: 5000,
        }
    }
}

impl SystemConfig {
    /// Reject parameter sets the controller cannot run safely with.
    pub fn validate(&self) -> Result<(), Error> {
        if self.min_valid_us >= self.max_valid_us {
            return Err(Error::Config("min_valid_us must be below max_valid_us"));
        }
        if self.on_threshold_us > self.off_threshold_us {
            return Err(Error::Config("on_threshold_us must not exceed off_threshold_us"));
        }
        if self.on_threshold_us > self.max_valid_us {
            return Err(Error::Config("on_threshold_us beyond sensor range"));
        }
        if self.grace_ticks == 0 || self.fan_timeout_ticks == 0 {
            return Err(Error::Config("grace and timeout must be non-zero"));
        }
        if self.measure_interval_ticks == 0 || self.status_interval_ticks == 0 {
            return Err(Error::Config("scheduling intervals must be non-zero"));
        }
        if self.loop_interval_ms == 0 {
            return Err(Error::Config("loop_interval_ms must be non-zero"));
        }
        if self.fan_duty_percent == 0 || self.fan_duty_percent > 100 {
            return Err(Error::Config("fan_duty_percent must be 1-100"));
        }
        if self.stuck_echo_polls == 0 || self.echo_rise_polls == 0 || self.echo_fall_polls == 0 {
            return Err(Error::Config("ranging poll bounds must be non-zero"));
        }
        let blocked_ms = (self.worst_case_ranging_us() / 1000).saturating_add(self.loop_interval_ms);
        if blocked_ms >= self.watchdog_timeout_ms {
            return Err(Error::Config("ranging plus loop period must stay below the watchdog timeout"));
        }
        Ok(())
    }

    /// Worst-case time one ranging cycle can block the loop (µs).
    /// Saturates at `u32::MAX`.
    pub fn worst_case_ranging_us(&self) -> u32 {
        self.stuck_echo_polls
            .saturating_mul(self.stuck_echo_poll_us)
            .saturating_add(self.trigger_settle_us)
            .saturating_add(self.trigger_pulse_us)
            .saturating_add(self.echo_rise_polls)
            .saturating_add(self.echo_fall_polls)
    }
}
