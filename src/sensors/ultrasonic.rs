//! HC-SR04 ultrasonic time-of-flight ranger.
//!
//! One call to [`Ultrasonic::measure`] runs a full trigger/echo cycle:
//!
//! ```text
//!  trigger ──┐ 5µs ┌─10µs─┐
//!            └─────┘      └──────────────────────────────
//!  echo    ────────────────────┐  round trip   ┌────────
//!                              └───────────────┘ (inverted: HIGH while in flight)
//!  counter         reset ──▶  start ◀────────▶ end
//! ```
//!
//! Every wait is bounded by a poll count, so a disconnected or wedged
//! sensor costs at most a few tens of milliseconds and never hangs the
//! control loop.  Any failure (stuck echo, no echo, echo timeout,
//! out-of-range result, GPIO error) degrades to the last-known-good
//! reading; the driver never reports an error to its caller.
//!
//! Generic over `embedded-hal` 1.0 pin and delay traits plus a
//! [`FreeRunningCounter`], so the same code runs on the ESP32 and against
//! scripted mocks in host tests.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use log::debug;

use crate::app::ports::SensorPort;
use crate::config::SystemConfig;
use crate::error::SensorError;

/// Round-trip microseconds per centimetre of target distance.
pub const US_PER_CM: u16 = 58;

/// Longest round trip still converted to a distance for display.
const DISPLAY_LIMIT_US: u16 = 25_000;

/// Settling time after configuring the trigger line at init.
const INIT_SETTLE_MS: u32 = 50;

// ---------------------------------------------------------------------------
// Timing primitive
// ---------------------------------------------------------------------------

/// A fixed-width free-running hardware counter with a known tick duration.
///
/// The counter wraps from [`MAX`](Self::MAX) to zero; it is not a
/// monotonic clock, so elapsed time must go through [`elapsed_ticks`].
pub trait FreeRunningCounter {
    /// Highest value the register holds before wrapping.
    const MAX: u32;
    /// Duration of one tick in nanoseconds.
    const NANOS_PER_TICK: u32;

    /// Zero the counter.
    fn reset(&mut self);

    /// Current counter value.
    fn ticks(&mut self) -> u32;
}

/// Ticks between two counter reads, tolerating a single wrap.
pub fn elapsed_ticks(start: u32, end: u32, counter_max: u32) -> u32 {
    if end >= start {
        end - start
    } else {
        (counter_max - start) + end
    }
}

/// Convert counter ticks to microseconds, saturating at `u16::MAX`.
pub fn ticks_to_us(ticks: u32, nanos_per_tick: u32) -> u16 {
    let us = u64::from(ticks) * u64::from(nanos_per_tick) / 1000;
    us.min(u64::from(u16::MAX)) as u16
}

/// Round trip to whole centimetres, for display only.
/// `None` when the value cannot be a real echo.
pub fn echo_to_cm(echo_us: u16) -> Option<u16> {
    if echo_us > 0 && echo_us < DISPLAY_LIMIT_US {
        Some(echo_us / US_PER_CM)
    } else {
        None
    }
}

// ---------------------------------------------------------------------------
// Driver
// ---------------------------------------------------------------------------

/// Poll bounds and validity window, lifted out of [`SystemConfig`].
#[derive(Debug, Clone, Copy)]
pub struct RangingBounds {
    pub min_valid_us: u16,
    pub max_valid_us: u16,
    pub stuck_echo_polls: u32,
    pub stuck_echo_poll_us: u32,
    pub echo_rise_polls: u32,
    pub echo_fall_polls: u32,
    pub trigger_settle_us: u32,
    pub trigger_pulse_us: u32,
}

impl From<&SystemConfig> for RangingBounds {
    fn from(c: &SystemConfig) -> Self {
        Self {
            min_valid_us: c.min_valid_us,
            max_valid_us: c.max_valid_us,
            stuck_echo_polls: c.stuck_echo_polls,
            stuck_echo_poll_us: c.stuck_echo_poll_us,
            echo_rise_polls: c.echo_rise_polls,
            echo_fall_polls: c.echo_fall_polls,
            trigger_settle_us: c.trigger_settle_us,
            trigger_pulse_us: c.trigger_pulse_us,
        }
    }
}

/// Ultrasonic ranging driver with last-known-good memory.
pub struct Ultrasonic<TRIG, ECHO, DELAY, CNT> {
    trigger: TRIG,
    echo: ECHO,
    delay: DELAY,
    counter: CNT,
    bounds: RangingBounds,
    /// Most recent validated round trip (µs).  Zero until the first good cycle.
    last_good: u16,
}

impl<TRIG, ECHO, DELAY, CNT> Ultrasonic<TRIG, ECHO, DELAY, CNT>
where
    TRIG: OutputPin,
    ECHO: InputPin,
    DELAY: DelayNs,
    CNT: FreeRunningCounter,
{
    pub fn new(trigger: TRIG, echo: ECHO, delay: DELAY, counter: CNT, config: &SystemConfig) -> Self {
        Self {
            trigger,
            echo,
            delay,
            counter,
            bounds: RangingBounds::from(config),
            last_good: 0,
        }
    }

    /// Drive the trigger low, zero the counter and let the sensor settle.
    pub fn init(&mut self) -> Result<(), SensorError> {
        self.trigger.set_low().map_err(|_| SensorError::Gpio)?;
        self.counter.reset();
        self.last_good = 0;
        self.delay.delay_ms(INIT_SETTLE_MS);
        Ok(())
    }

    /// Run one ranging cycle and return a round trip in microseconds.
    ///
    /// Always returns a value: a fresh validated sample, or the previous
    /// last-known-good when this cycle failed.
    pub fn measure(&mut self) -> u16 {
        match self.try_measure() {
            Ok(us) => {
                self.last_good = us;
                us
            }
            Err(e) => {
                debug!("ultrasonic: {e}, holding {}us", self.last_good);
                self.last_good
            }
        }
    }

    /// One ranging cycle with the failure reason preserved.
    /// Does not touch last-known-good.
    pub fn try_measure(&mut self) -> Result<u16, SensorError> {
        self.wait_echo_clear()?;
        self.fire_trigger()?;

        self.counter.reset();
        if !self.poll_echo(true, self.bounds.echo_rise_polls)? {
            return Err(SensorError::NoEcho);
        }
        let start = self.counter.ticks();

        if !self.poll_echo(false, self.bounds.echo_fall_polls)? {
            return Err(SensorError::EchoTimeout);
        }
        let end = self.counter.ticks();

        let ticks = elapsed_ticks(start, end, CNT::MAX);
        let us = ticks_to_us(ticks, CNT::NANOS_PER_TICK);

        if (self.bounds.min_valid_us..=self.bounds.max_valid_us).contains(&us) {
            Ok(us)
        } else {
            Err(SensorError::OutOfRange(us))
        }
    }

    /// Last validated round trip (µs).
    pub fn last_good(&self) -> u16 {
        self.last_good
    }

    // ── Internal ──────────────────────────────────────────────

    /// A previous cycle may have left the echo line high.
    fn wait_echo_clear(&mut self) -> Result<(), SensorError> {
        for _ in 0..self.bounds.stuck_echo_polls {
            if self.echo.is_low().map_err(|_| SensorError::Gpio)? {
                return Ok(());
            }
            self.delay.delay_us(self.bounds.stuck_echo_poll_us);
        }
        Err(SensorError::EchoStuck)
    }

    fn fire_trigger(&mut self) -> Result<(), SensorError> {
        self.trigger.set_low().map_err(|_| SensorError::Gpio)?;
        self.delay.delay_us(self.bounds.trigger_settle_us);
        self.trigger.set_high().map_err(|_| SensorError::Gpio)?;
        self.delay.delay_us(self.bounds.trigger_pulse_us);
        self.trigger.set_low().map_err(|_| SensorError::Gpio)
    }

    /// Poll until the echo reads `high`, 1 µs apart, at most `polls` times.
    fn poll_echo(&mut self, high: bool, polls: u32) -> Result<bool, SensorError> {
        for _ in 0..polls {
            if self.echo.is_high().map_err(|_| SensorError::Gpio)? == high {
                return Ok(true);
            }
            self.delay.delay_us(1);
        }
        Ok(false)
    }
}

impl<TRIG, ECHO, DELAY, CNT> SensorPort for Ultrasonic<TRIG, ECHO, DELAY, CNT>
where
    TRIG: OutputPin,
    ECHO: InputPin,
    DELAY: DelayNs,
    CNT: FreeRunningCounter,
{
    fn measure_echo_us(&mut self) -> u16 {
        self.measure()
    }
}
