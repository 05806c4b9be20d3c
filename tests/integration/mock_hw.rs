//! Mock adapters for integration tests.
//!
//! The ranger and fan are shared through `Rc<Cell<_>>` handles so a test
//! can move the target or inject write failures while the service owns
//! the adapter.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use presencefan::adapters::hardware::HardwareAdapter;
use presencefan::app::events::AppEvent;
use presencefan::app::ports::{ActuatorPort, ByteLink, EventSink, SensorPort};
use presencefan::app::service::AppService;
use presencefan::config::SystemConfig;
use presencefan::error::{ActuatorError, CommsError};

// ── Ranger ────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockRanger {
    pub echo_us: Rc<Cell<u16>>,
    pub measurements: Rc<Cell<u32>>,
}

impl SensorPort for MockRanger {
    fn measure_echo_us(&mut self) -> u16 {
        self.measurements.set(self.measurements.get() + 1);
        self.echo_us.get()
    }
}

// ── Fan ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FanCall {
    On,
    Off,
    Failed,
}

#[derive(Clone, Default)]
pub struct MockFan {
    pub on: Rc<Cell<bool>>,
    /// Number of upcoming writes that fail.
    pub fail_next: Rc<Cell<u32>>,
    pub calls: Rc<RefCell<Vec<FanCall>>>,
}

impl MockFan {
    fn write(&mut self, on: bool) -> Result<(), ActuatorError> {
        if self.fail_next.get() > 0 {
            self.fail_next.set(self.fail_next.get() - 1);
            self.calls.borrow_mut().push(FanCall::Failed);
            return Err(ActuatorError::PwmWriteFailed);
        }
        self.on.set(on);
        self.calls
            .borrow_mut()
            .push(if on { FanCall::On } else { FanCall::Off });
        Ok(())
    }
}

impl ActuatorPort for MockFan {
    fn fan_on(&mut self) -> Result<(), ActuatorError> {
        self.write(true)
    }

    fn fan_off(&mut self) -> Result<(), ActuatorError> {
        self.write(false)
    }

    fn is_fan_on(&self) -> bool {
        self.on.get()
    }
}

// ── PWM + GPIO lines (for the real fan driver) ───────────────

#[derive(Clone, Default)]
pub struct MockLine(pub Rc<Cell<bool>>);

impl embedded_hal::digital::ErrorType for MockLine {
    type Error = core::convert::Infallible;
}

impl embedded_hal::digital::OutputPin for MockLine {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.0.set(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.0.set(true);
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct MockPwm {
    pub duty: Rc<Cell<u16>>,
    pub fail: Rc<Cell<bool>>,
}

#[derive(Debug)]
pub struct PwmFault;

impl embedded_hal::pwm::Error for PwmFault {
    fn kind(&self) -> embedded_hal::pwm::ErrorKind {
        embedded_hal::pwm::ErrorKind::Other
    }
}

impl embedded_hal::pwm::ErrorType for MockPwm {
    type Error = PwmFault;
}

impl embedded_hal::pwm::SetDutyCycle for MockPwm {
    fn max_duty_cycle(&self) -> u16 {
        255
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), PwmFault> {
        if self.fail.get() {
            return Err(PwmFault);
        }
        self.duty.set(duty);
        Ok(())
    }
}

// ── Serial link ───────────────────────────────────────────────

#[derive(Default)]
pub struct MemoryLink {
    pub rx: VecDeque<u8>,
    pub tx: Vec<u8>,
}

impl ByteLink for MemoryLink {
    fn available(&self) -> bool {
        !self.rx.is_empty()
    }

    fn receive(&mut self) -> Result<u8, CommsError> {
        self.rx.pop_front().ok_or(CommsError::RxEmpty)
    }

    fn send(&mut self, byte: u8) -> Result<(), CommsError> {
        self.tx.push(byte);
        Ok(())
    }
}

// ── Event sink ────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── Rig ───────────────────────────────────────────────────────

/// Service plus mocks, started and with the boot output drained.
pub struct Rig {
    pub app: AppService,
    pub hw: HardwareAdapter<MockRanger, MockFan>,
    pub link: MemoryLink,
    pub sink: RecordingSink,
    pub echo: Rc<Cell<u16>>,
    pub measurements: Rc<Cell<u32>>,
    pub fan: MockFan,
}

#[allow(dead_code)]
impl Rig {
    pub fn new(config: SystemConfig) -> Self {
        let ranger = MockRanger::default();
        let fan = MockFan::default();
        let echo = ranger.echo_us.clone();
        let measurements = ranger.measurements.clone();
        let mut rig = Self {
            app: AppService::new(config),
            hw: HardwareAdapter::new(ranger, fan.clone()),
            link: MemoryLink::default(),
            sink: RecordingSink::default(),
            echo,
            measurements,
            fan,
        };
        rig.app.start(&mut rig.hw, &mut rig.link, &mut rig.sink);
        rig
    }

    /// Started with boot lines and events cleared.
    pub fn quiet(config: SystemConfig) -> Self {
        let mut rig = Self::new(config);
        rig.take_lines();
        rig.sink.events.clear();
        rig.fan.calls.borrow_mut().clear();
        rig
    }

    pub fn tick(&mut self) {
        self.app.tick(&mut self.hw, &mut self.link, &mut self.sink);
    }

    pub fn ticks(&mut self, n: u32) {
        for _ in 0..n {
            self.tick();
        }
    }

    /// Queue `bytes` and tick once per byte, so each is consumed.
    pub fn send(&mut self, bytes: &[u8]) {
        self.link.rx.extend(bytes.iter().copied());
        for _ in bytes {
            self.tick();
        }
    }

    pub fn set_echo(&mut self, us: u16) {
        self.echo.set(us);
    }

    pub fn fan_on(&self) -> bool {
        self.fan.on.get()
    }

    /// Drain transmitted lines.
    pub fn take_lines(&mut self) -> Vec<String> {
        let text = String::from_utf8(std::mem::take(&mut self.link.tx)).unwrap();
        text.lines().map(str::to_owned).collect()
    }
}

/// Ranging every tick and no periodic status, so tests see only the
/// lines they cause.
pub fn fast_config() -> SystemConfig {
    SystemConfig {
        measure_interval_ticks: 1,
        status_interval_ticks: u16::MAX,
        grace_ticks: 5,
        fan_timeout_ticks: 50,
        ..SystemConfig::default()
    }
}
