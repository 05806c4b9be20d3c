//! PresenceFan Firmware — Main Entry Point
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter      LogEventSink     QueuedLink + UartTx     │
//! │  (Ultrasonic + Fan)   (EventSink)      (ByteLink)              │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              AppService (pure logic)                   │    │
//! │  │  Interpreter · FusionController · RuntimeGuard         │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  uart-rx thread ──stage──▶ RxQueue (only shared state)         │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use core::sync::atomic::AtomicU32;
use std::time::Duration;

use anyhow::Result;
use esp_idf_svc::hal::delay::Ets;
use esp_idf_svc::hal::gpio::{AnyIOPin, AnyInputPin, AnyOutputPin, PinDriver};
use esp_idf_svc::hal::ledc::{LedcDriver, LedcTimerDriver, config::TimerConfig};
use esp_idf_svc::hal::peripherals::Peripherals;
use esp_idf_svc::hal::prelude::*;
use esp_idf_svc::hal::uart::{UartDriver, config::Config as UartConfig};
use log::{info, warn};

use presencefan::adapters::hardware::HardwareAdapter;
use presencefan::adapters::log_sink::LogEventSink;
use presencefan::adapters::time::{MicrosCounter, UptimeClock};
use presencefan::adapters::uart::{UartTx, spawn_rx_pump};
use presencefan::app::service::AppService;
use presencefan::config::SystemConfig;
use presencefan::drivers::fan::FanDriver;
use presencefan::drivers::watchdog::Watchdog;
use presencefan::link::{self, QueuedLink, RxQueue};
use presencefan::pins;
use presencefan::sensors::ultrasonic::Ultrasonic;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("PresenceFan v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Configuration (compile-time defaults) ──────────────
    let config = SystemConfig::default();
    config.validate()?;
    info!(
        "Config: on <= {} us, off > {} us (logged), ranging every {} ticks, loop {} ms",
        config.on_threshold_us,
        config.off_threshold_us,
        config.measure_interval_ticks,
        config.loop_interval_ms
    );

    let peripherals = Peripherals::take()?;

    // ── 3. Ranger ─────────────────────────────────────────────
    // SAFETY: every GPIO number in `pins` is claimed exactly once below.
    let trigger = PinDriver::output(unsafe { AnyOutputPin::new(pins::ULTRASONIC_TRIGGER_GPIO) })?;
    let echo = PinDriver::input(unsafe { AnyInputPin::new(pins::ULTRASONIC_ECHO_GPIO) })?;
    let counter = MicrosCounter::new(UptimeClock::new());
    let mut ranger = Ultrasonic::new(trigger, echo, Ets, counter, &config);
    if let Err(e) = ranger.init() {
        warn!("ranger init: {e} (continuing, samples fall back to last good)");
    }

    // ── 4. Fan (LEDC PWM on ENABLE, GPIO on IN1/IN2) ──────────
    let fan_timer = LedcTimerDriver::new(
        peripherals.ledc.timer0,
        &TimerConfig::default().frequency(pins::FAN_PWM_FREQ_HZ.Hz()),
    )?;
    let enable = LedcDriver::new(peripherals.ledc.channel0, &fan_timer, unsafe {
        AnyOutputPin::new(pins::FAN_ENABLE_GPIO)
    })?;
    let in1 = PinDriver::output(unsafe { AnyOutputPin::new(pins::FAN_IN1_GPIO) })?;
    let in2 = PinDriver::output(unsafe { AnyOutputPin::new(pins::FAN_IN2_GPIO) })?;
    let fan = FanDriver::new(enable, in1, in2, &config);

    let mut hw = HardwareAdapter::new(ranger, fan);

    // ── 5. Serial link ────────────────────────────────────────
    let uart = UartDriver::new(
        peripherals.uart1,
        unsafe { AnyIOPin::new(pins::UART_TX_GPIO) },
        unsafe { AnyIOPin::new(pins::UART_RX_GPIO) },
        Option::<AnyIOPin>::None,
        Option::<AnyIOPin>::None,
        &UartConfig::default().baudrate(config.uart_baud.Hz()),
    )?;
    let (uart_tx, uart_rx) = uart.into_split();

    // Lives for the whole program; shared between the reader thread and the loop.
    let queue: &'static mut RxQueue = Box::leak(Box::new(RxQueue::new()));
    let overruns: &'static AtomicU32 = Box::leak(Box::new(AtomicU32::new(0)));
    let (stager, consumer) = link::split(queue, overruns);
    spawn_rx_pump(uart_rx, stager)?;
    let mut link = QueuedLink::new(consumer, UartTx::new(uart_tx));

    // ── 6. Application core ───────────────────────────────────
    let mut sink = LogEventSink::new();
    let mut watchdog = Watchdog::new(&config);
    let period = Duration::from_millis(u64::from(config.loop_interval_ms));
    let mut app = AppService::new(config);
    app.start(&mut hw, &mut link, &mut sink);

    // ── 7. Control loop ───────────────────────────────────────
    loop {
        app.tick(&mut hw, &mut link, &mut sink);
        watchdog.feed();
        std::thread::sleep(period);
    }
}
