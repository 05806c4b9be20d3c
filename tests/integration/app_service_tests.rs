//! AppService end to end: bytes in, fan output and status lines out.

use presencefan::app::events::AppEvent;
use presencefan::config::SystemConfig;
use presencefan::fsm::context::{FanCause, FanState, OperatingMode};

use presencefan::adapters::hardware::HardwareAdapter;
use presencefan::app::ports::ActuatorPort;
use presencefan::app::service::AppService;
use presencefan::drivers::fan::FanDriver;

use crate::mock_hw::{
    FanCall, MemoryLink, MockLine, MockPwm, MockRanger, RecordingSink, Rig, fast_config,
};

const IN_RANGE_US: u16 = 1000;
const FAR_US: u16 = 10_000;

/// Present, in range, fan on.
fn running(config: SystemConfig) -> Rig {
    let mut rig = Rig::quiet(config);
    rig.set_echo(IN_RANGE_US);
    rig.send(b"A");
    assert!(rig.fan_on());
    rig
}

// ── Startup ───────────────────────────────────────────────────

#[test]
fn startup_announces_ready_then_auto() {
    let mut rig = Rig::new(SystemConfig::default());
    assert_eq!(rig.take_lines(), ["SYSTEM:READY", "MODE:AUTO"]);
    assert_eq!(*rig.fan.calls.borrow(), [FanCall::Off]);
    assert_eq!(
        rig.sink.events,
        [AppEvent::Started, AppEvent::ModeChanged(OperatingMode::Auto)]
    );
}

// ── Hysteresis ────────────────────────────────────────────────

#[test]
fn sample_at_threshold_turns_fan_on() {
    let config = fast_config();
    let mut rig = Rig::quiet(config.clone());
    rig.set_echo(config.on_threshold_us);
    rig.send(b"H");
    assert!(rig.fan_on());
    assert!(rig.sink.events.contains(&AppEvent::FanChanged {
        state: FanState::On,
        cause: FanCause::Fusion
    }));
}

#[test]
fn sample_one_above_threshold_does_not_turn_on() {
    let config = fast_config();
    let mut rig = Rig::quiet(config.clone());
    rig.set_echo(config.on_threshold_us + 1);
    rig.send(b"A");
    rig.ticks(20);
    assert!(!rig.fan_on());
}

#[test]
fn sample_one_above_threshold_sustains_until_grace_expires() {
    let config = fast_config();
    let mut rig = running(config.clone());

    rig.set_echo(config.on_threshold_us + 1);
    for _ in 0..config.grace_ticks - 1 {
        rig.tick();
        assert!(rig.fan_on());
    }
    rig.tick();
    assert!(!rig.fan_on());
    assert_eq!(
        rig.sink.events.last(),
        Some(&AppEvent::FanChanged {
            state: FanState::Off,
            cause: FanCause::GraceExpired
        })
    );
}

#[test]
fn returning_in_range_restarts_grace() {
    let config = fast_config();
    let mut rig = running(config.clone());

    rig.set_echo(FAR_US);
    rig.ticks(u32::from(config.grace_ticks) - 1);
    rig.set_echo(IN_RANGE_US);
    rig.tick();
    rig.set_echo(FAR_US);
    rig.ticks(u32::from(config.grace_ticks) - 1);
    assert!(rig.fan_on());
    rig.tick();
    assert!(!rig.fan_on());
}

// ── Presence ──────────────────────────────────────────────────

#[test]
fn presence_loss_turns_fan_off_same_tick() {
    let config = fast_config();
    let mut rig = running(config);
    rig.set_echo(FAR_US);
    rig.ticks(3);
    assert!(rig.app.controller().grace_ticks() > 0);

    rig.send(b"L");
    assert!(!rig.fan_on());
    assert_eq!(rig.app.controller().grace_ticks(), 0);
}

#[test]
fn too_close_sample_defers_to_presence() {
    let mut rig = Rig::quiet(fast_config());
    rig.set_echo(0);
    rig.ticks(3);
    assert!(!rig.fan_on());
    rig.send(b"A");
    assert!(rig.fan_on());
}

#[test]
fn bare_one_in_auto_sets_presence_without_fan_change() {
    let mut rig = Rig::quiet(fast_config());
    rig.set_echo(FAR_US);
    rig.send(b"1");
    assert!(rig.app.controller().presence());
    assert!(!rig.fan_on());
    assert!(rig.fan.calls.borrow().is_empty());
}

// ── Runtime cutoff ────────────────────────────────────────────

#[test]
fn timeout_forces_off_and_notifies() {
    let config = fast_config();
    let mut rig = Rig::quiet(config.clone());
    rig.set_echo(IN_RANGE_US);
    rig.link.rx.push_back(b'A');

    // Ticks 1..=T with the fan on, including the turn-on tick.
    for _ in 0..config.fan_timeout_ticks {
        rig.tick();
        assert!(rig.fan_on());
    }
    rig.take_lines();

    rig.tick();
    assert!(!rig.fan_on());
    assert_eq!(rig.take_lines(), ["AUTO:TIMEOUT"]);
    assert_eq!(rig.app.controller().timeout_trips(), 1);
}

#[test]
fn manual_fan_is_never_cut_off() {
    let config = fast_config();
    let mut rig = Rig::quiet(config.clone());
    rig.send(b"MF1");
    rig.ticks(config.fan_timeout_ticks * 3);
    assert!(rig.fan_on());
    assert!(!rig.take_lines().contains(&"AUTO:TIMEOUT".to_owned()));
}

// ── Manual mode ───────────────────────────────────────────────

#[test]
fn f1_in_manual_turns_fan_on_without_presence() {
    let mut rig = Rig::quiet(fast_config());
    rig.send(b"MF1");
    assert!(rig.fan_on());
    assert!(!rig.app.controller().presence());
    assert_eq!(rig.take_lines(), ["MODE:MANUAL", "FAN:ON"]);

    rig.send(b"F0");
    assert!(!rig.fan_on());
    assert_eq!(rig.take_lines(), ["FAN:OFF"]);
}

#[test]
fn f1_in_auto_is_ignored() {
    let mut rig = Rig::quiet(fast_config());
    rig.set_echo(FAR_US);
    rig.send(b"F1");
    assert!(!rig.fan_on());
    assert!(!rig.app.controller().presence());
    assert!(rig.take_lines().is_empty());
}

#[test]
fn repeated_manual_command_is_acknowledged() {
    let mut rig = Rig::quiet(fast_config());
    rig.send(b"MF1F1");
    assert_eq!(rig.take_lines(), ["MODE:MANUAL", "FAN:ON", "FAN:ON"]);
}

#[test]
fn manual_ignores_presence_and_range() {
    let mut rig = Rig::quiet(fast_config());
    rig.set_echo(IN_RANGE_US);
    rig.send(b"MA");
    rig.ticks(10);
    assert!(!rig.fan_on());
    assert!(rig.app.controller().presence());
}

#[test]
fn mode_switch_preserves_fan_state() {
    let mut rig = running(fast_config());
    rig.send(b"M");
    rig.set_echo(FAR_US);
    rig.ticks(100);
    assert!(rig.fan_on());
    assert_eq!(rig.app.controller().mode(), OperatingMode::Manual);

    rig.send(b"F0");
    assert!(!rig.fan_on());
}

#[test]
fn mode_lines_repeat_even_without_change() {
    let mut rig = Rig::quiet(fast_config());
    rig.send(b"OO");
    assert_eq!(rig.take_lines(), ["MODE:AUTO", "MODE:AUTO"]);
}

#[test]
fn back_to_auto_hands_control_to_fusion() {
    let mut rig = Rig::quiet(fast_config());
    rig.set_echo(IN_RANGE_US);
    rig.send(b"MF1");
    // MANUAL cleared presence: the first AUTO tick turns the fan off.
    rig.send(b"O");
    assert!(!rig.fan_on());
    rig.send(b"A");
    assert!(rig.fan_on());
}

// ── Scheduling ────────────────────────────────────────────────

#[test]
fn one_byte_per_tick() {
    let mut rig = Rig::quiet(fast_config());
    rig.link.rx.extend(b"MO".iter().copied());
    rig.tick();
    assert_eq!(rig.app.controller().mode(), OperatingMode::Manual);
    rig.tick();
    assert_eq!(rig.app.controller().mode(), OperatingMode::Auto);
}

#[test]
fn ranging_runs_every_nth_tick() {
    let config = SystemConfig::default();
    let mut rig = Rig::quiet(config.clone());
    rig.ticks(u32::from(config.measure_interval_ticks) * 2 + 1);
    assert_eq!(rig.measurements.get(), 2);
}

#[test]
fn new_sample_only_seen_after_measurement() {
    let config = SystemConfig {
        measure_interval_ticks: 10,
        status_interval_ticks: u16::MAX,
        ..SystemConfig::default()
    };
    let mut rig = Rig::quiet(config);
    rig.set_echo(FAR_US);
    rig.ticks(10);
    assert_eq!(rig.app.controller().echo_us(), FAR_US);

    rig.set_echo(IN_RANGE_US);
    rig.send(b"A");
    rig.ticks(8);
    assert!(!rig.fan_on());
    rig.tick();
    assert!(rig.fan_on(), "tenth tick measures and switches");
}

#[test]
fn status_report_in_auto() {
    let config = SystemConfig {
        measure_interval_ticks: 1,
        status_interval_ticks: 200,
        ..SystemConfig::default()
    };
    let mut rig = Rig::quiet(config);
    rig.set_echo(4081);
    rig.ticks(199);
    assert!(rig.take_lines().is_empty());
    rig.tick();
    assert_eq!(rig.take_lines(), ["TIME:4081", "FAN:OFF"]);

    let Some(AppEvent::Status(snap)) = rig.sink.events.last() else {
        panic!("expected a status event");
    };
    assert_eq!(snap.distance_cm, Some(70));
}

#[test]
fn status_report_in_manual_omits_fan() {
    let config = SystemConfig {
        measure_interval_ticks: 1,
        status_interval_ticks: 10,
        ..SystemConfig::default()
    };
    let mut rig = Rig::quiet(config);
    rig.set_echo(500);
    rig.send(b"M");
    rig.ticks(9);
    assert_eq!(rig.take_lines(), ["MODE:MANUAL", "TIME:500"]);
}

// ── Actuator ──────────────────────────────────────────────────

#[test]
fn failed_fan_write_is_retried_next_tick() {
    let mut rig = Rig::quiet(fast_config());
    rig.set_echo(IN_RANGE_US);
    rig.fan.fail_next.set(1);
    rig.send(b"A");
    assert!(!rig.fan_on());
    assert_eq!(rig.app.snapshot().fan, FanState::On);

    rig.tick();
    assert!(rig.fan_on());
    assert_eq!(*rig.fan.calls.borrow(), [FanCall::Failed, FanCall::On]);
}

#[test]
fn failed_stop_on_real_driver_is_retried_until_output_is_zero() {
    let config = fast_config();
    let ranger = MockRanger::default();
    ranger.echo_us.set(IN_RANGE_US);
    let (pwm, in1, in2) = (MockPwm::default(), MockLine::default(), MockLine::default());
    let fan = FanDriver::new(pwm.clone(), in1.clone(), in2, &config);
    let mut hw = HardwareAdapter::new(ranger, fan);
    let mut link = MemoryLink::default();
    let mut sink = RecordingSink::default();
    let mut app = AppService::new(config);
    app.start(&mut hw, &mut link, &mut sink);

    link.rx.push_back(b'A');
    app.tick(&mut hw, &mut link, &mut sink);
    assert!(hw.is_fan_on());
    assert_eq!(pwm.duty.get(), 255);

    pwm.fail.set(true);
    link.rx.push_back(b'D');
    app.tick(&mut hw, &mut link, &mut sink);
    assert_eq!(app.snapshot().fan, FanState::Off);
    assert!(hw.is_fan_on(), "a failed stop must still read as running");
    assert_eq!(pwm.duty.get(), 255);

    // Still failing: keeps retrying without giving up.
    app.tick(&mut hw, &mut link, &mut sink);
    assert!(hw.is_fan_on());

    pwm.fail.set(false);
    app.tick(&mut hw, &mut link, &mut sink);
    assert!(!hw.is_fan_on());
    assert_eq!(pwm.duty.get(), 0);
    assert!(!in1.0.get());
}

#[test]
fn fan_is_written_only_on_change() {
    let mut rig = running(fast_config());
    rig.ticks(20);
    assert_eq!(*rig.fan.calls.borrow(), [FanCall::On]);
}
