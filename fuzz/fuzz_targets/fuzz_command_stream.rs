//! Fuzz target: inbound byte stream through interpreter and controller.
//!
//! Each input byte pair is (command byte, ranging sample low byte).  The
//! controller must never panic and must keep its counters inside their
//! configured bounds whatever the host sends.
//!
//! cargo fuzz run fuzz_command_stream

#![no_main]

use libfuzzer_sys::fuzz_target;
use presencefan::config::SystemConfig;
use presencefan::fsm::FusionController;
use presencefan::fsm::context::{FanState, OperatingMode};
use presencefan::protocol::interpreter::CommandInterpreter;

fuzz_target!(|data: &[u8]| {
    let config = SystemConfig {
        grace_ticks: 4,
        fan_timeout_ticks: 32,
        ..SystemConfig::default()
    };
    let mut interp = CommandInterpreter::new();
    let mut ctrl = FusionController::new(config.clone());

    for pair in data.chunks(2) {
        if let Some(cmd) = interp.interpret(pair[0]) {
            let _ = ctrl.apply(cmd);
        }
        if let Some(&b) = pair.get(1) {
            // Spread samples over the interesting window: 0..~8 ms.
            ctrl.update_range(u16::from(b) * 32);
        }
        let _ = ctrl.tick();

        assert!(ctrl.grace_ticks() < config.grace_ticks);
        assert!(ctrl.run_ticks() <= config.fan_timeout_ticks);
        if ctrl.mode() == OperatingMode::Auto && ctrl.fan_state() == FanState::On {
            assert!(ctrl.presence());
        }
    }
});
