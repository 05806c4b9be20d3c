//! Fuzz target: status line rendering.
//!
//! Any snapshot must render to newline-terminated ASCII lines that fit
//! the fixed line buffer.
//!
//! cargo fuzz run fuzz_status_render

#![no_main]

use libfuzzer_sys::fuzz_target;
use presencefan::app::events::{AppEvent, StatusSnapshot};
use presencefan::fsm::context::{FanState, OperatingMode};
use presencefan::protocol::status::{LINE_CAPACITY, render};
use presencefan::sensors::ultrasonic::echo_to_cm;

fuzz_target!(|data: &[u8]| {
    if data.len() < 3 {
        return;
    }
    let echo_us = u16::from_le_bytes([data[0], data[1]]);
    let flags = data[2];
    let snap = StatusSnapshot {
        mode: if flags & 1 == 0 { OperatingMode::Auto } else { OperatingMode::Manual },
        fan: if flags & 2 == 0 { FanState::Off } else { FanState::On },
        presence: flags & 4 != 0,
        echo_us,
        distance_cm: echo_to_cm(echo_us),
        grace_ticks: 0,
        run_ticks: 0,
    };

    let lines = render(&AppEvent::Status(snap));
    assert!(!lines.is_empty());
    for line in &lines {
        assert!(line.len() <= LINE_CAPACITY);
        assert!(line.ends_with('\n'));
        assert!(line.is_ascii());
    }
});
