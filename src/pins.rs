//! GPIO / peripheral pin assignments for the PresenceFan controller board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// HC-SR04 ultrasonic ranger
// ---------------------------------------------------------------------------

/// Digital output: 10 µs HIGH pulse starts a ranging cycle.
pub const ULTRASONIC_TRIGGER_GPIO: i32 = 9;
/// Digital input: HIGH for the duration of the echo round trip.
/// Sensor is 5 V; routed through a divider to 3.3 V.
pub const ULTRASONIC_ECHO_GPIO: i32 = 10;

// ---------------------------------------------------------------------------
// Fan motor driver (L293D half H-bridge)
// ---------------------------------------------------------------------------

/// LEDC PWM output on the L293D ENABLE input.
pub const FAN_ENABLE_GPIO: i32 = 5;
/// Digital output: L293D IN1 (HIGH = forward).
pub const FAN_IN1_GPIO: i32 = 4;
/// Digital output: L293D IN2 (LOW = forward).
pub const FAN_IN2_GPIO: i32 = 3;

// ---------------------------------------------------------------------------
// UART link to the vision host
// ---------------------------------------------------------------------------

pub const UART_TX_GPIO: i32 = 17;
pub const UART_RX_GPIO: i32 = 18;

// ---------------------------------------------------------------------------
// PWM configuration
// ---------------------------------------------------------------------------

/// LEDC base frequency for the fan motor (25 kHz — inaudible).
pub const FAN_PWM_FREQ_HZ: u32 = 25_000;
