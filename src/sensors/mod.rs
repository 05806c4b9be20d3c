//! Sensor subsystem.
//!
//! A single HC-SR04 ranger feeds the fusion controller.  Presence comes in
//! over the serial link, not from a local sensor.

pub mod ultrasonic;
